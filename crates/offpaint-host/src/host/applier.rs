//! Applying scroll and paint events to the backing store.
//!
//! Both paths run validate → apply → ack → notify view. The ack always goes
//! out once the bitmap is no longer needed, even when the bitmap was
//! missing or rejected, and always before the view is told anything.

use offpaint_common::{BitmapId, MessageKind, ProtocolError, Rect};
use tracing::{debug, warn};

use crate::messages::{OutboundMessage, PaintRectEvent, ScrollRectEvent};

use super::{RenderHost, ResizeOutcome};

/// What happened to the shared bitmap of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapDisposition {
    /// Pixels were handed to the backing store.
    Applied,
    /// No bitmap is registered under the id; nothing to apply.
    Missing,
    /// The bitmap cannot cover the rect. Reported as a bad message.
    Undersized { required: usize, capacity: usize },
}

/// Result of handling one scroll or paint event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub bitmap: BitmapDisposition,
    pub ack_sent: bool,
    pub view_notified: bool,
    pub resize_ack: bool,
    pub repaint_ack: bool,
    /// Resize request issued right after a resize ack, if one was tried.
    pub chained_resize: Option<ResizeOutcome>,
}

impl RenderHost {
    /// Handle a scroll event from the renderer.
    pub fn on_scroll_rect(&mut self, event: &ScrollRectEvent) -> Result<ApplyReport, ProtocolError> {
        if event.view_size.is_empty() {
            return Err(self.protocol_violation(ProtocolError::EmptyViewSize {
                kind: MessageKind::ScrollRect,
            }));
        }

        let bitmap = self.apply_bitmap(
            MessageKind::ScrollRect,
            event.bitmap,
            event.bitmap_rect,
            event.dx,
            event.dy,
            event.clip_rect,
        );

        let ack_sent = self.send_ack(OutboundMessage::ScrollAck {
            routing_id: self.routing_id,
        });

        let view_notified = match self.view() {
            Some(view) => {
                view.move_sub_windows(&event.sub_window_moves);
                view.did_scroll_region(event.clip_rect, event.dx, event.dy);
                true
            }
            None => false,
        };

        debug!(
            routing_id = %self.routing_id,
            host = %self.tag,
            bitmap = %event.bitmap,
            dx = event.dx,
            dy = event.dy,
            ?bitmap,
            "scroll rect handled"
        );

        Ok(ApplyReport {
            bitmap,
            ack_sent,
            view_notified,
            resize_ack: false,
            repaint_ack: false,
            chained_resize: None,
        })
    }

    /// Handle a paint event from the renderer.
    pub fn on_paint_rect(&mut self, event: &PaintRectEvent) -> Result<ApplyReport, ProtocolError> {
        self.negotiator.record_current_size(event.view_size);

        if event.bitmap_rect.is_empty() {
            return Err(self.protocol_violation(ProtocolError::EmptyBitmapRect {
                kind: MessageKind::PaintRect,
            }));
        }
        if event.view_size.is_empty() {
            return Err(self.protocol_violation(ProtocolError::EmptyViewSize {
                kind: MessageKind::PaintRect,
            }));
        }

        let resize_ack = event.flags.is_resize_ack();
        if resize_ack {
            // Cleared before anything reaches the backing store.
            match self.negotiator.acknowledge() {
                Ok(acked) => debug!(
                    routing_id = %self.routing_id,
                    host = %self.tag,
                    size = %event.view_size,
                    ?acked,
                    "resize acknowledged"
                ),
                Err(err) => return Err(self.protocol_violation(err)),
            }
        }

        let repaint_ack = event.flags.is_repaint_ack();
        if repaint_ack {
            debug!(routing_id = %self.routing_id, host = %self.tag, "repaint acknowledged");
        }

        let bitmap = self.apply_bitmap(
            MessageKind::PaintRect,
            event.bitmap,
            event.bitmap_rect,
            0,
            0,
            Rect::default(),
        );

        let ack_sent = self.send_ack(OutboundMessage::PaintAck {
            routing_id: self.routing_id,
        });

        let view_notified = match self.view() {
            Some(view) => {
                view.move_sub_windows(&event.sub_window_moves);
                view.did_paint_region(event.bitmap_rect);
                true
            }
            None => false,
        };

        // The view may have moved on while this resize was in flight.
        let mut chained_resize = None;
        if resize_ack {
            if let Some(view) = self.view() {
                if view.viewport_bounds().size() != self.negotiator.current_size() {
                    chained_resize = Some(self.maybe_request_resize());
                }
            }
        }

        Ok(ApplyReport {
            bitmap,
            ack_sent,
            view_notified,
            resize_ack,
            repaint_ack,
            chained_resize,
        })
    }

    /// Validate the bitmap behind `id` against `rect` and paint it.
    fn apply_bitmap(
        &self,
        kind: MessageKind,
        id: BitmapId,
        rect: Rect,
        dx: i32,
        dy: i32,
        clip: Rect,
    ) -> BitmapDisposition {
        let required = rect.byte_len().unwrap_or(usize::MAX);

        let Some(bitmap) = self.process.shared_bitmap(id) else {
            debug!(routing_id = %self.routing_id, host = %self.tag, bitmap = %id, "no shared bitmap, nothing to apply");
            return BitmapDisposition::Missing;
        };

        let capacity = bitmap.size();
        if capacity < required {
            drop(bitmap);
            warn!(
                routing_id = %self.routing_id,
                host = %self.tag,
                bitmap = %id,
                required,
                capacity,
                "shared bitmap too small for given rectangle"
            );
            self.process.received_bad_message(kind);
            return BitmapDisposition::Undersized { required, capacity };
        }

        self.delegate.on_paint(
            &bitmap.memory()[..required],
            rect.into(),
            dx,
            dy,
            clip.into(),
        );
        BitmapDisposition::Applied
    }
}
