//! Messages exchanged with the render process.
//!
//! Inbound paint and scroll events carry the id of a shared bitmap holding
//! the pixel delta. Outbound messages acknowledge those transfers and
//! request viewport resizes. The transport owns the real wire format; the
//! JSON encoding here is what [`RawMessage`] bodies use when a transport
//! hands messages over undecoded.

use offpaint_common::{BitmapId, MessageKind, Rect, RoutingId, ViewportSize};
use serde::{Deserialize, Serialize};

/// Flag bits carried on a paint event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaintFlags(pub u32);

impl PaintFlags {
    /// The paint completes a previously requested resize.
    pub const RESIZE_ACK: u32 = 1 << 0;
    // Bit 1 is the restore ack, which this host does not track.
    /// The paint answers an explicit repaint request.
    pub const REPAINT_ACK: u32 = 1 << 2;

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn with_resize_ack(self) -> Self {
        Self(self.0 | Self::RESIZE_ACK)
    }

    pub fn with_repaint_ack(self) -> Self {
        Self(self.0 | Self::REPAINT_ACK)
    }

    pub fn is_resize_ack(self) -> bool {
        self.0 & Self::RESIZE_ACK != 0
    }

    pub fn is_repaint_ack(self) -> bool {
        self.0 & Self::REPAINT_ACK != 0
    }
}

/// New geometry for a native sub-window (e.g. a plugin) overlapping the
/// painted area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubWindowMove {
    pub window: u64,
    pub window_rect: Rect,
    pub clip_rect: Rect,
    pub visible: bool,
}

/// The renderer scrolled part of the page and painted the exposed strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRectEvent {
    pub bitmap: BitmapId,
    /// Area covered by the bitmap.
    pub bitmap_rect: Rect,
    /// Region to shift and redraw.
    pub clip_rect: Rect,
    pub dx: i32,
    pub dy: i32,
    pub view_size: ViewportSize,
    #[serde(default)]
    pub sub_window_moves: Vec<SubWindowMove>,
}

/// The renderer painted a rectangle of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintRectEvent {
    pub bitmap: BitmapId,
    pub bitmap_rect: Rect,
    pub view_size: ViewportSize,
    #[serde(default)]
    pub flags: PaintFlags,
    #[serde(default)]
    pub sub_window_moves: Vec<SubWindowMove>,
}

/// Messages the host sends to the render process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// The scroll bitmap may be reused.
    ScrollAck { routing_id: RoutingId },
    /// The paint bitmap may be reused.
    PaintAck { routing_id: RoutingId },
    /// Render at a new size and answer with a resize-ack paint.
    Resize {
        routing_id: RoutingId,
        new_size: ViewportSize,
        reserved_area: Rect,
    },
}

impl OutboundMessage {
    pub fn routing_id(&self) -> RoutingId {
        match self {
            Self::ScrollAck { routing_id }
            | Self::PaintAck { routing_id }
            | Self::Resize { routing_id, .. } => *routing_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ScrollAck { .. } => "scroll_ack",
            Self::PaintAck { .. } => "paint_ack",
            Self::Resize { .. } => "resize",
        }
    }
}

/// An inbound message as the transport delivers it: a kind name plus an
/// undecoded JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub kind: String,
    pub body: String,
}

impl RawMessage {
    pub fn new(kind: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            body: body.into(),
        }
    }

    pub fn scroll_rect(event: &ScrollRectEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            MessageKind::ScrollRect.as_str(),
            serde_json::to_string(event)?,
        ))
    }

    pub fn paint_rect(event: &PaintRectEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            MessageKind::PaintRect.as_str(),
            serde_json::to_string(event)?,
        ))
    }
}
