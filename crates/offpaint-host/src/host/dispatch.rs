//! Inbound message routing for a render host.

use offpaint_common::{MessageKind, ProtocolError};
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::messages::{PaintRectEvent, RawMessage, ScrollRectEvent};

use super::{ApplyReport, RenderHost};

/// Outcome of [`RenderHost::on_message_received`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// A paint transport message was decoded and handled.
    Handled(Result<ApplyReport, ProtocolError>),
    /// The kind is ours but the body did not decode. Reported as a bad
    /// message.
    DecodeFailed(MessageKind),
    /// Not a paint transport message; the embedder's base host handles it.
    Unhandled,
}

impl RenderHost {
    /// Route one message from the renderer.
    pub fn on_message_received(&mut self, message: &RawMessage) -> DispatchResult {
        let Some(kind) = MessageKind::from_wire(&message.kind) else {
            trace!(routing_id = %self.routing_id, kind = %message.kind, "message left to base host");
            return DispatchResult::Unhandled;
        };

        match kind {
            MessageKind::ScrollRect => match self.decode::<ScrollRectEvent>(kind, &message.body) {
                Some(event) => DispatchResult::Handled(self.on_scroll_rect(&event)),
                None => DispatchResult::DecodeFailed(kind),
            },
            MessageKind::PaintRect => match self.decode::<PaintRectEvent>(kind, &message.body) {
                Some(event) => DispatchResult::Handled(self.on_paint_rect(&event)),
                None => DispatchResult::DecodeFailed(kind),
            },
        }
    }

    fn decode<T: DeserializeOwned>(&self, kind: MessageKind, body: &str) -> Option<T> {
        match serde_json::from_str(body) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(
                    routing_id = %self.routing_id,
                    host = %self.tag,
                    %kind,
                    body_len = body.len(),
                    error = %e,
                    "message rejected: failed to decode"
                );
                self.process.received_bad_message(kind);
                None
            }
        }
    }
}
