//! Render hosts.
//!
//! A `RenderHost` is the host-side end of one routing id: it negotiates the
//! viewport size with the renderer, applies the pixel deltas the renderer
//! paints into shared bitmaps, and acknowledges each transfer.

use std::rc::{Rc, Weak};

use offpaint_common::{
    new_correlation_id, HostKind, ProtocolError, Rect, RoutingId, SiteId, ViewportSize,
};
use tracing::{debug, trace, warn};

use crate::messages::{OutboundMessage, PaintRectEvent, ScrollRectEvent};
use crate::transport::RenderProcessHost;
use crate::view::{HostView, PaintDelegate};

mod applier;
mod dispatch;
mod negotiator;


pub use applier::{ApplyReport, BitmapDisposition};
pub use dispatch::DispatchResult;
pub use negotiator::{ResizeGate, ResizeNegotiator, ResizeOutcome, SkipReason};

/// The capability a paint transport drives: apply what the renderer sent,
/// and ask for a new size when one is due.
pub trait PaintTransportSink {
    fn apply_scroll(&mut self, event: &ScrollRectEvent) -> Result<ApplyReport, ProtocolError>;

    fn apply_paint(&mut self, event: &PaintRectEvent) -> Result<ApplyReport, ProtocolError>;

    fn request_resize(&mut self) -> ResizeOutcome;
}

/// Per-host settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOptions {
    /// Reserved area sent with resize requests when the view has none.
    pub reserved_area: Rect,
    /// Start out expecting the renderer's initial size handshake.
    pub await_initial_resize_ack: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            reserved_area: Rect::default(),
            await_initial_resize_ack: true,
        }
    }
}

pub struct RenderHost {
    kind: HostKind,
    routing_id: RoutingId,
    site: Option<SiteId>,
    /// Correlates this host's log lines.
    tag: String,
    process: Rc<dyn RenderProcessHost>,
    delegate: Rc<dyn PaintDelegate>,
    view: Option<Weak<dyn HostView>>,
    negotiator: ResizeNegotiator,
    options: HostOptions,
    renderer_initialized: bool,
}

impl RenderHost {
    /// Host for a top-level page view of `site`.
    pub fn new_view(
        site: SiteId,
        process: Rc<dyn RenderProcessHost>,
        delegate: Rc<dyn PaintDelegate>,
        routing_id: RoutingId,
        options: HostOptions,
    ) -> Self {
        Self::new(HostKind::View, Some(site), process, delegate, routing_id, options)
    }

    /// Host for a popup widget on an existing process.
    pub fn new_widget(
        process: Rc<dyn RenderProcessHost>,
        delegate: Rc<dyn PaintDelegate>,
        routing_id: RoutingId,
        options: HostOptions,
    ) -> Self {
        Self::new(HostKind::Widget, None, process, delegate, routing_id, options)
    }

    fn new(
        kind: HostKind,
        site: Option<SiteId>,
        process: Rc<dyn RenderProcessHost>,
        delegate: Rc<dyn PaintDelegate>,
        routing_id: RoutingId,
        options: HostOptions,
    ) -> Self {
        let tag = new_correlation_id();
        debug!(%routing_id, ?kind, host = %tag, "render host created");
        Self {
            kind,
            routing_id,
            site,
            tag,
            process,
            delegate,
            view: None,
            negotiator: ResizeNegotiator::new(options.await_initial_resize_ack),
            options,
            renderer_initialized: false,
        }
    }

    pub fn kind(&self) -> HostKind {
        self.kind
    }

    pub fn routing_id(&self) -> RoutingId {
        self.routing_id
    }

    pub fn site(&self) -> Option<&SiteId> {
        self.site.as_ref()
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    /// Attach the view. Only a weak reference is kept.
    pub fn set_view(&mut self, view: Weak<dyn HostView>) {
        self.view = Some(view);
    }

    pub fn clear_view(&mut self) {
        self.view = None;
    }

    /// The view, if it is still alive.
    pub fn view(&self) -> Option<Rc<dyn HostView>> {
        self.view.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_renderer_initialized(&mut self, initialized: bool) {
        self.renderer_initialized = initialized;
    }

    pub fn renderer_initialized(&self) -> bool {
        self.renderer_initialized
    }

    /// Last size the renderer reported painting at.
    pub fn current_size(&self) -> ViewportSize {
        self.negotiator.current_size()
    }

    pub fn pending_resize(&self) -> Option<ViewportSize> {
        self.negotiator.in_flight()
    }

    pub fn resize_ack_pending(&self) -> bool {
        self.negotiator.ack_pending()
    }

    /// Ask the renderer for the view's current size if a resize is due.
    pub fn maybe_request_resize(&mut self) -> ResizeOutcome {
        let view = self.view();
        let gate = ResizeGate {
            connected: self.process.has_connection(),
            renderer_initialized: self.renderer_initialized,
            desired: view.as_ref().map(|v| v.viewport_bounds().size()),
        };
        let reserved_area = view
            .as_ref()
            .and_then(|v| v.reserved_area())
            .unwrap_or(self.options.reserved_area);
        let routing_id = self.routing_id;
        let process = Rc::clone(&self.process);

        let outcome = self.negotiator.maybe_request_resize(gate, |new_size| {
            process.send(OutboundMessage::Resize {
                routing_id,
                new_size,
                reserved_area,
            })
        });

        match outcome {
            ResizeOutcome::Sent(size) => {
                debug!(%routing_id, host = %self.tag, %size, "resize requested");
            }
            ResizeOutcome::SendFailed(size) => {
                warn!(%routing_id, host = %self.tag, %size, "resize request could not be sent");
            }
            ResizeOutcome::Skipped(reason) => {
                trace!(%routing_id, host = %self.tag, ?reason, "no resize sent");
            }
        }
        outcome
    }

    /// Report a protocol violation to the process host and hand it back.
    fn protocol_violation(&self, err: ProtocolError) -> ProtocolError {
        warn!(routing_id = %self.routing_id, host = %self.tag, error = %err, "bad message from renderer");
        self.process.received_bad_message(err.kind());
        err
    }

    fn send_ack(&self, message: OutboundMessage) -> bool {
        let name = message.name();
        let sent = self.process.send(message);
        if !sent {
            warn!(routing_id = %self.routing_id, host = %self.tag, ack = name, "ack could not be sent");
        }
        sent
    }
}

impl PaintTransportSink for RenderHost {
    fn apply_scroll(&mut self, event: &ScrollRectEvent) -> Result<ApplyReport, ProtocolError> {
        self.on_scroll_rect(event)
    }

    fn apply_paint(&mut self, event: &PaintRectEvent) -> Result<ApplyReport, ProtocolError> {
        self.on_paint_rect(event)
    }

    fn request_resize(&mut self) -> ResizeOutcome {
        self.maybe_request_resize()
    }
}
