//! Resize negotiation: at most one resize request in flight, cleared by the
//! renderer's resize-ack paint.

use offpaint_common::{MessageKind, ProtocolError, ViewportSize};

/// Why a resize request was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A request is already out and not yet acknowledged.
    InFlight,
    NotConnected,
    RendererNotInitialized,
    /// The view is gone.
    NoView,
    /// The desired size is the size the renderer already has.
    Unchanged,
    /// Zero-area viewports have nothing to paint, so no ack would come.
    EmptySize,
}

/// What a call to [`ResizeNegotiator::maybe_request_resize`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Sent(ViewportSize),
    SendFailed(ViewportSize),
    Skipped(SkipReason),
}

impl ResizeOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

/// Conditions outside the negotiator that gate a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeGate {
    pub connected: bool,
    pub renderer_initialized: bool,
    /// `None` when there is no view to ask.
    pub desired: Option<ViewportSize>,
}

#[derive(Debug, Clone)]
pub struct ResizeNegotiator {
    ack_pending: bool,
    in_flight: Option<ViewportSize>,
    current_size: ViewportSize,
}

impl ResizeNegotiator {
    /// `await_initial_ack` starts the negotiator expecting the renderer's
    /// initial size handshake.
    pub fn new(await_initial_ack: bool) -> Self {
        Self {
            ack_pending: await_initial_ack,
            in_flight: None,
            current_size: ViewportSize::EMPTY,
        }
    }

    pub fn ack_pending(&self) -> bool {
        self.ack_pending
    }

    pub fn in_flight(&self) -> Option<ViewportSize> {
        self.in_flight
    }

    pub fn current_size(&self) -> ViewportSize {
        self.current_size
    }

    pub fn record_current_size(&mut self, size: ViewportSize) {
        self.current_size = size;
    }

    /// Send a resize through `send` if one is due.
    ///
    /// `send` returns whether the message left the host. A failed send
    /// clears the ack-pending flag, since no ack can come for it.
    pub fn maybe_request_resize<F>(&mut self, gate: ResizeGate, send: F) -> ResizeOutcome
    where
        F: FnOnce(ViewportSize) -> bool,
    {
        // An unacknowledged request of ours; the initial handshake alone
        // (ack pending, nothing in flight) does not block.
        if self.in_flight.is_some() {
            return ResizeOutcome::Skipped(SkipReason::InFlight);
        }
        if !gate.connected {
            return ResizeOutcome::Skipped(SkipReason::NotConnected);
        }
        if !gate.renderer_initialized {
            return ResizeOutcome::Skipped(SkipReason::RendererNotInitialized);
        }
        let Some(desired) = gate.desired else {
            return ResizeOutcome::Skipped(SkipReason::NoView);
        };
        if desired == self.current_size {
            return ResizeOutcome::Skipped(SkipReason::Unchanged);
        }
        if desired.is_empty() {
            return ResizeOutcome::Skipped(SkipReason::EmptySize);
        }

        self.ack_pending = true;
        if send(desired) {
            self.in_flight = Some(desired);
            ResizeOutcome::Sent(desired)
        } else {
            self.ack_pending = false;
            ResizeOutcome::SendFailed(desired)
        }
    }

    /// Consume a resize ack. Returns the size that was in flight, if any.
    pub fn acknowledge(&mut self) -> Result<Option<ViewportSize>, ProtocolError> {
        if !self.ack_pending {
            return Err(ProtocolError::UnexpectedResizeAck {
                kind: MessageKind::PaintRect,
            });
        }
        self.ack_pending = false;
        Ok(self.in_flight.take())
    }
}
