//! In-memory stand-in for the render process host.

use std::cell::{Cell, Ref, RefCell};
use std::collections::{HashMap, VecDeque};

use offpaint_common::{BitmapId, MessageKind};
use offpaint_host::{OutboundMessage, RenderProcessHost, SharedBitmap};
use tracing::{trace, warn};

/// Holds the shared bitmaps the renderer allocated and queues the host's
/// outbound messages until the renderer reads them.
pub struct SimulatedProcess {
    connected: Cell<bool>,
    bitmaps: RefCell<HashMap<BitmapId, Vec<u8>>>,
    outbox: RefCell<VecDeque<OutboundMessage>>,
    bad_messages: RefCell<Vec<MessageKind>>,
}

impl SimulatedProcess {
    pub fn new() -> Self {
        Self {
            connected: Cell::new(true),
            bitmaps: RefCell::new(HashMap::new()),
            outbox: RefCell::new(VecDeque::new()),
            bad_messages: RefCell::new(Vec::new()),
        }
    }

    /// Make `pixels` available to the host under `id`.
    pub fn publish_bitmap(&self, id: BitmapId, pixels: Vec<u8>) {
        self.bitmaps.borrow_mut().insert(id, pixels);
    }

    pub fn release_bitmap(&self, id: BitmapId) -> bool {
        self.bitmaps.borrow_mut().remove(&id).is_some()
    }

    pub fn live_bitmaps(&self) -> usize {
        self.bitmaps.borrow().len()
    }

    /// Next message the host sent, oldest first.
    pub fn next_outbound(&self) -> Option<OutboundMessage> {
        self.outbox.borrow_mut().pop_front()
    }

    pub fn bad_messages(&self) -> Vec<MessageKind> {
        self.bad_messages.borrow().clone()
    }

    /// Drop the connection. Queued messages and bitmaps go with it.
    pub fn disconnect(&self) {
        self.connected.set(false);
        self.outbox.borrow_mut().clear();
        self.bitmaps.borrow_mut().clear();
    }
}

impl Default for SimulatedProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderProcessHost for SimulatedProcess {
    fn has_connection(&self) -> bool {
        self.connected.get()
    }

    fn shared_bitmap(&self, id: BitmapId) -> Option<SharedBitmap<'_>> {
        Ref::filter_map(self.bitmaps.borrow(), |bitmaps| {
            bitmaps.get(&id).map(Vec::as_slice)
        })
        .ok()
        .map(|memory| SharedBitmap::new(id, memory))
    }

    fn received_bad_message(&self, kind: MessageKind) {
        warn!(%kind, "renderer sent a bad message");
        self.bad_messages.borrow_mut().push(kind);
    }

    fn send(&self, message: OutboundMessage) -> bool {
        if !self.connected.get() {
            return false;
        }
        trace!(message = message.name(), routing_id = %message.routing_id(), "queued for renderer");
        self.outbox.borrow_mut().push_back(message);
        true
    }
}
