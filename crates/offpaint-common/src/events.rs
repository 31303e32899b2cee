use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{HostKind, RoutingId};

/// Host lifecycle notifications published by the host registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostEvent {
    FactoryRegistered,
    FactoryUnregistered,
    HostCreated { routing_id: RoutingId, kind: HostKind },
    HostDestroyed { routing_id: RoutingId },
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<HostEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.sender.subscribe()
    }

    /// Publish to every subscriber; returns how many received it.
    pub fn publish(&self, event: HostEvent) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(?event, "host event dropped: no subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
