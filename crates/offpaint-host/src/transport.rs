//! The render-process side of the transport, as seen by a host.

use std::fmt;
use std::ops::Deref;

use offpaint_common::{BitmapId, MessageKind};

use crate::messages::OutboundMessage;

/// Read access to a renderer-allocated shared bitmap.
///
/// The memory stays owned by the transport. A host holds one of these only
/// for the duration of a single validate-then-apply step.
pub struct SharedBitmap<'a> {
    id: BitmapId,
    memory: Box<dyn Deref<Target = [u8]> + 'a>,
}

impl<'a> SharedBitmap<'a> {
    pub fn new(id: BitmapId, memory: impl Deref<Target = [u8]> + 'a) -> Self {
        Self {
            id,
            memory: Box::new(memory),
        }
    }

    pub fn id(&self) -> BitmapId {
        self.id
    }

    /// Declared capacity in bytes.
    pub fn size(&self) -> usize {
        self.memory.len()
    }

    pub fn memory(&self) -> &[u8] {
        &**self.memory
    }
}

impl fmt::Debug for SharedBitmap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBitmap")
            .field("id", &self.id)
            .field("size", &self.size())
            .finish()
    }
}

/// The process host a render host talks through.
///
/// Owns the connection lifecycle and the policy for renderers that send bad
/// messages; hosts only report.
pub trait RenderProcessHost {
    fn has_connection(&self) -> bool;

    /// Look up a shared bitmap the renderer registered under `id`.
    fn shared_bitmap(&self, id: BitmapId) -> Option<SharedBitmap<'_>>;

    /// The renderer sent a message of `kind` that breaks the protocol.
    fn received_bad_message(&self, kind: MessageKind);

    /// Queue a message for the renderer. `false` if it could not be sent.
    fn send(&self, message: OutboundMessage) -> bool;
}
