//! Host side of the off-screen paint transport.
//!
//! The renderer draws into shared bitmaps and tells the host about each
//! delta with a scroll or paint message. A [`RenderHost`] validates those
//! messages, copies the pixels into the embedder's backing store through a
//! [`PaintDelegate`], acknowledges every transfer so the renderer may reuse
//! the bitmap, and keeps at most one resize request in flight.
//!
//! Hosts for page views come from whichever [`HostFactory`] is registered
//! with the [`FactoryRegistry`]; [`HostRegistry`] tracks the live ones.

pub mod factory;
pub mod host;
pub mod messages;
pub mod registry;
pub mod transport;
pub mod view;

#[cfg(test)]
mod testing;

pub use factory::{FactoryRegistration, FactoryRegistry, HostContext, HostFactory, MemoryHostFactory};
pub use host::{
    ApplyReport, BitmapDisposition, DispatchResult, HostOptions, PaintTransportSink, RenderHost,
    ResizeOutcome, SkipReason,
};
pub use messages::{
    OutboundMessage, PaintFlags, PaintRectEvent, RawMessage, ScrollRectEvent, SubWindowMove,
};
pub use registry::HostRegistry;
pub use transport::{RenderProcessHost, SharedBitmap};
pub use view::{HostView, PaintDelegate, SurfaceRect};
