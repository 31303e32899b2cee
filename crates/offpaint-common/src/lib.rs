//! Shared types for the offpaint workspace.
//!
//! Geometry and identifier types that cross the host/renderer boundary,
//! the error enums every crate reports through, and the host lifecycle
//! event bus.

pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, OffpaintError, ProtocolError, RegistryError};
pub use events::{EventBus, HostEvent};
pub use id::{new_correlation_id, SiteId};
pub use types::{BitmapId, HostKind, MessageKind, Rect, RoutingId, ViewportSize, BYTES_PER_PIXEL};

pub type Result<T> = std::result::Result<T, OffpaintError>;
