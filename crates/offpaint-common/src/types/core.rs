use serde::{Deserialize, Serialize};
use std::fmt;

/// Routing identity of a host on its render process channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingId(pub i32);

impl fmt::Display for RoutingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque id of a renderer-allocated shared bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitmapId(pub u32);

impl fmt::Display for BitmapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bitmap-{}", self.0)
    }
}

/// Inbound message kinds handled by the paint transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    ScrollRect,
    PaintRect,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScrollRect => "scroll_rect",
            Self::PaintRect => "paint_rect",
        }
    }

    pub fn from_wire(kind: &str) -> Option<Self> {
        match kind {
            "scroll_rect" => Some(Self::ScrollRect),
            "paint_rect" => Some(Self::PaintRect),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which flavour of host owns a routing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    /// Top-level page view.
    View,
    /// Popup widget bound to an existing process.
    Widget,
}
