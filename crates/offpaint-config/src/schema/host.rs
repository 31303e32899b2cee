//! Paint transport host settings.

use offpaint_common::Rect;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Platform area the renderer must keep clear (e.g. a window grow box).
    /// Sent with every resize request.
    pub reserved_area: Rect,
    /// Hosts start out waiting for the renderer's initial size handshake.
    pub await_initial_resize_ack: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            reserved_area: Rect::default(),
            await_initial_resize_ack: true,
        }
    }
}
