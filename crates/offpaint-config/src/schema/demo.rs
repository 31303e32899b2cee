//! Settings for the simulated renderer session driven by the binary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Desired viewport width at startup (valid range: 1-16384).
    pub initial_width: u32,
    /// Desired viewport height at startup (valid range: 1-16384).
    pub initial_height: u32,
    /// Number of frames the simulated renderer produces (1-10000).
    pub frames: u32,
    /// Vertical scroll distance per scroll frame, in pixels (0-4096).
    pub scroll_step: u32,
    /// The view grows every N frames (1-1000).
    pub resize_every: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            initial_width: 800,
            initial_height: 600,
            frames: 8,
            scroll_step: 32,
            resize_every: 3,
        }
    }
}
