//! Logging settings.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` filter directive for the workspace crates.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Debug => "offpaint=debug",
            Self::Info => "offpaint=info",
            Self::Warning => "offpaint=warn",
            Self::Error => "offpaint=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
