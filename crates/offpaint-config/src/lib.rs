//! offpaint configuration.
//!
//! TOML-based configuration with validation. Every section uses serde
//! defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{OffpaintConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use offpaint_common::ConfigError;

/// Load config from the platform default path, creating it if missing,
/// and validate the result.
pub fn load_config() -> Result<OffpaintConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<OffpaintConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &OffpaintConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
