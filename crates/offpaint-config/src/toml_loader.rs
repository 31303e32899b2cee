//! TOML config file loading and creation.

use crate::schema::OffpaintConfig;
use offpaint_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. Validation is left to the
/// caller.
pub fn load_from_path(path: &Path) -> Result<OffpaintConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: OffpaintConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<OffpaintConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(OffpaintConfig::default());
    }

    load_from_path(&path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("offpaint").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

fn default_config_toml() -> &'static str {
    r##"# offpaint configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[host]
# reserved_area = { x = 0, y = 0, width = 0, height = 0 }
# await_initial_resize_ack = true

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR

[demo]
# initial_width = 800    # 1-16384
# initial_height = 600   # 1-16384
# frames = 8             # 1-10000
# scroll_step = 32       # 0-4096
# resize_every = 3       # 1-1000
"##
}
