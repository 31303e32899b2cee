//! Configuration schema types for offpaint.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod demo;
mod host;
mod system;

pub use demo::*;
pub use host::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OffpaintConfig {
    pub host: HostConfig,
    pub logging: LoggingConfig,
    pub demo: DemoConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use offpaint_common::Rect;

    #[test]
    fn default_host_section() {
        let config = OffpaintConfig::default();
        assert!(config.host.await_initial_resize_ack);
        assert_eq!(config.host.reserved_area, Rect::default());
    }

    #[test]
    fn default_logging_section() {
        let config = OffpaintConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.level.directive(), "offpaint=info");
    }

    #[test]
    fn default_demo_section() {
        let demo = OffpaintConfig::default().demo;
        assert_eq!(demo.initial_width, 800);
        assert_eq!(demo.initial_height, 600);
        assert_eq!(demo.frames, 8);
        assert_eq!(demo.scroll_step, 32);
        assert_eq!(demo.resize_every, 3);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[demo]
frames = 20
"#;
        let config: OffpaintConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.demo.frames, 20);
        assert_eq!(config.demo.initial_width, 800);
        assert!(config.host.await_initial_resize_ack);
    }

    #[test]
    fn reserved_area_from_toml() {
        let toml_str = r#"
[host]
reserved_area = { x = 785, y = 585, width = 15, height = 15 }
await_initial_resize_ack = false
"#;
        let config: OffpaintConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host.reserved_area, Rect::new(785, 585, 15, 15));
        assert!(!config.host.await_initial_resize_ack);
    }

    #[test]
    fn log_level_uppercase_in_toml() {
        let config: OffpaintConfig = toml::from_str("[logging]\nlevel = \"DEBUG\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn empty_toml_is_default() {
        let config: OffpaintConfig = toml::from_str("").unwrap();
        assert_eq!(config.demo.frames, DemoConfig::default().frames);
    }
}
