//! Full configuration validation.
//!
//! Checks every numeric range and collects all failures into a single
//! `ConfigError`.

mod helpers;


use crate::schema::OffpaintConfig;
use helpers::{validate_non_negative, validate_range};
use offpaint_common::ConfigError;

/// Largest viewport edge the demo will ask a renderer for.
pub const MAX_VIEWPORT_EDGE: u32 = 16_384;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &OffpaintConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    let area = &config.host.reserved_area;
    validate_non_negative(&mut errors, "host.reserved_area.width", area.width);
    validate_non_negative(&mut errors, "host.reserved_area.height", area.height);

    let demo = &config.demo;
    validate_range(&mut errors, "demo.initial_width", demo.initial_width, 1, MAX_VIEWPORT_EDGE);
    validate_range(&mut errors, "demo.initial_height", demo.initial_height, 1, MAX_VIEWPORT_EDGE);
    validate_range(&mut errors, "demo.frames", demo.frames, 1, 10_000);
    validate_range(&mut errors, "demo.scroll_step", demo.scroll_step, 0, 4096);
    validate_range(&mut errors, "demo.resize_every", demo.resize_every, 1, 1000);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
