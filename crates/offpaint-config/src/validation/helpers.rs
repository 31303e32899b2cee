//! Shared range-validation helpers.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if a signed extent is negative.
pub(crate) fn validate_non_negative(errors: &mut Vec<String>, name: &str, value: i32) {
    if value < 0 {
        errors.push(format!("{name} = {value} must not be negative"));
    }
}
