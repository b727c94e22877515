//! Input validation helpers
//!
//! Limits are chosen for the host-stand form and the kiosk table column.

use crate::core::{EngineError, EngineResult};

/// Party names shown on the waitlist
pub const MAX_NAME_LEN: usize = 200;

/// Scan source codes (table id printed on the QR sticker)
pub const MAX_SOURCE_LEN: usize = 64;

/// Longest quoted wait: one day
pub const MAX_ESTIMATED_WAIT_MINUTES: i64 = 24 * 60;

/// Validate that a required string is non-empty and within the length limit.
/// Returns the trimmed value.
pub fn validate_required_text<'a>(
    value: &'a str,
    field: &'static str,
    max_len: usize,
) -> EngineResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::invalid_input(
            field,
            format!("{field} must not be empty"),
        ));
    }
    if trimmed.chars().count() > max_len {
        return Err(EngineError::invalid_input(
            field,
            format!(
                "{field} is too long ({} chars, max {max_len})",
                trimmed.chars().count()
            ),
        ));
    }
    Ok(trimmed)
}

/// Validate an integer lies in `min..=max` and fits a `u32`
pub fn validate_range(value: i64, field: &'static str, min: i64, max: i64) -> EngineResult<u32> {
    if value < min || value > max {
        return Err(EngineError::invalid_input(
            field,
            format!("{field} must be between {min} and {max}, got {value}"),
        ));
    }
    u32::try_from(value).map_err(|_| {
        EngineError::invalid_input(field, format!("{field} is out of range, got {value}"))
    })
}

/// Normalise an optional scan source: trimmed, empty → `None`, over-long values
/// are truncated rather than rejected so a scan is never lost.
pub fn normalize_source(source: Option<&str>) -> Option<String> {
    let trimmed = source?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_SOURCE_LEN).collect())
}
