//! Input validation for rules and samples.
//!
//! Every check returns `CoreError::Validation` naming the offending field.

use crate::comparator::Comparator;
use crate::error::CoreError;

/// Reject a missing or blank required string field.
pub fn require_text<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("{name} is required"))),
    }
}

/// Reject NaN and infinities.
pub fn require_finite(value: f64, name: &str) -> Result<f64, CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!("{name} must be a number")));
    }
    Ok(value)
}

/// Parse a numeric string the way a JSON client would expect (`"95"`, `" 1.5 "`).
pub fn parse_number(raw: &str, name: &str) -> Result<f64, CoreError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CoreError::Validation(format!("{name} must be a number")))
        .and_then(|v| require_finite(v, name))
}

/// Cooldowns must be finite and non-negative. Absent means zero.
pub fn validate_cooldown(cooldown_seconds: Option<f64>) -> Result<f64, CoreError> {
    let Some(cooldown) = cooldown_seconds else {
        return Ok(0.0);
    };
    if !cooldown.is_finite() || cooldown < 0.0 {
        return Err(CoreError::Validation(
            "cooldown_seconds must be a non-negative number".to_string(),
        ));
    }
    Ok(cooldown)
}

/// Parse a comparator tag, rejecting anything outside the fixed set.
pub fn validate_comparator(tag: &str) -> Result<Comparator, CoreError> {
    tag.trim().parse()
}
