pub mod alert_events;
pub mod alerts;
pub mod metrics;

use serde::Deserialize;
use tripwire_core::error::CoreError;
use tripwire_core::validation::{parse_number, require_finite};

/// A numeric field that clients may send as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Resolve to a finite `f64`, naming `field` in the validation error.
    pub fn resolve(&self, field: &str) -> Result<f64, CoreError> {
        match self {
            NumericInput::Number(n) => require_finite(*n, field),
            NumericInput::Text(s) => parse_number(s, field),
        }
    }
}

/// Resolve an optional numeric field.
pub(crate) fn resolve_optional(
    input: Option<&NumericInput>,
    field: &str,
) -> Result<Option<f64>, CoreError> {
    input.map(|n| n.resolve(field)).transpose()
}
