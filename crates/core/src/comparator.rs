//! Relational operators a rule applies between a sample value and its threshold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The comparison a rule performs. Stored and transmitted as a short tag
/// (`GT`, `GTE`, `LT`, `LTE`, `EQ`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "GT")]
    GreaterThan,
    #[serde(rename = "GTE")]
    GreaterOrEqual,
    #[serde(rename = "LT")]
    LessThan,
    #[serde(rename = "LTE")]
    LessOrEqual,
    #[serde(rename = "EQ")]
    Equal,
}

impl Comparator {
    /// Every comparator, in the order validation errors list them
    /// (`GT,LT,GTE,LTE,EQ`).
    pub const ALL: [Comparator; 5] = [
        Comparator::GreaterThan,
        Comparator::LessThan,
        Comparator::GreaterOrEqual,
        Comparator::LessOrEqual,
        Comparator::Equal,
    ];

    /// Apply the comparator to `(value, threshold)`.
    ///
    /// `Equal` is exact floating-point equality; values that only differ by
    /// rounding error do not match.
    pub fn evaluate(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::GreaterThan => value > threshold,
            Comparator::GreaterOrEqual => value >= threshold,
            Comparator::LessThan => value < threshold,
            Comparator::LessOrEqual => value <= threshold,
            Comparator::Equal => value == threshold,
        }
    }

    /// The storage / wire tag for this comparator.
    pub fn as_tag(self) -> &'static str {
        match self {
            Comparator::GreaterThan => "GT",
            Comparator::GreaterOrEqual => "GTE",
            Comparator::LessThan => "LT",
            Comparator::LessOrEqual => "LTE",
            Comparator::Equal => "EQ",
        }
    }

    /// Comma-separated list of accepted tags, for error messages.
    pub fn allowed_tags() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_tag())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Comparator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GT" => Ok(Comparator::GreaterThan),
            "GTE" => Ok(Comparator::GreaterOrEqual),
            "LT" => Ok(Comparator::LessThan),
            "LTE" => Ok(Comparator::LessOrEqual),
            "EQ" => Ok(Comparator::Equal),
            other => Err(CoreError::Validation(format!(
                "comparator must be one of: {} (got '{other}')",
                Comparator::allowed_tags()
            ))),
        }
    }
}
