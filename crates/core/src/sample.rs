//! Incoming metric observations.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::types::Timestamp;

/// One observation of a metric. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub metric_name: String,
    pub value: f64,
    /// Observation time. `None` means "evaluate at wall-clock time".
    pub timestamp: Option<Timestamp>,
}

impl MetricSample {
    pub fn new(metric_name: impl Into<String>, value: f64) -> Self {
        Self {
            metric_name: metric_name.into(),
            value,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The time this sample is evaluated at: its own timestamp if it has one,
    /// otherwise `fallback`.
    pub fn evaluation_time(&self, fallback: Timestamp) -> Timestamp {
        self.timestamp.unwrap_or(fallback)
    }
}

/// Parse a caller-supplied timestamp.
///
/// Accepts RFC 3339 (`2024-05-01T12:00:00Z`, with any offset), a naive
/// date-time (`2024-05-01T12:00:00`, `2024-05-01 12:00:00.250`) read as UTC,
/// and a bare date (`2024-05-01`) read as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse an optional raw timestamp, treating unparseable input as absent.
pub fn parse_optional_timestamp(raw: Option<&str>) -> Option<Timestamp> {
    let raw = raw?;
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        tracing::warn!(timestamp = raw, "Unparseable sample timestamp, using evaluation time");
    }
    parsed
}
