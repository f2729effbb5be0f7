//! Cooldown gate applied before a rule's comparator is evaluated.

use crate::types::Timestamp;

/// Seconds elapsed between `since` and `now`, with microsecond precision.
///
/// Negative when `now` is earlier than `since` (an out-of-order sample).
pub fn elapsed_seconds(since: Timestamp, now: Timestamp) -> f64 {
    let elapsed = now.signed_duration_since(since);
    match elapsed.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        // Only overflows past ~292k years.
        None => elapsed.num_milliseconds() as f64 / 1000.0,
    }
}

/// Whether a rule with `cooldown_seconds` that last fired at `last_triggered`
/// must be skipped for a sample evaluated at `now`.
///
/// A zero cooldown or a rule that never fired is never suppressed.
pub fn is_cooling_down(
    cooldown_seconds: f64,
    last_triggered: Option<Timestamp>,
    now: Timestamp,
) -> bool {
    if cooldown_seconds <= 0.0 {
        return false;
    }
    match last_triggered {
        Some(last) => elapsed_seconds(last, now) < cooldown_seconds,
        None => false,
    }
}

/// The later of two optional trigger times.
pub fn latest(a: Option<Timestamp>, b: Option<Timestamp>) -> Option<Timestamp> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn t(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn zero_cooldown_never_suppresses() {
        assert!(!is_cooling_down(0.0, Some(t(0)), t(0)));
    }

    #[test]
    fn never_triggered_is_not_suppressed() {
        assert!(!is_cooling_down(60.0, None, t(0)));
    }

    #[test]
    fn suppressed_inside_window() {
        assert!(is_cooling_down(60.0, Some(t(0)), t(30)));
        assert!(is_cooling_down(60.0, Some(t(0)), t(59)));
    }

    #[test]
    fn released_at_exact_boundary() {
        assert!(!is_cooling_down(60.0, Some(t(0)), t(60)));
        assert!(!is_cooling_down(60.0, Some(t(0)), t(61)));
    }

    #[test]
    fn fractional_cooldown_uses_millisecond_precision() {
        let last = t(0);
        assert!(is_cooling_down(1.5, Some(last), last + Duration::milliseconds(1499)));
        assert!(!is_cooling_down(1.5, Some(last), last + Duration::milliseconds(1500)));
    }

    #[test]
    fn sub_millisecond_cooldown_is_not_rounded_up() {
        let last = t(0);
        let now = last + Duration::microseconds(600);
        assert!(elapsed_seconds(last, now) > 0.0005);
        assert!(!is_cooling_down(0.0005, Some(last), now));
        assert!(is_cooling_down(0.0005, Some(last), last + Duration::microseconds(400)));
    }

    #[test]
    fn out_of_order_sample_is_suppressed() {
        assert!(elapsed_seconds(t(10), t(0)) < 0.0);
        assert!(is_cooling_down(60.0, Some(t(10)), t(0)));
    }

    #[test]
    fn latest_prefers_later_value() {
        assert_eq!(latest(Some(t(1)), Some(t(5))), Some(t(5)));
        assert_eq!(latest(Some(t(5)), None), Some(t(5)));
        assert_eq!(latest(None, Some(t(2))), Some(t(2)));
        assert_eq!(latest(None, None), None);
    }
}
