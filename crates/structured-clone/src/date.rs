//! Date objects
//!
//! A date is a single time value: milliseconds since the Unix epoch, or NaN
//! for an invalid date.

use chrono::{DateTime, SecondsFormat, Utc};
use std::cell::Cell;

/// Largest magnitude of a valid time value (ECMA-262 TimeClip)
pub const MAX_TIME_VALUE: f64 = 8.64e15;

/// A JavaScript Date
#[derive(Debug)]
pub struct JsDate {
    time: Cell<f64>,
}

fn time_clip(ms: f64) -> f64 {
    if !ms.is_finite() || ms.abs() > MAX_TIME_VALUE {
        return f64::NAN;
    }
    // trunc, and normalize -0 to +0
    ms.trunc() + 0.0
}

impl JsDate {
    /// Create a date from a millisecond time value
    pub fn from_millis(ms: f64) -> Self {
        Self {
            time: Cell::new(time_clip(ms)),
        }
    }

    /// Current time
    pub fn now() -> Self {
        Self::from_millis(Utc::now().timestamp_millis() as f64)
    }

    /// Parse an RFC 3339 timestamp, e.g. `2015-05-06T23:27:37.535Z`.
    /// Unparseable input yields an invalid date, like `new Date("garbage")`.
    pub fn parse(text: &str) -> Self {
        match DateTime::parse_from_rfc3339(text) {
            Ok(dt) => Self::from_millis(dt.timestamp_millis() as f64),
            Err(_) => Self::from_millis(f64::NAN),
        }
    }

    /// Milliseconds since the epoch (NaN when invalid)
    pub fn time_value(&self) -> f64 {
        self.time.get()
    }

    /// Replace the time value
    pub fn set_time_value(&self, ms: f64) {
        self.time.set(time_clip(ms));
    }

    /// Whether the date holds a valid time
    pub fn is_valid(&self) -> bool {
        !self.time.get().is_nan()
    }

    /// ISO 8601 form in UTC with millisecond precision. `None` for invalid dates.
    pub fn to_iso_string(&self) -> Option<String> {
        if !self.is_valid() {
            return None;
        }
        DateTime::<Utc>::from_timestamp_millis(self.time.get() as i64)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_iso_string() {
        let date = JsDate::parse("2015-05-06T23:27:37.535Z");
        assert_eq!(date.time_value(), 1_430_954_857_535.0);
        assert_eq!(
            date.to_iso_string().as_deref(),
            Some("2015-05-06T23:27:37.535Z")
        );
    }

    #[test]
    fn test_invalid_dates() {
        let date = JsDate::parse("not a date");
        assert!(!date.is_valid());
        assert_eq!(date.to_iso_string(), None);
        assert!(!JsDate::from_millis(MAX_TIME_VALUE * 2.0).is_valid());
    }

    #[test]
    fn test_time_clip_truncates() {
        let date = JsDate::from_millis(1.9);
        assert_eq!(date.time_value(), 1.0);
        date.set_time_value(-0.5);
        assert!(date.time_value().is_sign_positive());
    }
}
