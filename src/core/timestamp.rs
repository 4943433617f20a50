//! Timestamp formatting utilities
//!
//! The `@t` field always uses the round-trip format. The other variants are
//! selected by format specifiers in message templates, e.g. `{At:u}` or
//! `{At:%Y-%m-%d}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use newrelic_log_formatter::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2022, 11, 2, 6, 30, 10).unwrap();
/// assert_eq!(TimestampFormat::RoundTrip.format(&at), "2022-11-02T06:30:10.0000000Z");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Round-trip format with 7 fractional digits: `2022-11-02T06:30:10.5368801Z`
    #[default]
    RoundTrip,

    /// Universal sortable format: `2022-11-02 06:30:10Z`
    Universal,

    /// Sortable format without zone designator: `2022-11-02T06:30:10`
    Sortable,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Resolve a template format specifier
    ///
    /// Returns `None` when the specifier is not a timestamp format, in which
    /// case the value is rendered with the default format.
    #[must_use]
    pub fn from_spec(spec: &str) -> Option<Self> {
        match spec {
            "O" | "o" => Some(TimestampFormat::RoundTrip),
            "u" => Some(TimestampFormat::Universal),
            "s" => Some(TimestampFormat::Sortable),
            custom if custom.contains('%') => Some(TimestampFormat::Custom(custom.to_string())),
            _ => None,
        }
    }

    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::RoundTrip => round_trip(datetime),
            TimestampFormat::Universal => datetime.format("%Y-%m-%d %H:%M:%SZ").to_string(),
            TimestampFormat::Sortable => datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

/// ISO-8601 round-trip rendering with 100ns precision
pub fn round_trip(datetime: &DateTime<Utc>) -> String {
    let ticks = datetime.timestamp_subsec_nanos() / 100;
    format!("{}.{:07}Z", datetime.format("%Y-%m-%dT%H:%M:%S"), ticks)
}
