//! Timestamp formatting utilities
//!
//! Records carry their timestamp as a rendered string. The instant itself is
//! captured once per call, then each sink renders it with its own format.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// strftime pattern of the default local format: `2025-01-08 10:30:45.123 +0200`
///
/// The hour is on a 12-hour clock (`%I`), matching the `hh` token the
/// archived logs have always used.
pub const LOCAL_PATTERN: &str = "%Y-%m-%d %I:%M:%S%.3f %z";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use tagged_logger::core::TimestampFormat;
/// use chrono::Local;
///
/// let format = TimestampFormat::Local;
/// let timestamp = format.format(&Local::now());
/// assert_eq!(timestamp.len(), "2025-01-08 10:30:45.123 +0000".len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local time with milliseconds and numeric offset: `2025-01-08 10:30:45.123 +0200`
    #[default]
    Local,

    /// ISO 8601 in UTC with milliseconds: `2025-01-08T08:30:45.123Z`
    Iso8601,

    /// RFC 3339 in local time: `2025-01-08T10:30:45.123+02:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format applied to local time
    Custom(String),
}

impl TimestampFormat {
    /// Format a local `DateTime` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::Local => datetime.format(LOCAL_PATTERN).to_string(),
            TimestampFormat::Iso8601 => datetime
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(chrono::SecondsFormat::Millis, false),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}
