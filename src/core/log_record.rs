//! Canonical log record

use super::call::LogCall;
use super::extractor::{extract, Extraction};
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Local};
use serde_json::{Map, Value};

/// One call, ready to render
///
/// Built fresh for each sink and dropped once rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub tag: String,
    /// The caller's message, without text fragments appended
    pub message: String,
    /// Structured data without `message` or carrier keys; holds `stack`
    /// only when no error stack was promoted
    pub extras: Map<String, Value>,
    pub stack: Option<String>,
    /// Text arguments, printed after the message by the human renderer
    pub fragments: Vec<String>,
    /// Whether the human renderer adds timestamp, level and tag columns
    pub decorated: bool,
}

impl LogRecord {
    /// Build a record from a call's parts and its extraction
    ///
    /// A missing tag becomes an empty string.
    pub fn build(
        level: LogLevel,
        at: &DateTime<Local>,
        timestamp_format: &TimestampFormat,
        message: impl Into<String>,
        extraction: Extraction,
    ) -> Self {
        let Extraction {
            fragments,
            mut extras,
            stack,
            tag,
            decorated,
        } = extraction;

        extras.remove("message");

        Self {
            timestamp: timestamp_format.format(at),
            level,
            tag: tag.unwrap_or_default(),
            message: message.into(),
            extras,
            stack,
            fragments,
            decorated,
        }
    }

    /// Extract and build in one step
    pub fn from_call(call: &LogCall, timestamp_format: &TimestampFormat) -> Self {
        Self::build(
            call.level,
            &call.at,
            timestamp_format,
            call.message.clone(),
            extract(call),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::call::CallMetadata;
    use crate::core::log_arg::{ErrorInfo, LogArg};
    use serde_json::json;

    #[test]
    fn test_plain_call_record() {
        let call = LogCall::new(LogLevel::Info, "test").with_meta(CallMetadata::new("tag"));
        let record = LogRecord::from_call(&call, &TimestampFormat::Local);
        assert_eq!(record.message, "test");
        assert_eq!(record.tag, "tag");
        assert!(record.extras.is_empty());
        assert!(record.stack.is_none());
        assert!(record.decorated);
    }

    #[test]
    fn test_message_stays_clean() {
        let call = LogCall::new(LogLevel::Info, "count")
            .with_args(vec![LogArg::from(3), LogArg::from("items")]);
        let record = LogRecord::from_call(&call, &TimestampFormat::Local);
        assert_eq!(record.message, "count");
        assert_eq!(record.fragments, vec!["3", "items"]);
    }

    #[test]
    fn test_error_fields_promoted() {
        let call = LogCall::new(LogLevel::Error, "Failure: ")
            .with_args(vec![LogArg::from(ErrorInfo::new("boom", "Error: boom"))]);
        let record = LogRecord::from_call(&call, &TimestampFormat::Local);
        assert_eq!(record.stack.as_deref(), Some("Error: boom"));
        assert!(!record.extras.contains_key("message"));
        assert!(!record.extras.contains_key("stack"));
    }

    #[test]
    fn test_data_message_key_dropped() {
        let call = LogCall::new(LogLevel::Info, "primary")
            .with_args(vec![LogArg::from(json!({"message": "shadow", "k": 1}))]);
        let record = LogRecord::from_call(&call, &TimestampFormat::Local);
        assert_eq!(record.message, "primary");
        assert_eq!(Value::Object(record.extras), json!({"k": 1}));
    }

    #[test]
    fn test_missing_tag_is_empty() {
        let call = LogCall::new(LogLevel::Info, "x").with_args(vec![LogArg::from("y")]);
        let record = LogRecord::from_call(&call, &TimestampFormat::Local);
        assert_eq!(record.tag, "");
    }

    #[test]
    fn test_timestamp_uses_call_instant() {
        let call = LogCall::new(LogLevel::Info, "x");
        let a = LogRecord::from_call(&call, &TimestampFormat::UnixMillis);
        let b = LogRecord::from_call(&call, &TimestampFormat::UnixMillis);
        assert_eq!(a.timestamp, b.timestamp);
        assert_eq!(a.timestamp, call.at.timestamp_millis().to_string());
    }
}
