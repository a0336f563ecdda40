//! The explicit call object handed to every sink
//!
//! A [`LogCall`] bundles what the caller passed (level, message, positional
//! arguments) with what the [`Logger`](super::Logger) knows about itself
//! ([`CallMetadata`]). Metadata travels beside the arguments, never inside them.

use super::log_arg::LogArg;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Reserved key carrying a tag inside structured data
pub const TAG_KEY: &str = "__tag__";

/// Reserved key carrying default fields inside structured data
pub const EXTRA_FIELDS_KEY: &str = "__extra_fields__";

/// Tag and default fields of the logger that issued a call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallMetadata {
    pub tag: String,
    pub extra_fields: Arc<Map<String, Value>>,
}

impl CallMetadata {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            extra_fields: Arc::new(Map::new()),
        }
    }

    #[must_use]
    pub fn with_extra_fields(mut self, fields: Arc<Map<String, Value>>) -> Self {
        self.extra_fields = fields;
        self
    }
}

/// Positional arguments following the message
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CallArgs {
    /// The call had no argument list at all
    #[default]
    Absent,
    List(Vec<LogArg>),
    /// Arguments arrived in a shape that is not a list
    Malformed(Value),
}

impl CallArgs {
    /// Interpret a JSON value as an argument list
    ///
    /// Arrays are classified element by element, `null` means no arguments,
    /// and anything else is kept as [`CallArgs::Malformed`].
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => CallArgs::List(items.into_iter().map(LogArg::from).collect()),
            Value::Null => CallArgs::Absent,
            other => CallArgs::Malformed(other),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CallArgs::Absent)
    }
}

impl From<Vec<LogArg>> for CallArgs {
    fn from(args: Vec<LogArg>) -> Self {
        CallArgs::List(args)
    }
}

/// One log call, as seen by sinks
#[derive(Debug, Clone)]
pub struct LogCall {
    pub level: LogLevel,
    pub message: String,
    pub args: CallArgs,
    pub meta: Option<CallMetadata>,
    /// Instant of the call, shared by every sink that renders it
    pub at: DateTime<Local>,
}

impl LogCall {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            args: CallArgs::Absent,
            meta: None,
            at: Local::now(),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: impl Into<CallArgs>) -> Self {
        self.args = args.into();
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: CallMetadata) -> Self {
        self.meta = Some(meta);
        self
    }

    #[must_use]
    pub fn at(mut self, at: DateTime<Local>) -> Self {
        self.at = at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_args_from_json_array() {
        let args = CallArgs::from_json(json!(["text", {"a": 1}]));
        match args {
            CallArgs::List(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0], LogArg::Text("text".into()));
                assert!(matches!(items[1], LogArg::Data(_)));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_args_from_json_non_array() {
        assert!(CallArgs::from_json(Value::Null).is_absent());
        assert!(matches!(
            CallArgs::from_json(json!({"0": "sparse"})),
            CallArgs::Malformed(_)
        ));
    }

    #[test]
    fn test_call_builder() {
        let call = LogCall::new(LogLevel::Warn, "disk low")
            .with_args(vec![LogArg::from(91)])
            .with_meta(CallMetadata::new("storage"));
        assert_eq!(call.level, LogLevel::Warn);
        assert_eq!(call.meta.as_ref().map(|m| m.tag.as_str()), Some("storage"));
        assert!(!call.args.is_absent());
    }
}
