//! Positional arguments of a log call
//!
//! Every argument that follows the message is classified exactly once, when
//! it is converted into a [`LogArg`]. Downstream code matches on the variant
//! and never inspects argument shape again.

use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error as StdError;

/// An error-shaped argument: its message and a stack-like trace
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub message: String,
    pub stack: String,
    /// Other properties of an error-shaped object, merged like data
    pub fields: Map<String, Value>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: stack.into(),
            fields: Map::new(),
        }
    }

    /// Build from a Rust error
    ///
    /// The stack is the error's message followed by one indented
    /// `caused by:` line per entry of its source chain.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: StdError + ?Sized,
    {
        let message = err.to_string();
        let mut stack = format!("Error: {}", message);
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(message, stack)
    }

    /// Like [`ErrorInfo::from_error`], with the current backtrace appended
    pub fn with_backtrace<E>(err: &E) -> Self
    where
        E: StdError + ?Sized,
    {
        let mut info = Self::from_error(err);
        let backtrace = std::backtrace::Backtrace::force_capture();
        info.stack.push('\n');
        info.stack.push_str(&backtrace.to_string());
        info
    }

    /// Recognize an error-shaped JSON object: one with a non-empty `stack`
    fn from_object(map: &Map<String, Value>) -> Option<Self> {
        let stack = match map.get("stack")? {
            Value::Null => return None,
            Value::String(s) if s.is_empty() => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let message = match map.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let mut fields = map.clone();
        fields.remove("message");
        fields.remove("stack");
        Some(Self {
            message,
            stack,
            fields,
        })
    }
}

/// One positional argument, classified
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    /// Printed literally after the message by human renderers
    Text(String),
    /// Merged into the record's extras
    Data(Map<String, Value>),
    /// Promoted to the record's stack
    Error(ErrorInfo),
}

impl LogArg {
    pub fn text(text: impl Into<String>) -> Self {
        LogArg::Text(text.into())
    }

    /// Serialize any value and classify the result
    ///
    /// A value that fails to serialize is kept as a text placeholder so the
    /// call still logs.
    pub fn data<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => LogArg::from(v),
            Err(e) => LogArg::Text(format!("<unserializable: {}>", e)),
        }
    }

    pub fn error<E>(err: &E) -> Self
    where
        E: StdError + ?Sized,
    {
        LogArg::Error(ErrorInfo::from_error(err))
    }
}

impl From<Value> for LogArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => match ErrorInfo::from_object(&map) {
                Some(info) => LogArg::Error(info),
                None => LogArg::Data(map),
            },
            Value::String(s) => LogArg::Text(s),
            other => LogArg::Text(other.to_string()),
        }
    }
}

impl From<Map<String, Value>> for LogArg {
    fn from(map: Map<String, Value>) -> Self {
        LogArg::from(Value::Object(map))
    }
}

impl From<ErrorInfo> for LogArg {
    fn from(info: ErrorInfo) -> Self {
        LogArg::Error(info)
    }
}

impl From<String> for LogArg {
    fn from(s: String) -> Self {
        LogArg::Text(s)
    }
}

impl From<&str> for LogArg {
    fn from(s: &str) -> Self {
        LogArg::Text(s.to_string())
    }
}

impl From<&String> for LogArg {
    fn from(s: &String) -> Self {
        LogArg::Text(s.clone())
    }
}

macro_rules! text_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogArg {
                fn from(value: $ty) -> Self {
                    LogArg::Text(value.to_string())
                }
            }
        )*
    };
}

text_from_display!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);
    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }
    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection reset")
        }
    }
    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }
    impl StdError for Inner {}

    #[test]
    fn test_classify_json_object() {
        let arg = LogArg::from(json!({"a": 1}));
        assert!(matches!(arg, LogArg::Data(ref m) if m["a"] == 1));
    }

    #[test]
    fn test_classify_error_shaped_object() {
        let arg = LogArg::from(json!({"message": "boom", "stack": "Error: boom\n    at main", "code": 7}));
        match arg {
            LogArg::Error(info) => {
                assert_eq!(info.message, "boom");
                assert_eq!(info.stack, "Error: boom\n    at main");
                assert_eq!(info.fields["code"], 7);
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_stack_is_plain_data() {
        let arg = LogArg::from(json!({"stack": ""}));
        assert!(matches!(arg, LogArg::Data(_)));
    }

    #[test]
    fn test_primitives_become_text() {
        assert_eq!(LogArg::from(json!("plain")), LogArg::Text("plain".into()));
        assert_eq!(LogArg::from(json!(42)), LogArg::Text("42".into()));
        assert_eq!(LogArg::from(json!([1, 2])), LogArg::Text("[1,2]".into()));
        assert_eq!(LogArg::from(3.5_f64), LogArg::Text("3.5".into()));
        assert_eq!(LogArg::from(true), LogArg::Text("true".into()));
    }

    #[test]
    fn test_error_chain_in_stack() {
        let info = ErrorInfo::from_error(&Outer(Inner));
        assert_eq!(info.message, "request failed");
        assert_eq!(info.stack, "Error: request failed\n    caused by: connection reset");
    }

    #[test]
    fn test_data_from_serialize() {
        #[derive(Serialize)]
        struct Req {
            path: &'static str,
            status: u16,
        }
        let arg = LogArg::data(&Req { path: "/", status: 200 });
        assert!(matches!(arg, LogArg::Data(ref m) if m["status"] == 200));
    }
}
