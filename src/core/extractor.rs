//! Field extraction: separating text, data and error information
//!
//! Runs once per sink per call, before a record is built.

use super::call::{CallArgs, LogCall, EXTRA_FIELDS_KEY, TAG_KEY};
use super::log_arg::LogArg;
use super::merge::{deep_merge, merge_defaults};
use serde_json::{Map, Value};

/// Result of splitting a call's positional arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Text arguments, in call order
    pub fragments: Vec<String>,
    /// Merged structured data, defaults applied, reserved keys removed
    pub extras: Map<String, Value>,
    /// Stack of the last error-shaped argument
    pub stack: Option<String>,
    /// Tag from call metadata, or from a tag carried inside the data
    pub tag: Option<String>,
    /// False only for a call with neither arguments nor metadata
    pub decorated: bool,
}

impl Extraction {
    /// True when the call contributed no text, data or stack
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.extras.is_empty() && self.stack.is_none()
    }
}

/// Split a call into text fragments, merged extras and an optional stack
///
/// Data arguments are deep-merged left to right, so later arguments win.
/// Only error arguments set the stack, the last one winning; their other
/// properties merge like data. A `stack` key in plain data or defaults is
/// an ordinary field unless an error stack was promoted.
/// Defaults from the call metadata, and from a `__extra_fields__` object
/// found in the data, only fill keys the caller did not set. Malformed
/// argument lists are reported on stderr and treated as empty.
pub fn extract(call: &LogCall) -> Extraction {
    let mut fragments = Vec::new();
    let mut extras = Map::new();
    let mut stack = None;

    match &call.args {
        CallArgs::Absent => {}
        CallArgs::List(args) => {
            for arg in args {
                match arg {
                    LogArg::Text(text) => fragments.push(text.clone()),
                    LogArg::Data(data) => deep_merge(&mut extras, data.clone()),
                    LogArg::Error(info) => {
                        deep_merge(&mut extras, info.fields.clone());
                        stack = Some(info.stack.clone());
                    }
                }
            }
        }
        CallArgs::Malformed(value) => {
            eprintln!(
                "[LOGGER WARNING] Call arguments were not a list, ignoring them: {}",
                value
            );
        }
    }

    let carried_tag = match extras.remove(TAG_KEY) {
        Some(Value::String(tag)) => Some(tag),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };
    let carried_defaults = match extras.remove(EXTRA_FIELDS_KEY) {
        Some(Value::Object(fields)) => Some(fields),
        _ => None,
    };

    if let Some(meta) = &call.meta {
        extras = merge_defaults(extras, &meta.extra_fields);
    }
    if let Some(defaults) = &carried_defaults {
        extras = merge_defaults(extras, defaults);
    }

    if stack.is_some() {
        extras.remove("stack");
    }

    let tag = call
        .meta
        .as_ref()
        .map(|meta| meta.tag.clone())
        .or(carried_tag);

    Extraction {
        fragments,
        extras,
        stack,
        tag,
        decorated: call.meta.is_some() || !call.args.is_absent(),
    }
}
