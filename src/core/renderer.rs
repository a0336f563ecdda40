//! Rendering of records for humans and for machines
//!
//! - Human: one padded text line, extras inlined as JSON, optional colors.
//! - Structured: a flat JSON object with extras spread at the top level.
//!
//! Both are pure functions of the record and the sink's static settings.

use super::log_record::LogRecord;
use serde_json::{Map, Value};

/// Width of the level column, colon included
pub const LEVEL_WIDTH: usize = 8;

/// Width of the tag column
pub const TAG_WIDTH: usize = 20;

/// How a sink renders records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Human-readable line
    ///
    /// Example: `2025-01-08 10:30:45.123 +0200 - info:    api                  started {"port":80}`
    Human { colorize: bool },

    /// Flat JSON object
    ///
    /// Example: `{"timestamp":"2025-01-08 10:30:45.123 +0200","level":"info","tag":"api","message":"started","port":80}`
    Structured,
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::Human { colorize: false }
    }
}

impl RenderMode {
    pub fn render(&self, record: &LogRecord) -> Rendered {
        match self {
            RenderMode::Human { colorize } => Rendered::Line(HumanRenderer::new(*colorize).render(record)),
            RenderMode::Structured => Rendered::Structured(StructuredRenderer.render(record)),
        }
    }
}

/// Output handed to an appender
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Line(String),
    Structured(Map<String, Value>),
}

impl Rendered {
    /// Text form: the line itself, or compact JSON for structured output
    pub fn to_line(&self) -> String {
        match self {
            Rendered::Line(line) => line.clone(),
            Rendered::Structured(obj) => {
                serde_json::to_string(obj).unwrap_or_else(|e| format!("{{\"render_error\":\"{}\"}}", e))
            }
        }
    }

    pub fn as_structured(&self) -> Option<&Map<String, Value>> {
        match self {
            Rendered::Structured(obj) => Some(obj),
            Rendered::Line(_) => None,
        }
    }
}

/// Human-oriented line renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanRenderer {
    colorize: bool,
}

impl HumanRenderer {
    pub fn new(colorize: bool) -> Self {
        Self { colorize }
    }

    /// Render `<timestamp> - <level:> <tag> <message> [fragments..]`, then the
    /// stack on its own lines, then the extras as JSON
    ///
    /// Undecorated records render as the bare message. Colors wrap the whole
    /// composed text.
    pub fn render(&self, record: &LogRecord) -> String {
        let composed = if record.decorated {
            self.compose(record)
        } else {
            record.message.clone()
        };

        if self.colorize {
            record.level.paint(&composed)
        } else {
            composed
        }
    }

    fn compose(&self, record: &LogRecord) -> String {
        let level_label = format!("{}:", record.level);
        let mut line = format!(
            "{} - {:<level_w$} {:<tag_w$} {}",
            record.timestamp,
            level_label,
            record.tag,
            record.message,
            level_w = LEVEL_WIDTH,
            tag_w = TAG_WIDTH,
        );

        for fragment in &record.fragments {
            line.push(' ');
            line.push_str(fragment);
        }

        if let Some(stack) = &record.stack {
            line.push('\n');
            line.push_str(stack);
        }

        if !record.extras.is_empty() {
            line.push(' ');
            line.push_str(&extras_json(&record.extras));
        }

        line
    }
}

/// Compact JSON of the extras, keys in insertion order
pub fn extras_json(extras: &Map<String, Value>) -> String {
    serde_json::to_string(extras).unwrap_or_default()
}

/// Flat structured renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredRenderer;

impl StructuredRenderer {
    /// Render `{timestamp, level, tag, message, ...extras, stack?}`
    ///
    /// Record fields take precedence over extras with the same name.
    pub fn render(&self, record: &LogRecord) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert("timestamp".to_string(), Value::String(record.timestamp.clone()));
        obj.insert("level".to_string(), Value::String(record.level.to_str().to_string()));
        obj.insert("tag".to_string(), Value::String(record.tag.clone()));
        obj.insert("message".to_string(), Value::String(record.message.clone()));

        for (key, value) in &record.extras {
            if !obj.contains_key(key) {
                obj.insert(key.clone(), value.clone());
            }
        }

        if let Some(stack) = &record.stack {
            obj.insert("stack".to_string(), Value::String(stack.clone()));
        }

        obj
    }
}
