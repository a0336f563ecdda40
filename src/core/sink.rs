//! Sinks: a transport plus the settings that decide what reaches it
//!
//! A [`Sink`] runs the per-sink pipeline for each call:
//! extraction, record building, rendering, then the appender write.
//! Sinks are shared (`Arc`) and may be wired into any number of loggers.

use super::appender::Appender;
use super::call::LogCall;
use super::error::Result;
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::merge::merge_defaults;
use super::renderer::{RenderMode, Rendered};
use super::timestamp::TimestampFormat;
use crate::appenders::{ConsoleAppender, DailyRotateFileAppender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub type SharedSink = Arc<Sink>;

/// Default size threshold of archive files before they roll over (10 MiB)
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Default archive file name template
pub const DEFAULT_FILENAME: &str = "log-%DATE%.log";

/// Sink options as they appear in configuration
///
/// Every field is optional; unset fields fall back to the defaults of the
/// transport kind. Keys this struct does not know are kept in `passthrough`
/// and handed to the transport unchanged.
///
/// # Example
///
/// ```
/// use tagged_logger::{LogLevel, SinkConfig};
///
/// let config: SinkConfig = serde_json::from_value(serde_json::json!({
///     "level": "warn",
///     "zippedArchive": false,
///     "maxFiles": 7
/// }))
/// .unwrap();
///
/// assert_eq!(config.level, Some(LogLevel::Warn));
/// assert_eq!(config.zipped_archive, Some(false));
/// assert_eq!(config.passthrough["maxFiles"], 7);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkConfig {
    /// Least severe level the sink emits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorize: Option<bool>,
    /// Structured rendering when true, human lines otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dirname: Option<PathBuf>,
    /// File name template; `%DATE%` is replaced by the local date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Bytes written before an archive file rolls over
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxsize: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipped_archive: Option<bool>,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl SinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = Some(json);
        self
    }

    #[must_use]
    pub fn with_colorize(mut self, colorize: bool) -> Self {
        self.colorize = Some(colorize);
        self
    }

    #[must_use]
    pub fn with_dirname(mut self, dirname: impl Into<PathBuf>) -> Self {
        self.dirname = Some(dirname.into());
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_maxsize(mut self, maxsize: u64) -> Self {
        self.maxsize = Some(maxsize);
        self
    }

    #[must_use]
    pub fn with_zipped_archive(mut self, zipped: bool) -> Self {
        self.zipped_archive = Some(zipped);
        self
    }

    /// Add a transport-specific option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.passthrough.insert(key.into(), value.into());
        self
    }

    /// Defaults of the console transport
    pub fn console_defaults() -> Self {
        Self::new()
            .with_level(LogLevel::Debug)
            .with_json(false)
            .with_colorize(true)
    }

    /// Defaults of the daily rotating archive transport
    pub fn file_defaults() -> Self {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new()
            .with_level(LogLevel::Debug)
            .with_dirname(root.join("logs"))
            .with_filename(DEFAULT_FILENAME)
            .with_json(true)
            .with_zipped_archive(true)
            .with_maxsize(DEFAULT_MAX_SIZE)
            .with_colorize(false)
    }

    /// Defaults of caller-supplied stream transports
    pub fn stream_defaults() -> Self {
        Self::new()
            .with_level(LogLevel::Debug)
            .with_json(false)
            .with_colorize(false)
    }

    /// Fill unset options from `defaults`; options set here win
    #[must_use]
    pub fn merged_over(self, defaults: SinkConfig) -> SinkConfig {
        SinkConfig {
            level: self.level.or(defaults.level),
            colorize: self.colorize.or(defaults.colorize),
            json: self.json.or(defaults.json),
            dirname: self.dirname.or(defaults.dirname),
            filename: self.filename.or(defaults.filename),
            maxsize: self.maxsize.or(defaults.maxsize),
            zipped_archive: self.zipped_archive.or(defaults.zipped_archive),
            passthrough: merge_defaults(self.passthrough, &defaults.passthrough),
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        if self.json.unwrap_or(false) {
            RenderMode::Structured
        } else {
            RenderMode::Human {
                colorize: self.colorize.unwrap_or(false),
            }
        }
    }
}

/// Transport behind a sink created with [`create_sink`]
pub enum SinkKind {
    Console,
    DailyRotateFile,
    /// Any caller-supplied appender, e.g. a test capture
    Stream(Box<dyn Appender>),
}

impl SinkKind {
    pub fn defaults(&self) -> SinkConfig {
        match self {
            SinkKind::Console => SinkConfig::console_defaults(),
            SinkKind::DailyRotateFile => SinkConfig::file_defaults(),
            SinkKind::Stream(_) => SinkConfig::stream_defaults(),
        }
    }
}

impl fmt::Debug for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Console => write!(f, "Console"),
            SinkKind::DailyRotateFile => write!(f, "DailyRotateFile"),
            SinkKind::Stream(appender) => write!(f, "Stream({})", appender.name()),
        }
    }
}

/// Formatting overrides applied on top of a sink's configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatOptions {
    pub timestamp_format: TimestampFormat,
    /// Name reported in diagnostics; defaults to the appender's name
    pub name: Option<String>,
}

impl FormatOptions {
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Create a sink from configuration
///
/// `config` is merged over the defaults of `kind`, then the transport is
/// built from the merged options.
///
/// # Example
///
/// ```
/// use tagged_logger::appenders::MemoryAppender;
/// use tagged_logger::{create_sink, FormatOptions, LogLevel, SinkConfig, SinkKind};
///
/// let capture = MemoryAppender::new();
/// let sink = create_sink(
///     SinkConfig::new().with_json(true),
///     SinkKind::Stream(Box::new(capture.clone())),
///     FormatOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(sink.level(), LogLevel::Debug);
/// ```
pub fn create_sink(config: SinkConfig, kind: SinkKind, format: FormatOptions) -> Result<SharedSink> {
    let config = config.merged_over(kind.defaults());
    let appender: Box<dyn Appender> = match kind {
        SinkKind::Console => Box::new(ConsoleAppender::from_options(&config.passthrough)?),
        SinkKind::DailyRotateFile => Box::new(DailyRotateFileAppender::from_config(&config)?),
        SinkKind::Stream(appender) => appender,
    };
    Ok(Arc::new(Sink::from_config(appender, &config, format)))
}

/// A destination with a level threshold and a rendering mode
pub struct Sink {
    name: String,
    level: LogLevel,
    mode: RenderMode,
    timestamp_format: TimestampFormat,
    options: Map<String, Value>,
    appender: Mutex<Box<dyn Appender>>,
}

impl Sink {
    /// Human-readable, uncolored sink accepting everything down to `debug`
    pub fn new<A: Appender + 'static>(appender: A) -> Self {
        Self::from_boxed(Box::new(appender))
    }

    pub fn from_boxed(appender: Box<dyn Appender>) -> Self {
        Self {
            name: appender.name().to_string(),
            level: LogLevel::Debug,
            mode: RenderMode::default(),
            timestamp_format: TimestampFormat::default(),
            options: Map::new(),
            appender: Mutex::new(appender),
        }
    }

    fn from_config(appender: Box<dyn Appender>, config: &SinkConfig, format: FormatOptions) -> Self {
        let mut sink = Self::from_boxed(appender);
        sink.level = config.level.unwrap_or(LogLevel::Debug);
        sink.mode = config.render_mode();
        sink.timestamp_format = format.timestamp_format;
        sink.options = config.passthrough.clone();
        if let Some(name) = format.name {
            sink.name = name;
        }
        sink
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for structured (`true`) or uncolored human (`false`) rendering
    #[must_use]
    pub fn json(self, json: bool) -> Self {
        if json {
            self.with_mode(RenderMode::Structured)
        } else {
            self.with_mode(RenderMode::Human { colorize: false })
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn shared(self) -> SharedSink {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    /// Transport options passed through from configuration
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    #[inline]
    pub fn accepts(&self, level: LogLevel) -> bool {
        level.is_enabled_for(self.level)
    }

    /// Build the record this sink would render for `call`
    pub fn record(&self, call: &LogCall) -> LogRecord {
        LogRecord::from_call(call, &self.timestamp_format)
    }

    pub fn render_record(&self, record: &LogRecord) -> Rendered {
        self.mode.render(record)
    }

    pub fn render(&self, call: &LogCall) -> Rendered {
        self.render_record(&self.record(call))
    }

    /// Render `call` and hand it to the appender
    ///
    /// Calls below the sink's threshold are skipped.
    pub fn emit(&self, call: &LogCall) -> Result<()> {
        if !self.accepts(call.level) {
            return Ok(());
        }
        let rendered = self.render(call);
        self.appender.lock().append(call.level, &rendered)
    }

    pub fn flush(&self) -> Result<()> {
        self.appender.lock().flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("mode", &self.mode)
            .field("timestamp_format", &self.timestamp_format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::call::CallMetadata;
    use crate::core::log_arg::LogArg;
    use serde_json::json;

    #[test]
    fn test_config_merge_caller_wins() {
        let config = SinkConfig::new()
            .with_level(LogLevel::Warn)
            .with_option("stderrLevels", json!(["warn"]))
            .merged_over(SinkConfig::console_defaults());
        assert_eq!(config.level, Some(LogLevel::Warn));
        assert_eq!(config.colorize, Some(true));
        assert_eq!(config.json, Some(false));
        assert_eq!(config.passthrough["stderrLevels"], json!(["warn"]));
    }

    #[test]
    fn test_file_defaults() {
        let config = SinkConfig::file_defaults();
        assert_eq!(config.filename.as_deref(), Some(DEFAULT_FILENAME));
        assert_eq!(config.maxsize, Some(DEFAULT_MAX_SIZE));
        assert_eq!(config.zipped_archive, Some(true));
        assert_eq!(config.render_mode(), RenderMode::Structured);
        assert!(config.dirname.unwrap().ends_with("logs"));
    }

    #[test]
    fn test_config_deserialize_camel_case() {
        let config: SinkConfig = serde_json::from_value(json!({
            "level": "silly",
            "colorize": false,
            "zippedArchive": true,
            "maxsize": 2048,
            "custom": {"a": 1}
        }))
        .unwrap();
        assert_eq!(config.level, Some(LogLevel::Silly));
        assert_eq!(config.maxsize, Some(2048));
        assert_eq!(config.zipped_archive, Some(true));
        assert_eq!(config.passthrough.len(), 1);
        assert_eq!(config.passthrough["custom"], json!({"a": 1}));
    }

    #[test]
    fn test_stream_sink_from_config() {
        let capture = MemoryAppender::new();
        let sink = create_sink(
            SinkConfig::new().with_json(true).with_level(LogLevel::Info),
            SinkKind::Stream(Box::new(capture.clone())),
            FormatOptions::default().with_name("capture"),
        )
        .unwrap();
        assert_eq!(sink.name(), "capture");
        assert_eq!(sink.mode(), RenderMode::Structured);

        sink.emit(&LogCall::new(LogLevel::Debug, "filtered")).unwrap();
        sink.emit(&LogCall::new(LogLevel::Info, "kept")).unwrap();
        let entries = capture.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].as_structured().unwrap()["message"], "kept");
    }

    #[test]
    fn test_render_is_repeatable() {
        let sink = Sink::new(MemoryAppender::new());
        let call = LogCall::new(LogLevel::Info, "same")
            .with_args(vec![LogArg::from(json!({"k": [1, 2]}))])
            .with_meta(CallMetadata::new("t"));
        let record = sink.record(&call);
        assert_eq!(sink.render_record(&record), sink.render_record(&record));
        assert_eq!(sink.render(&call), sink.render(&call));
    }
}
