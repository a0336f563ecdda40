//! Logger facade
//!
//! A [`Logger`] holds a tag, a default level, default fields and the sinks
//! it broadcasts to. Each call becomes one [`LogCall`] carrying the logger's
//! [`CallMetadata`]; every accepting sink renders and writes it on its own.

use super::{
    call::{CallArgs, CallMetadata, LogCall},
    error::Result,
    log_arg::LogArg,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    registry::SinkRegistry,
    sink::SharedSink,
};
use serde_json::{Map, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Tagged logger broadcasting to a fixed set of sinks
///
/// Logging methods never fail: sink errors and sink panics are reported
/// on stderr and counted in [`Logger::metrics`].
///
/// # Example
///
/// ```
/// use tagged_logger::appenders::MemoryAppender;
/// use tagged_logger::prelude::*;
/// use serde_json::json;
///
/// let capture = MemoryAppender::new();
/// let logger = Logger::builder("billing")
///     .sink(Sink::new(capture.clone()).json(true).shared())
///     .extra_field("hostname", "h1")
///     .build();
///
/// logger.info_with("charged", [LogArg::from(json!({"amount": 12}))]);
///
/// let entry = &capture.entries()[0];
/// let obj = entry.as_structured().unwrap();
/// assert_eq!(obj["tag"], "billing");
/// assert_eq!(obj["amount"], 12);
/// assert_eq!(obj["hostname"], "h1");
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    default_level: LogLevel,
    sinks: Vec<SharedSink>,
    meta: CallMetadata,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger at `info` over a snapshot of the global registry
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self::builder(tag).build()
    }

    #[must_use]
    pub fn builder(tag: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(tag)
    }

    pub fn tag(&self) -> &str {
        &self.meta.tag
    }

    pub fn default_level(&self) -> LogLevel {
        self.default_level
    }

    pub fn sinks(&self) -> &[SharedSink] {
        &self.sinks
    }

    pub fn extra_fields(&self) -> &Map<String, Value> {
        &self.meta.extra_fields
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// True when at least one sink accepts `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.sinks.iter().any(|sink| sink.accepts(level))
    }

    /// Log at the default level
    #[inline]
    pub fn log(&self, message: impl Into<String>) {
        self.log_at(self.default_level, message, CallArgs::Absent);
    }

    #[inline]
    pub fn log_with(&self, message: impl Into<String>, args: impl IntoIterator<Item = LogArg>) {
        self.log_at(self.default_level, message, list(args));
    }

    /// Log at an explicit level
    pub fn log_at(&self, level: LogLevel, message: impl Into<String>, args: impl Into<CallArgs>) {
        if !self.enabled(level) {
            return;
        }
        let call = LogCall::new(level, message)
            .with_args(args)
            .with_meta(self.meta.clone());
        self.dispatch(&call);
    }

    /// Log with arguments given as JSON, e.g. from a bridge to another runtime
    ///
    /// `args` should be an array; any other shape is reported and ignored.
    pub fn log_json(&self, level: LogLevel, message: impl Into<String>, args: Value) {
        self.log_at(level, message, CallArgs::from_json(args));
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Error, message, CallArgs::Absent);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Warn, message, CallArgs::Absent);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Info, message, CallArgs::Absent);
    }

    #[inline]
    pub fn verbose(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Verbose, message, CallArgs::Absent);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Debug, message, CallArgs::Absent);
    }

    #[inline]
    pub fn silly(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Silly, message, CallArgs::Absent);
    }

    pub fn error_with(&self, message: impl Into<String>, args: impl IntoIterator<Item = LogArg>) {
        self.log_at(LogLevel::Error, message, list(args));
    }

    pub fn warn_with(&self, message: impl Into<String>, args: impl IntoIterator<Item = LogArg>) {
        self.log_at(LogLevel::Warn, message, list(args));
    }

    pub fn info_with(&self, message: impl Into<String>, args: impl IntoIterator<Item = LogArg>) {
        self.log_at(LogLevel::Info, message, list(args));
    }

    pub fn verbose_with(&self, message: impl Into<String>, args: impl IntoIterator<Item = LogArg>) {
        self.log_at(LogLevel::Verbose, message, list(args));
    }

    pub fn debug_with(&self, message: impl Into<String>, args: impl IntoIterator<Item = LogArg>) {
        self.log_at(LogLevel::Debug, message, list(args));
    }

    pub fn silly_with(&self, message: impl Into<String>, args: impl IntoIterator<Item = LogArg>) {
        self.log_at(LogLevel::Silly, message, list(args));
    }

    /// Hand a call to every sink in order
    ///
    /// **Per-sink isolation**: each write runs under `catch_unwind`, so a
    /// sink that fails or panics does not keep the others from writing.
    fn dispatch(&self, call: &LogCall) {
        self.metrics.record_dispatched();

        for sink in &self.sinks {
            if !sink.accepts(call.level) {
                continue;
            }

            match catch_unwind(AssertUnwindSafe(|| sink.emit(call))) {
                Ok(Ok(())) => {
                    self.metrics.record_written();
                }
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
                    self.metrics.record_failed();
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                         Other sinks continue to function.",
                        sink.name(),
                        panic_message(panic_info.as_ref())
                    );
                    self.metrics.record_failed();
                }
            }
        }
    }

    /// Flush every sink, returning the first error
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            match catch_unwind(AssertUnwindSafe(|| sink.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
                    first_error.get_or_insert(e);
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' panicked during flush: {}",
                        sink.name(),
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn list(args: impl IntoIterator<Item = LogArg>) -> CallArgs {
    CallArgs::List(args.into_iter().collect())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for [`Logger`]
///
/// Without explicit sinks or a registry, the logger takes a snapshot of
/// [`SinkRegistry::global`] when built.
///
/// # Example
/// ```
/// use tagged_logger::prelude::*;
///
/// let registry = SinkRegistry::new();
/// let logger = Logger::builder("worker")
///     .default_level(LogLevel::Debug)
///     .registry(&registry)
///     .extra_field("pid", 42)
///     .build();
///
/// assert_eq!(logger.tag(), "worker");
/// assert_eq!(logger.default_level(), LogLevel::Debug);
/// ```
pub struct LoggerBuilder {
    tag: String,
    default_level: LogLevel,
    sinks: Option<Vec<SharedSink>>,
    extra_fields: Map<String, Value>,
}

impl LoggerBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            default_level: LogLevel::Info,
            sinks: None,
            extra_fields: Map::new(),
        }
    }

    /// Level used by [`Logger::log`]
    #[must_use = "builder methods return a new value"]
    pub fn default_level(mut self, level: LogLevel) -> Self {
        self.default_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sinks.get_or_insert_with(Vec::new).push(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sinks(mut self, sinks: impl IntoIterator<Item = SharedSink>) -> Self {
        self.sinks.get_or_insert_with(Vec::new).extend(sinks);
        self
    }

    /// Add the sinks currently registered in `registry`
    #[must_use = "builder methods return a new value"]
    pub fn registry(self, registry: &SinkRegistry) -> Self {
        self.sinks(registry.snapshot())
    }

    /// Default field merged into every record unless the call sets the key
    #[must_use = "builder methods return a new value"]
    pub fn extra_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_fields.insert(key.into(), value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn extra_fields(mut self, fields: Map<String, Value>) -> Self {
        self.extra_fields.extend(fields);
        self
    }

    pub fn build(self) -> Logger {
        let sinks = self
            .sinks
            .unwrap_or_else(|| SinkRegistry::global().snapshot());
        Logger {
            default_level: self.default_level,
            sinks,
            meta: CallMetadata::new(self.tag).with_extra_fields(Arc::new(self.extra_fields)),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }
}
