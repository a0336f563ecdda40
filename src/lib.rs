//! # Tagged Logger
//!
//! A structured logging facade: each call carries a tag, free-form
//! arguments and logger-wide default fields, and is fanned out to sinks
//! that render it for humans or as flat JSON.
//!
//! ## Features
//!
//! - **Tagged loggers**: one [`Logger`] per subsystem, its tag in a fixed-width column
//! - **Variadic arguments**: text, structured data and errors in any order
//! - **Default fields**: merged into every record without overriding the caller
//! - **Sinks**: console, daily rotating files with gzip, in-memory capture, background queues
//!
//! ## Example
//!
//! ```
//! use tagged_logger::appenders::MemoryAppender;
//! use tagged_logger::prelude::*;
//! use serde_json::json;
//!
//! let capture = MemoryAppender::new();
//! let registry = SinkRegistry::new();
//! registry.register(Sink::new(capture.clone()).json(true).shared());
//!
//! let logger = Logger::builder("orders")
//!     .registry(&registry)
//!     .extra_field("hostname", "h1")
//!     .build();
//! logger.info_with("created", [LogArg::from(json!({"id": 7}))]);
//!
//! let line = capture.lines().remove(0);
//! assert!(line.contains("\"tag\":\"orders\""));
//! assert!(line.contains("\"id\":7"));
//! assert!(line.contains("\"hostname\":\"h1\""));
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, DailyRotateFileAppender};
    pub use crate::core::{
        create_sink, Appender, CallArgs, ErrorInfo, FormatOptions, LogArg, LogLevel, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, LoggingConfig, OverflowPolicy, Rendered, Result,
        SharedSink, Sink, SinkConfig, SinkKind, SinkRegistry, TimestampFormat,
    };
}

pub use appenders::{ConsoleAppender, DailyRotateFileAppender};
pub use core::{
    create_sink, deep_merge, extract, merge_defaults, Appender, CallArgs, CallMetadata, ErrorInfo,
    Extraction, FormatOptions, HumanRenderer, LogArg, LogCall, LogLevel, LogPriority, LogRecord,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, LoggingConfig, OverflowCallback,
    OverflowPolicy, RenderMode, Rendered, Result, SharedSink, Sink, SinkConfig, SinkEntry,
    SinkKind, SinkRegistry, StructuredRenderer, TimestampFormat, TransportKind,
};
