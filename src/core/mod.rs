//! Core logger types: the call pipeline, sinks and the logger facade

pub mod appender;
pub mod call;
pub mod config;
pub mod error;
pub mod extractor;
pub mod log_arg;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod merge;
pub mod metrics;
pub mod overflow_policy;
pub mod registry;
pub mod renderer;
pub mod sink;
pub mod timestamp;

pub use appender::Appender;
pub use call::{CallArgs, CallMetadata, LogCall, EXTRA_FIELDS_KEY, TAG_KEY};
pub use config::{LoggingConfig, SinkEntry, TransportKind};
pub use error::{LoggerError, Result};
pub use extractor::{extract, Extraction};
pub use log_arg::{ErrorInfo, LogArg};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder};
pub use merge::{deep_merge, merge_defaults};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{LogPriority, OverflowCallback, OverflowPolicy};
pub use registry::SinkRegistry;
pub use renderer::{HumanRenderer, RenderMode, Rendered, StructuredRenderer};
pub use sink::{create_sink, FormatOptions, SharedSink, Sink, SinkConfig, SinkKind};
pub use timestamp::TimestampFormat;
