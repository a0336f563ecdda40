//! Errors surfaced by sink setup, configuration and flushing
//!
//! Logging calls themselves never return an error.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// I/O failure with the action and target that caused it
    #[error("Failed to {action} {target}: {source}")]
    IoOperation {
        action: String,
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Logging configuration is not valid TOML for [`LoggingConfig`](crate::LoggingConfig)
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A sink option has an unusable value
    #[error("Invalid configuration for {transport}: {message}")]
    InvalidConfiguration { transport: String, message: String },

    #[error("Archive '{path}' unavailable: {message}")]
    ArchiveUnavailable { path: String, message: String },

    #[error("Archive '{path}' could not roll over: {message}")]
    RollOver { path: String, message: String },

    /// Background worker is gone
    #[error("Background queue for '{appender}' is closed")]
    QueueClosed { appender: String },

    #[error("Writer error: {0}")]
    WriterError(String),

    /// A transport panicked outside a logging call
    #[error("Sink '{sink}' panicked during {during}")]
    SinkPanicked { sink: String, during: &'static str },
}

impl LoggerError {
    pub fn io_operation(
        action: impl Into<String>,
        target: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            action: action.into(),
            target: target.into(),
            source,
        }
    }

    pub fn config(transport: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// The archive file could not be opened or written
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::ArchiveUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Renaming, compressing or pruning a rolled archive failed
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::RollOver {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn queue_closed(appender: impl Into<String>) -> Self {
        LoggerError::QueueClosed {
            appender: appender.into(),
        }
    }

    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    pub fn sink_panicked(sink: impl Into<String>, during: &'static str) -> Self {
        LoggerError::SinkPanicked {
            sink: sink.into(),
            during,
        }
    }
}
