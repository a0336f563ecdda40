//! Logging macros taking a message followed by any number of arguments.
//!
//! Every trailing argument is converted with [`LogArg::from`](crate::LogArg):
//! strings and numbers become text, `serde_json` objects become structured
//! data, and values built with [`LogArg::error`](crate::LogArg::error) carry
//! an error stack.
//!
//! # Examples
//!
//! ```
//! use tagged_logger::appenders::MemoryAppender;
//! use tagged_logger::prelude::*;
//! use tagged_logger::{info, error};
//! use serde_json::json;
//!
//! let capture = MemoryAppender::new();
//! let logger = Logger::builder("http")
//!     .sink(Sink::new(capture.clone()).shared())
//!     .build();
//!
//! info!(logger, "Server started");
//! info!(logger, "Listening on", 8080, json!({"tls": false}));
//!
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
//! error!(logger, "Accept failed:", LogArg::error(&err));
//!
//! assert_eq!(capture.len(), 3);
//! assert!(capture.lines()[1].contains("Listening on 8080 {\"tls\":false}"));
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use tagged_logger::prelude::*;
/// # let logger = Logger::builder("doc").sinks(Vec::new()).build();
/// use tagged_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code:", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr $(,)?) => {
        $logger.log_at($level, $msg, $crate::CallArgs::Absent)
    };
    ($logger:expr, $level:expr, $msg:expr, $($arg:expr),+ $(,)?) => {
        $logger.log_at(
            $level,
            $msg,
            ::std::vec![$($crate::LogArg::from($arg)),+],
        )
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use tagged_logger::prelude::*;
/// # let logger = Logger::builder("doc").sinks(Vec::new()).build();
/// use tagged_logger::error;
/// let err = std::fmt::Error;
/// error!(logger, "Render failed:", LogArg::error(&err));
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a warn-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use tagged_logger::prelude::*;
/// # let logger = Logger::builder("doc").sinks(Vec::new()).build();
/// use tagged_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing", 100, "items");
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log a silly-level message.
#[macro_export]
macro_rules! silly {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Silly, $($arg)+)
    };
}
