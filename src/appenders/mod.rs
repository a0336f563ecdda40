//! Appender implementations

pub mod background;
pub mod console;
pub mod rotating_file;
pub mod stream;

pub use background::{BackgroundAppender, BackgroundAppenderBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use console::ConsoleAppender;
pub use rotating_file::{DailyRotateFileAppender, RotationPolicy};
pub use stream::{MemoryAppender, WriterAppender};

pub use crate::core::Appender;
