//! Appender trait for log output destinations

use super::{error::Result, log_level::LogLevel, renderer::Rendered};

/// A transport: accepts rendered output and writes it somewhere
///
/// The level is passed along so transports can route by severity.
pub trait Appender: Send + Sync {
    fn append(&mut self, level: LogLevel, output: &Rendered) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
