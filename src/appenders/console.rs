//! Console appender
//!
//! Writes to stdout, except for levels listed in `stderr_levels`, which go
//! to stderr. Colors, if any, are applied by the sink's renderer.

use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::renderer::Rendered;
use crate::core::Appender;
use serde_json::{Map, Value};
use std::io::Write;

/// Option key listing the levels written to stderr
pub const STDERR_LEVELS_KEY: &str = "stderrLevels";

pub struct ConsoleAppender {
    stderr_levels: Vec<LogLevel>,
}

impl ConsoleAppender {
    /// Console appender sending `error` to stderr and the rest to stdout
    pub fn new() -> Self {
        Self {
            stderr_levels: vec![LogLevel::Error],
        }
    }

    /// Set the levels written to stderr
    ///
    /// # Example
    ///
    /// ```
    /// use tagged_logger::appenders::ConsoleAppender;
    /// use tagged_logger::LogLevel;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_stderr_levels([LogLevel::Error, LogLevel::Warn]);
    /// assert!(appender.uses_stderr(LogLevel::Warn));
    /// ```
    #[must_use]
    pub fn with_stderr_levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.stderr_levels = levels.into_iter().collect();
        self
    }

    /// Build from pass-through sink options
    ///
    /// `stderrLevels` must be a list of level names when present.
    pub fn from_options(options: &Map<String, Value>) -> Result<Self> {
        let appender = Self::new();
        let Some(value) = options.get(STDERR_LEVELS_KEY) else {
            return Ok(appender);
        };

        let levels: Vec<LogLevel> = serde_json::from_value(value.clone()).map_err(|e| {
            LoggerError::config(
                "console",
                format!("{} must be a list of level names: {}", STDERR_LEVELS_KEY, e),
            )
        })?;
        Ok(appender.with_stderr_levels(levels))
    }

    pub fn uses_stderr(&self, level: LogLevel) -> bool {
        self.stderr_levels.contains(&level)
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, level: LogLevel, output: &Rendered) -> Result<()> {
        let line = output.to_line();
        if self.uses_stderr(level) {
            let mut stderr = std::io::stderr().lock();
            writeln!(stderr, "{}", line)?;
        } else {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", line)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_stderr_levels() {
        let appender = ConsoleAppender::new();
        assert!(appender.uses_stderr(LogLevel::Error));
        assert!(!appender.uses_stderr(LogLevel::Warn));
    }

    #[test]
    fn test_from_options() {
        let mut options = Map::new();
        options.insert(STDERR_LEVELS_KEY.to_string(), json!(["warn", "info"]));
        let appender = ConsoleAppender::from_options(&options).unwrap();
        assert!(appender.uses_stderr(LogLevel::Info));
        assert!(!appender.uses_stderr(LogLevel::Error));
    }

    #[test]
    fn test_from_options_invalid() {
        let mut options = Map::new();
        options.insert(STDERR_LEVELS_KEY.to_string(), json!("error"));
        assert!(matches!(
            ConsoleAppender::from_options(&options),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_append_does_not_fail() {
        let mut appender = ConsoleAppender::new();
        let line = Rendered::Line("console test line".to_string());
        assert!(appender.append(LogLevel::Info, &line).is_ok());
        assert!(appender.flush().is_ok());
    }
}
