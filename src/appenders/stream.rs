//! Stream appenders: in-memory capture and arbitrary writers

use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::renderer::Rendered;
use crate::core::Appender;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Appender keeping every rendered output in memory
///
/// Clones share the same buffer, so a test can keep one clone and hand
/// the other to a sink.
///
/// # Example
///
/// ```
/// use tagged_logger::appenders::MemoryAppender;
/// use tagged_logger::{Logger, Sink};
///
/// let capture = MemoryAppender::new();
/// let logger = Logger::builder("test")
///     .sink(Sink::new(capture.clone()).shared())
///     .build();
///
/// logger.info("hello");
/// assert!(capture.lines()[0].ends_with("hello"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    entries: Arc<Mutex<Vec<(LogLevel, Rendered)>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered outputs in write order
    pub fn entries(&self) -> Vec<Rendered> {
        self.entries.lock().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn levels(&self) -> Vec<LogLevel> {
        self.entries.lock().iter().map(|(level, _)| *level).collect()
    }

    /// Outputs in their text form
    pub fn lines(&self) -> Vec<String> {
        self.entries.lock().iter().map(|(_, r)| r.to_line()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove and return everything captured so far
    pub fn take(&self) -> Vec<(LogLevel, Rendered)> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, level: LogLevel, output: &Rendered) -> Result<()> {
        self.entries.lock().push((level, output.clone()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Appender writing one line per record to any `Write`
///
/// Structured output is written as compact JSON.
pub struct WriterAppender<W: Write + Send + Sync> {
    writer: W,
    name: String,
}

impl<W: Write + Send + Sync> WriterAppender<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            name: "writer".to_string(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> Appender for WriterAppender<W> {
    fn append(&mut self, _level: LogLevel, output: &Rendered) -> Result<()> {
        writeln!(self.writer, "{}", output.to_line())
            .map_err(|e| LoggerError::writer(format!("{}: {}", self.name, e)))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LoggerError::writer(format!("{}: {}", self.name, e)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn test_memory_clones_share_buffer() {
        let capture = MemoryAppender::new();
        let mut writer = capture.clone();
        writer
            .append(LogLevel::Warn, &Rendered::Line("careful".to_string()))
            .unwrap();

        assert_eq!(capture.len(), 1);
        assert_eq!(capture.levels(), vec![LogLevel::Warn]);
        assert_eq!(capture.lines(), vec!["careful".to_string()]);

        assert_eq!(capture.take().len(), 1);
        assert!(capture.is_empty());
    }

    #[test]
    fn test_writer_appender_lines() {
        let mut appender = WriterAppender::new(Vec::new());
        let mut obj = Map::new();
        obj.insert("message".to_string(), json!("hi"));

        appender
            .append(LogLevel::Info, &Rendered::Line("plain".to_string()))
            .unwrap();
        appender
            .append(LogLevel::Info, &Rendered::Structured(obj))
            .unwrap();
        appender.flush().unwrap();

        let text = String::from_utf8(appender.into_inner()).unwrap();
        assert_eq!(text, "plain\n{\"message\":\"hi\"}\n");
    }

    struct ClosedStream;

    impl Write for ClosedStream {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_appender_error() {
        let mut appender = WriterAppender::new(ClosedStream).with_name("pipe");
        let result = appender.append(LogLevel::Info, &Rendered::Line("x".to_string()));
        assert!(matches!(result, Err(LoggerError::WriterError(msg)) if msg.starts_with("pipe")));
    }
}
