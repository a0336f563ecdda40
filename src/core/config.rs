//! Sink configuration files
//!
//! ```toml
//! [[sinks]]
//! kind = "console"
//! level = "info"
//! stderrLevels = ["error", "warn"]
//!
//! [[sinks]]
//! kind = "file"
//! dirname = "/var/log/app"
//! maxsize = 1048576
//! zippedArchive = false
//! ```

use super::error::{LoggerError, Result};
use super::registry::SinkRegistry;
use super::sink::{create_sink, FormatOptions, SharedSink, SinkConfig, SinkKind};
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Transport named by a `[[sinks]]` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Console,
    File,
}

impl TransportKind {
    fn sink_kind(self) -> SinkKind {
        match self {
            TransportKind::Console => SinkKind::Console,
            TransportKind::File => SinkKind::DailyRotateFile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkEntry {
    pub kind: TransportKind,
    /// Timestamp layout; the local human layout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub config: SinkConfig,
}

impl SinkEntry {
    fn format_options(&self) -> FormatOptions {
        let timestamp_format = match self.timestamp.as_deref() {
            None | Some("local") => TimestampFormat::Local,
            Some("iso8601") => TimestampFormat::Iso8601,
            Some("rfc3339") => TimestampFormat::Rfc3339,
            Some("unix_millis") => TimestampFormat::UnixMillis,
            Some(pattern) => TimestampFormat::Custom(pattern.to_string()),
        };
        FormatOptions::default().with_timestamp_format(timestamp_format)
    }
}

/// Sinks described by a TOML document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub sinks: Vec<SinkEntry>,
}

impl LoggingConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("read config", path.display().to_string(), e)
        })?;
        Self::from_toml_str(&source)
    }

    /// Create every configured sink
    pub fn build_sinks(&self) -> Result<Vec<SharedSink>> {
        self.sinks
            .iter()
            .map(|entry| {
                create_sink(
                    entry.config.clone(),
                    entry.kind.sink_kind(),
                    entry.format_options(),
                )
            })
            .collect()
    }

    /// Create every configured sink and register it in `registry`
    ///
    /// Nothing is registered if any sink fails to build.
    pub fn install(&self, registry: &SinkRegistry) -> Result<usize> {
        let sinks = self.build_sinks()?;
        let count = sinks.len();
        for sink in sinks {
            registry.register(sink);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use crate::core::renderer::RenderMode;

    #[test]
    fn test_parse_sinks() {
        let config = LoggingConfig::from_toml_str(
            r#"
            [[sinks]]
            kind = "console"
            level = "warn"
            colorize = false
            stderrLevels = ["error", "warn"]

            [[sinks]]
            kind = "file"
            timestamp = "iso8601"
            maxsize = 4096
            zippedArchive = false
            "#,
        )
        .unwrap();

        assert_eq!(config.sinks.len(), 2);
        let console = &config.sinks[0];
        assert_eq!(console.kind, TransportKind::Console);
        assert_eq!(console.config.level, Some(LogLevel::Warn));
        assert_eq!(console.config.passthrough["stderrLevels"][1], "warn");

        let file = &config.sinks[1];
        assert_eq!(file.kind, TransportKind::File);
        assert_eq!(file.config.maxsize, Some(4096));
        assert_eq!(file.format_options().timestamp_format, TimestampFormat::Iso8601);
    }

    #[test]
    fn test_empty_document() {
        let config = LoggingConfig::from_toml_str("").unwrap();
        assert!(config.sinks.is_empty());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = LoggingConfig::from_toml_str("[[sinks]]\nkind = \"syslog\"\n");
        assert!(matches!(result, Err(LoggerError::ConfigParse(_))));
    }

    #[test]
    fn test_install_console() {
        let registry = SinkRegistry::new();
        let config = LoggingConfig::from_toml_str("[[sinks]]\nkind = \"console\"\nlevel = \"info\"\n").unwrap();
        assert_eq!(config.install(&registry).unwrap(), 1);

        let sinks = registry.snapshot();
        assert_eq!(sinks[0].level(), LogLevel::Info);
        assert_eq!(sinks[0].mode(), RenderMode::Human { colorize: true });
    }

    #[test]
    fn test_install_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = format!(
            "[[sinks]]\nkind = \"file\"\ndirname = {:?}\n",
            dir.path().display().to_string()
        );
        let registry = SinkRegistry::new();
        LoggingConfig::from_toml_str(&source)
            .unwrap()
            .install(&registry)
            .unwrap();
        assert_eq!(registry.snapshot()[0].mode(), RenderMode::Structured);
    }

    #[test]
    fn test_from_missing_file() {
        let result = LoggingConfig::from_file("/nonexistent/logging.toml");
        assert!(matches!(result, Err(LoggerError::IoOperation { .. })));
    }
}
