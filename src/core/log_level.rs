//! Log level definitions
//!
//! Six fixed levels, most severe first. Lower discriminant means higher
//! priority, so a sink with threshold `t` accepts `level` when `level <= t`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    #[default]
    Info = 2,
    Verbose = 3,
    Debug = 4,
    Silly = 5,
}

impl LogLevel {
    /// All levels, most severe first
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Verbose,
        LogLevel::Debug,
        LogLevel::Silly,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Silly => "silly",
        }
    }

    /// Whether a sink configured with `threshold` should emit this level
    #[inline]
    pub fn is_enabled_for(&self, threshold: LogLevel) -> bool {
        *self <= threshold
    }

    #[cfg(feature = "console")]
    pub(crate) fn paint(&self, text: &str) -> String {
        use colored::Colorize;
        match self {
            LogLevel::Error => text.red().to_string(),
            LogLevel::Warn => text.yellow().to_string(),
            LogLevel::Info => text.green().to_string(),
            LogLevel::Verbose => text.cyan().to_string(),
            LogLevel::Debug | LogLevel::Silly => text.dimmed().to_string(),
        }
    }

    #[cfg(not(feature = "console"))]
    pub(crate) fn paint(&self, text: &str) -> String {
        text.to_string()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "verbose" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            "silly" => Ok(LogLevel::Silly),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        assert!(LogLevel::Error.is_enabled_for(LogLevel::Info));
        assert!(LogLevel::Info.is_enabled_for(LogLevel::Info));
        assert!(!LogLevel::Debug.is_enabled_for(LogLevel::Info));
        assert!(LogLevel::Silly.is_enabled_for(LogLevel::Silly));
    }

    #[test]
    fn test_parse() {
        assert_eq!("VERBOSE".parse::<LogLevel>().unwrap(), LogLevel::Verbose);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("fatal".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Silly).unwrap(), "\"silly\"");
        let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
    }
}
