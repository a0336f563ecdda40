//! What a background queue does with a record when it is full

use super::log_level::LogLevel;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for a full background queue
///
/// Records at [`LogPriority::Critical`] ignore the policy: they wait for
/// space up to the appender's shutdown timeout, then are dropped with an
/// alert.
///
/// # Example
///
/// ```
/// use tagged_logger::OverflowPolicy;
/// use std::time::Duration;
///
/// assert_eq!(OverflowPolicy::default(), OverflowPolicy::AlertAndDrop);
/// let patient = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// assert_eq!(patient.to_string(), "block up to 100ms");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Discard the record, counting it
    DropNewest,
    /// Wait for space
    Block,
    /// Wait up to the timeout, then discard
    BlockWithTimeout(Duration),
    /// Discard, warn on stderr and invoke the overflow callback
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => f.write_str("drop newest"),
            OverflowPolicy::Block => f.write_str("block"),
            OverflowPolicy::BlockWithTimeout(timeout) => write!(f, "block up to {:?}", timeout),
            OverflowPolicy::AlertAndDrop => f.write_str("alert and drop"),
        }
    }
}

/// How hard a queue tries to keep a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogPriority {
    #[default]
    Normal,
    High,
    /// Waits for space before it is dropped
    Critical,
}

impl LogLevel {
    pub fn priority(&self) -> LogPriority {
        match self {
            LogLevel::Error => LogPriority::Critical,
            LogLevel::Warn => LogPriority::High,
            LogLevel::Info | LogLevel::Verbose | LogLevel::Debug | LogLevel::Silly => {
                LogPriority::Normal
            }
        }
    }
}

/// Called with the running total of dropped records
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "drop newest");
        assert_eq!(OverflowPolicy::Block.to_string(), "block");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_secs(2)).to_string(),
            "block up to 2s"
        );
        assert_eq!(OverflowPolicy::default().to_string(), "alert and drop");
    }

    #[test]
    fn test_only_errors_are_critical() {
        let critical: Vec<_> = LogLevel::ALL
            .iter()
            .filter(|level| level.priority() == LogPriority::Critical)
            .collect();
        assert_eq!(critical, vec![&LogLevel::Error]);
        assert_eq!(LogLevel::Warn.priority(), LogPriority::High);
        assert!(LogPriority::Critical > LogPriority::Normal);
    }
}
