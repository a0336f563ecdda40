//! Logger metrics for observability
//!
//! Counters for calls dispatched to sinks, sink writes that succeeded or
//! failed, and queue pressure in background appenders.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use tagged_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_written();
/// metrics.record_failed();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.written(), 1);
/// assert_eq!(metrics.failed(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Calls broadcast to sinks
    dispatched: AtomicU64,

    /// Sink writes that completed
    written: AtomicU64,

    /// Sink writes that returned an error, panicked, or were dropped
    failed: AtomicU64,

    /// Number of times a background queue was full
    queue_full_events: AtomicU64,

    /// Number of times a producer blocked waiting for queue space
    block_events: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            written: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    /// Record a dispatched call, returning the previous count
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed writes as a percentage of all attempted writes (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = self.written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched()),
            written: AtomicU64::new(self.written()),
            failed: AtomicU64::new(self.failed()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.dispatched(), 0);
        assert_eq!(metrics.written(), 0);
        assert_eq!(metrics.failed(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
        assert_eq!(metrics.block_events(), 0);
    }

    #[test]
    fn test_record_returns_previous() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_failed(), 0);
        assert_eq!(metrics.record_failed(), 1);
        assert_eq!(metrics.failed(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..10 {
            metrics.record_failed();
        }
        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_written();
        metrics.record_queue_full();

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.written(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
        assert_eq!(snapshot.written(), 1);
        assert_eq!(snapshot.queue_full_events(), 1);
    }
}
