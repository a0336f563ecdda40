//! Background appender: moves writes of a slow appender to a worker thread
//!
//! Rendered outputs go through a bounded `crossbeam-channel` queue. When
//! the queue is full, the [`OverflowPolicy`] decides whether the caller
//! waits or the output is dropped. `error` outputs ignore the policy and
//! wait for space up to the shutdown timeout before they are dropped.

use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::metrics::LoggerMetrics;
use crate::core::overflow_policy::{LogPriority, OverflowCallback, OverflowPolicy};
use crate::core::renderer::Rendered;
use crate::core::Appender;
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Time allowed for the worker to drain its queue when the appender is dropped
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default queue capacity
pub const DEFAULT_CAPACITY: usize = 1024;

const BATCH_SIZE: usize = 50;

enum Message {
    Record(LogLevel, Rendered),
    Flush(Sender<Result<()>>),
}

/// Appender handing outputs to a worker thread that owns the inner appender
///
/// # Example
///
/// ```
/// use tagged_logger::appenders::{BackgroundAppender, MemoryAppender};
/// use tagged_logger::prelude::*;
///
/// let capture = MemoryAppender::new();
/// let background = BackgroundAppender::builder(capture.clone())
///     .capacity(256)
///     .overflow_policy(OverflowPolicy::Block)
///     .build();
///
/// let sink = Sink::new(background).shared();
/// let logger = Logger::builder("jobs").sink(sink).build();
/// logger.info("queued");
/// logger.flush().unwrap();
///
/// assert_eq!(capture.len(), 1);
/// ```
pub struct BackgroundAppender {
    name: String,
    sender: Option<Sender<Message>>,
    handle: Option<thread::JoinHandle<()>>,
    metrics: Arc<LoggerMetrics>,
    dropped: AtomicU64,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    shutdown_timeout: Duration,
}

impl BackgroundAppender {
    /// Wrap `inner` with the default capacity and policy
    pub fn new<A: Appender + 'static>(inner: A) -> Self {
        Self::builder(inner).build()
    }

    pub fn builder<A: Appender + 'static>(inner: A) -> BackgroundAppenderBuilder {
        BackgroundAppenderBuilder::new(Box::new(inner))
    }

    fn spawn(builder: BackgroundAppenderBuilder) -> Self {
        let BackgroundAppenderBuilder {
            inner,
            capacity,
            overflow_policy,
            on_overflow,
            shutdown_timeout,
        } = builder;
        let (sender, receiver) = bounded(capacity.max(1));
        let metrics = Arc::new(LoggerMetrics::new());
        let worker_metrics = Arc::clone(&metrics);
        let name = format!("background({})", inner.name());

        let handle = thread::Builder::new()
            .name("tagged-logger-worker".to_string())
            .spawn(move || run_worker(inner, receiver, worker_metrics));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("[LOGGER CRITICAL] Failed to spawn background worker: {}", e);
                None
            }
        };

        Self {
            name,
            sender: handle.as_ref().map(|_| sender),
            handle,
            metrics,
            dropped: AtomicU64::new(0),
            overflow_policy,
            on_overflow,
            shutdown_timeout,
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Outputs dropped because the queue was full
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn overflow_policy(&self) -> &OverflowPolicy {
        &self.overflow_policy
    }

    fn sender(&self) -> Result<&Sender<Message>> {
        self.sender
            .as_ref()
            .ok_or_else(|| LoggerError::queue_closed(self.name.clone()))
    }

    /// Handle a full queue according to the policy and the level's priority
    fn handle_overflow(&self, message: Message, priority: LogPriority) -> Result<()> {
        self.metrics.record_queue_full();
        let sender = self.sender()?;

        if priority == LogPriority::Critical {
            self.metrics.record_block();
            return self.send_bounded(sender, message, self.shutdown_timeout);
        }

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.record_drop();
                Ok(())
            }
            OverflowPolicy::Block => {
                self.metrics.record_block();
                sender
                    .send(message)
                    .map_err(|_| LoggerError::queue_closed(self.name.clone()))
            }
            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                self.send_bounded(sender, message, *timeout)
            }
            OverflowPolicy::AlertAndDrop => {
                self.alert_and_drop();
                Ok(())
            }
        }
    }

    /// Wait up to `timeout` for space, then drop with an alert
    fn send_bounded(
        &self,
        sender: &Sender<Message>,
        message: Message,
        timeout: Duration,
    ) -> Result<()> {
        match sender.send_timeout(message, timeout) {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => {
                self.alert_and_drop();
                Ok(())
            }
            Err(SendTimeoutError::Disconnected(_)) => {
                Err(LoggerError::queue_closed(self.name.clone()))
            }
        }
    }

    fn record_drop(&self) -> u64 {
        self.metrics.record_failed();
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop with a stderr alert on the first drop and every 1000th after
    fn alert_and_drop(&self) {
        let dropped = self.record_drop() + 1;
        if dropped == 1 || dropped % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] Queue of {} full, {} records dropped. \
                 Consider increasing its capacity or using a blocking overflow policy.",
                self.name, dropped
            );
            if let Some(ref callback) = self.on_overflow {
                callback(dropped);
            }
        }
    }

    /// Close the queue and wait up to `timeout` for the worker to drain it
    ///
    /// Returns `true` if the worker finished in time.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        drop(self.sender.take());

        let Some(handle) = self.handle.take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Background worker panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }
            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Background worker did not finish within {:?}. \
                     Some records may be lost.",
                    timeout
                );
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Appender for BackgroundAppender {
    fn append(&mut self, level: LogLevel, output: &Rendered) -> Result<()> {
        let message = Message::Record(level, output.clone());
        match self.sender()?.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(message)) => self.handle_overflow(message, level.priority()),
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::queue_closed(self.name.clone())),
        }
    }

    /// Wait until everything queued so far is written and the inner
    /// appender is flushed
    fn flush(&mut self) -> Result<()> {
        let (reply, ack) = bounded(1);
        self.sender()?
            .send(Message::Flush(reply))
            .map_err(|_| LoggerError::queue_closed(self.name.clone()))?;
        ack.recv_timeout(self.shutdown_timeout)
            .map_err(|_| LoggerError::writer(format!("{}: flush timed out", self.name)))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for BackgroundAppender {
    fn drop(&mut self) {
        self.shutdown(self.shutdown_timeout);

        let dropped = self.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] {} shutting down with {} dropped records (failure rate: {:.2}%)",
                self.name,
                dropped,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Drain the queue in batches until every sender is gone
fn run_worker(
    mut inner: Box<dyn Appender>,
    receiver: Receiver<Message>,
    metrics: Arc<LoggerMetrics>,
) {
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    while let Ok(first) = receiver.recv() {
        batch.push(first);
        while batch.len() < BATCH_SIZE {
            match receiver.try_recv() {
                Ok(message) => batch.push(message),
                Err(_) => break,
            }
        }

        let mut flushed = false;
        for message in batch.drain(..) {
            match message {
                Message::Record(level, output) => {
                    write_isolated(inner.as_mut(), level, &output, &metrics);
                    flushed = false;
                }
                Message::Flush(reply) => {
                    let result = flush_isolated(inner.as_mut());
                    flushed = true;
                    let _ = reply.send(result);
                }
            }
        }

        if !flushed {
            if let Err(e) = flush_isolated(inner.as_mut()) {
                eprintln!("[LOGGER ERROR] Appender '{}' flush failed: {}", inner.name(), e);
            }
        }
    }
}

fn write_isolated(
    inner: &mut dyn Appender,
    level: LogLevel,
    output: &Rendered,
    metrics: &LoggerMetrics,
) {
    let result =
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| inner.append(level, output)));
    match result {
        Ok(Ok(())) => {
            metrics.record_written();
        }
        Ok(Err(e)) => {
            eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", inner.name(), e);
            metrics.record_failed();
        }
        Err(_) => {
            eprintln!(
                "[LOGGER CRITICAL] Appender '{}' panicked in background worker. \
                 The worker continues with the next record.",
                inner.name()
            );
            metrics.record_failed();
        }
    }
}

fn flush_isolated(inner: &mut dyn Appender) -> Result<()> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| inner.flush()))
        .unwrap_or_else(|_| Err(LoggerError::sink_panicked(inner.name(), "flush")))
}

/// Builder for [`BackgroundAppender`]
pub struct BackgroundAppenderBuilder {
    inner: Box<dyn Appender>,
    capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    shutdown_timeout: Duration,
}

impl BackgroundAppenderBuilder {
    pub fn new(inner: Box<dyn Appender>) -> Self {
        Self {
            inner,
            capacity: DEFAULT_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Callback invoked with the total drop count whenever a drop is alerted
    ///
    /// # Example
    ///
    /// ```
    /// use tagged_logger::appenders::{BackgroundAppender, MemoryAppender};
    /// use std::sync::Arc;
    ///
    /// let appender = BackgroundAppender::builder(MemoryAppender::new())
    ///     .capacity(16)
    ///     .on_overflow(Arc::new(|count| eprintln!("{} records dropped", count)))
    ///     .build();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Upper bound for draining on drop and for waiting on flush
    #[must_use = "builder methods return a new value"]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn build(self) -> BackgroundAppender {
        BackgroundAppender::spawn(self)
    }
}
