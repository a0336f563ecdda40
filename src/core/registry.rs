//! Sink registry: the default sinks for loggers built without explicit ones
//!
//! Registries are explicit values. A process-wide instance exists for
//! convenience, but tests and libraries can build isolated registries.
//!
//! Loggers take a snapshot of a registry when they are built; sinks
//! registered later only reach loggers built later.

use super::error::Result;
use super::sink::SharedSink;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// A shared, append-mostly collection of sinks
///
/// Clones share the same underlying collection.
///
/// # Example
///
/// ```
/// use tagged_logger::appenders::MemoryAppender;
/// use tagged_logger::{Logger, Sink, SinkRegistry};
///
/// let registry = SinkRegistry::new();
/// registry.register(Sink::new(MemoryAppender::new()).shared());
///
/// let logger = Logger::builder("api").registry(&registry).build();
/// assert_eq!(logger.sinks().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SinkRegistry {
    sinks: Arc<RwLock<Vec<SharedSink>>>,
}

static GLOBAL: OnceLock<SinkRegistry> = OnceLock::new();

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, empty until sinks are registered
    pub fn global() -> &'static SinkRegistry {
        GLOBAL.get_or_init(SinkRegistry::new)
    }

    pub fn register(&self, sink: SharedSink) {
        self.sinks.write().push(sink);
    }

    /// Copy of the current sink list
    pub fn snapshot(&self) -> Vec<SharedSink> {
        self.sinks.read().clone()
    }

    pub fn len(&self) -> usize {
        self.sinks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.read().is_empty()
    }

    /// Remove every sink, returning them
    pub fn clear(&self) -> Vec<SharedSink> {
        std::mem::take(&mut *self.sinks.write())
    }

    /// Flush every registered sink, returning the first error
    ///
    /// All sinks are flushed even when an earlier one fails.
    pub fn flush_all(&self) -> Result<()> {
        let mut first_error = None;
        for sink in self.snapshot() {
            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::sink::Sink;

    fn sink() -> SharedSink {
        Sink::new(MemoryAppender::new()).shared()
    }

    #[test]
    fn test_register_and_snapshot() {
        let registry = SinkRegistry::new();
        assert!(registry.is_empty());

        registry.register(sink());
        let snapshot = registry.snapshot();
        registry.register(sink());

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clones_share_sinks() {
        let registry = SinkRegistry::new();
        let alias = registry.clone();
        alias.register(sink());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear() {
        let registry = SinkRegistry::new();
        registry.register(sink());
        assert_eq!(registry.clear().len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_flush_all() {
        let registry = SinkRegistry::new();
        registry.register(sink());
        assert!(registry.flush_all().is_ok());
    }
}
