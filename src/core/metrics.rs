//! Logger metrics for observability
//!
//! Counters for the delivery pipeline. Write failures are reported here and
//! never through the logger itself.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use callsite_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_written();
///
/// assert_eq!(metrics.enqueued_count(), 1);
/// assert_eq!(metrics.written_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted into the buffer
    enqueued: AtomicU64,

    /// Lines accepted by a sink
    written: AtomicU64,

    /// Write attempts repeated after a failure
    retried: AtomicU64,

    /// Lines given up on after the retries were exhausted
    dropped: AtomicU64,

    /// Drain passes, including empty ones
    drains: AtomicU64,

    /// Marker calls made while the logger was inactive
    ignored: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            written: AtomicU64::new(0),
            retried: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            drains: AtomicU64::new(0),
            ignored: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued_count(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written_count(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn retried_count(&self) -> u64 {
        self.retried.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn drain_count(&self) -> u64 {
        self.drains.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn ignored_count(&self) -> u64 {
        self.ignored.load(Ordering::Relaxed)
    }

    /// Each `record_*` returns the previous value
    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_retried(&self) -> u64 {
        self.retried.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_drain(&self) -> u64 {
        self.drains.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_ignored(&self) -> u64 {
        self.ignored.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no lines have been processed.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.written_count() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.retried.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.drains.store(0, Ordering::Relaxed);
        self.ignored.store(0, Ordering::Relaxed);
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
            enqueued: AtomicU64::new(self.enqueued_count()),
            written: AtomicU64::new(self.written_count()),
            retried: AtomicU64::new(self.retried_count()),
            dropped: AtomicU64::new(self.dropped_count()),
            drains: AtomicU64::new(self.drain_count()),
            ignored: AtomicU64::new(self.ignored_count()),
        }
    }
}
