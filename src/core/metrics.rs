//! Formatter metrics for observability
//!
//! Counters for formatted and failed events and for fields cut to the byte
//! budget.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for formatter observability
///
/// # Example
///
/// ```
/// use newrelic_log_formatter::FormatterMetrics;
///
/// let metrics = FormatterMetrics::new();
///
/// metrics.record_formatted();
/// metrics.record_failed();
///
/// assert_eq!(metrics.formatted_count(), 1);
/// assert_eq!(metrics.failed_count(), 1);
/// ```
#[derive(Debug)]
pub struct FormatterMetrics {
    /// Events written completely
    formatted_count: AtomicU64,

    /// Events whose formatting or write failed
    failed_count: AtomicU64,

    /// String fields cut to the byte budget
    truncated_fields: AtomicU64,
}

impl FormatterMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            formatted_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
            truncated_fields: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn formatted_count(&self) -> u64 {
        self.formatted_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn truncated_fields(&self) -> u64 {
        self.truncated_fields.load(Ordering::Relaxed)
    }

    /// Record a fully written event
    #[inline]
    pub fn record_formatted(&self) -> u64 {
        self.formatted_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed event
    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_truncated(&self, fields: usize) -> u64 {
        self.truncated_fields.fetch_add(fields as u64, Ordering::Relaxed)
    }

    /// Failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no events have been processed.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_count() as f64;
        let total = self.formatted_count() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.formatted_count.store(0, Ordering::Relaxed);
        self.failed_count.store(0, Ordering::Relaxed);
        self.truncated_fields.store(0, Ordering::Relaxed);
    }
}

impl Default for FormatterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FormatterMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            formatted_count: AtomicU64::new(self.formatted_count()),
            failed_count: AtomicU64::new(self.failed_count()),
            truncated_fields: AtomicU64::new(self.truncated_fields()),
        }
    }
}
