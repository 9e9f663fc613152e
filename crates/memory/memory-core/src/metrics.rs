//! Degrade-policy counters.
//!
//! Per-call backend failures never surface to the caller; they are logged and
//! the call returns an empty result instead. These counters make that policy
//! observable, so tests and operators can tell a degraded read from genuinely
//! empty history.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracking degraded operations on one store instance.
///
/// All counters are monotonic and safe to read concurrently.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    degraded_reads: AtomicU64,
    degraded_writes: AtomicU64,
    skipped_records: AtomicU64,
}

impl StoreMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a read that was degraded to an empty result.
    pub fn record_degraded_read(&self) {
        self.degraded_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a write or clear that was degraded to a no-op.
    pub fn record_degraded_write(&self) {
        self.degraded_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Records stored turns skipped because they failed to decode.
    pub fn record_skipped_records(&self, count: u64) {
        if count > 0 {
            self.skipped_records.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Returns a point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            degraded_reads: self.degraded_reads.load(Ordering::Relaxed),
            degraded_writes: self.degraded_writes.load(Ordering::Relaxed),
            skipped_records: self.skipped_records.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`StoreMetrics`] counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Reads that returned an empty result because of a backend failure.
    pub degraded_reads: u64,
    /// Writes or clears silently dropped because of a backend failure.
    pub degraded_writes: u64,
    /// Stored turns skipped on read because they failed to decode.
    pub skipped_records: u64,
}

impl MetricsSnapshot {
    /// Returns true if no operation has degraded on this store.
    pub fn is_clean(&self) -> bool {
        self.degraded_reads == 0 && self.degraded_writes == 0 && self.skipped_records == 0
    }
}
