//! Log2 latency histogram for time-to-first-access of prefetched pages.
//!
//! Counters are independent atomics so any number of producers can record
//! concurrently without a shared lock. `unused` is never stored: it is
//! derived from `total` and the sum of the latency slots when a snapshot is
//! taken.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(test)]
mod tests;

/// Number of log2 millisecond buckets, covering sub-millisecond up to
/// roughly a day and a half. Anything larger lands in the last slot.
pub const MAX_SLOTS: usize = 27;

pub const UNIT: &str = "msecs";

/// `floor(log2(max(latency_ms, 1)))`, clamped to `[0, MAX_SLOTS - 1]`.
pub fn bucket_index(latency_ms: u64) -> usize {
    let idx = (u64::BITS - 1 - latency_ms.max(1).leading_zeros()) as usize;
    idx.min(MAX_SLOTS - 1)
}

/// Inclusive millisecond range covered by a slot, as printed in the report.
/// Slots past the width of `u64` saturate at `u64::MAX`.
pub fn bucket_bounds(index: usize) -> (u64, u64) {
    let Some(low) = u32::try_from(index)
        .ok()
        .and_then(|shift| 1u64.checked_shl(shift))
    else {
        return (u64::MAX, u64::MAX);
    };
    let high = low.checked_mul(2).map_or(u64::MAX, |upper| upper - 1);
    if low == high { (low - 1, high) } else { (low, high) }
}

#[derive(Debug)]
pub struct LatencyHistogram {
    slots: [AtomicU64; MAX_SLOTS],
    total: AtomicU64,
}

impl LatencyHistogram {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| AtomicU64::new(0)),
            total: AtomicU64::new(0),
        }
    }

    /// Count a page that was speculatively fetched. Until a matching
    /// `record_used` arrives the page is reported as unused.
    pub fn record_prefetched(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Classify a previously prefetched page as used after `latency_ms`.
    /// Does not touch `total`; the page was counted when it was prefetched.
    pub fn record_used(&self, latency_ms: u64) {
        self.slots[bucket_index(latency_ms)].fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        let slots: Vec<u64> = self
            .slots
            .iter()
            .map(|s| s.load(Ordering::Relaxed))
            .collect();
        let total = self.total.load(Ordering::Relaxed);

        HistogramSnapshot::new(slots, total)
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a histogram handed to the report printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramSnapshot {
    pub unused: u64,
    pub total: u64,
    pub unit: &'static str,
    pub slots: Vec<u64>,
}

impl HistogramSnapshot {
    pub fn new(slots: Vec<u64>, total: u64) -> Self {
        let used: u64 = slots.iter().sum();
        Self {
            unused: total.saturating_sub(used),
            total,
            unit: UNIT,
            slots,
        }
    }

    pub fn used(&self) -> u64 {
        self.slots.iter().sum()
    }

    /// (upper bound, count) pairs in slot order.
    pub fn numeric_buckets(&self) -> Vec<(u64, u64)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, count)| (bucket_bounds(i).1, *count))
            .collect()
    }

    /// Upper bound in milliseconds of the bucket holding the `pct` quantile
    /// of used pages. Zero when no page was used.
    pub fn percentile_ms(&self, pct: f64) -> u64 {
        percentile_from_histogram(&self.numeric_buckets(), self.used(), pct)
    }
}

pub fn percentile_from_histogram(buckets: &[(u64, u64)], total: u64, pct: f64) -> u64 {
    if total == 0 {
        return 0;
    }

    let target = (total as f64 * pct).ceil().max(1.0) as u64;
    let mut running = 0;

    for (upper, count) in buckets {
        running += *count;
        if running >= target {
            return *upper;
        }
    }

    buckets.last().map(|(upper, _)| *upper).unwrap_or(0)
}
