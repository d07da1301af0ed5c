//! Read-ahead page lifecycle tracker.
//!
//! Correlates window start/end, page allocation and page access events into
//! per-page records and folds them into the latency histogram. Every handler
//! is a no-op when its precondition does not hold, so events that race past
//! each other or arrive unmatched never corrupt the counters.
//!
//! The window flag is a single advisory boolean shared by all producers:
//! concurrent start/end transitions resolve last-write-wins.

mod event;


pub use event::ReadaheadEvent;

use crate::histogram::{HistogramSnapshot, LatencyHistogram};
use crate::page_table::{InsertOutcome, PageTable};
use crate::types::{PageId, Timestamp};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Copy, Clone, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    WindowClosed,
    WindowOpen,
}

#[derive(Debug)]
pub struct LifecycleTracker {
    window_open: AtomicBool,
    pages: PageTable,
    histogram: LatencyHistogram,
}

impl LifecycleTracker {
    pub fn new(max_entries: usize) -> Self {
        Self {
            window_open: AtomicBool::new(false),
            pages: PageTable::new(max_entries),
            histogram: LatencyHistogram::new(),
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.window_open.load(Ordering::Acquire) {
            TrackerState::WindowOpen
        } else {
            TrackerState::WindowClosed
        }
    }

    pub fn handle(&self, event: ReadaheadEvent) {
        match event {
            ReadaheadEvent::WindowStart => self.on_window_start(),
            ReadaheadEvent::WindowEnd => self.on_window_end(),
            ReadaheadEvent::PageAllocated { page, ts } => {
                let _ = self.on_page_allocated(page, ts);
            }
            ReadaheadEvent::PageAccessed { page, ts } => {
                let _ = self.on_page_accessed(page, ts);
            }
            ReadaheadEvent::PageEvicted { page } => {
                let _ = self.on_page_evicted(page);
            }
        }
    }

    pub fn on_window_start(&self) {
        self.window_open.store(true, Ordering::Release);
    }

    pub fn on_window_end(&self) {
        self.window_open.store(false, Ordering::Release);
    }

    /// Returns `None` when the page was allocated outside a window.
    pub fn on_page_allocated(&self, page: PageId, ts: Timestamp) -> Option<InsertOutcome> {
        if !self.window_open.load(Ordering::Acquire) {
            return None;
        }

        // Count before the record becomes visible so a racing access can
        // never classify a page that is not yet in `total`.
        self.histogram.record_prefetched();
        Some(self.pages.insert(page, ts))
    }

    /// Returns the time-to-first-access in milliseconds when `page` was
    /// being tracked.
    pub fn on_page_accessed(&self, page: PageId, now: Timestamp) -> Option<u64> {
        let record = self.pages.take(page)?;
        let latency_ms = now.millis_since(record.allocated_at);
        self.histogram.record_used(latency_ms);
        Some(latency_ms)
    }

    /// Drop the record for a page that left the cache unread. It stays
    /// counted as unused.
    pub fn on_page_evicted(&self, page: PageId) -> bool {
        self.pages.take(page).is_some()
    }

    pub fn in_flight(&self) -> usize {
        self.pages.len()
    }

    pub fn max_entries(&self) -> usize {
        self.pages.capacity()
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        self.histogram.snapshot()
    }
}
