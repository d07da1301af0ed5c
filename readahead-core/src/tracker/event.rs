use crate::types::{PageId, Timestamp};
use serde::{Deserialize, Serialize};

/// One instrumentation-point hit, as delivered by an event source.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReadaheadEvent {
    /// Entry of the kernel's read-ahead routine.
    WindowStart,
    /// Return from the kernel's read-ahead routine.
    WindowEnd,
    /// A page-cache page was allocated.
    PageAllocated { page: PageId, ts: Timestamp },
    /// A page-cache page was marked accessed.
    PageAccessed { page: PageId, ts: Timestamp },
    /// A page left the page cache. Only frees the in-flight record.
    PageEvicted { page: PageId },
}

impl ReadaheadEvent {
    pub fn page(&self) -> Option<PageId> {
        match self {
            ReadaheadEvent::PageAllocated { page, .. }
            | ReadaheadEvent::PageAccessed { page, .. }
            | ReadaheadEvent::PageEvicted { page } => Some(*page),
            ReadaheadEvent::WindowStart | ReadaheadEvent::WindowEnd => None,
        }
    }

    pub fn is_window_transition(&self) -> bool {
        self.page().is_none()
    }
}
