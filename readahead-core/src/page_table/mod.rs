//! In-flight page records: pages allocated inside a read-ahead window that
//! have not yet been accessed.

use crate::types::{PageId, Timestamp};
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};


/// Default bound on tracked pages.
pub const DEFAULT_MAX_ENTRIES: usize = 10240;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PageRecord {
    pub page: PageId,
    pub allocated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InsertOutcome {
    Inserted,
    /// A stale record for a recycled page identity was overwritten.
    Replaced,
    /// The table was full and the identity was not already tracked.
    Rejected,
}

#[derive(Debug)]
pub struct PageTable {
    records: DashMap<PageId, PageRecord, RandomState>,
    len: AtomicUsize,
    capacity: usize,
}

impl PageTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: DashMap::with_hasher(RandomState::new()),
            len: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Track `page` from `allocated_at`. Last allocation wins for an identity
    /// that is already tracked; new identities are refused once the table
    /// holds `capacity` records.
    pub fn insert(&self, page: PageId, allocated_at: Timestamp) -> InsertOutcome {
        let record = PageRecord { page, allocated_at };

        if let Some(mut existing) = self.records.get_mut(&page) {
            *existing = record;
            return InsertOutcome::Replaced;
        }

        // Reserve a slot before inserting so concurrent inserts cannot
        // overshoot the bound.
        let mut current = self.len.load(Ordering::Relaxed);
        loop {
            if current >= self.capacity {
                return InsertOutcome::Rejected;
            }
            match self.len.compare_exchange_weak(
                current,
                current + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        match self.records.insert(page, record) {
            None => InsertOutcome::Inserted,
            Some(_) => {
                // Lost a race with another insert of the same identity.
                self.len.fetch_sub(1, Ordering::Relaxed);
                InsertOutcome::Replaced
            }
        }
    }

    /// Remove and return the record for `page`, if tracked.
    pub fn take(&self, page: PageId) -> Option<PageRecord> {
        let (_, record) = self.records.remove(&page)?;
        self.len.fetch_sub(1, Ordering::Relaxed);
        Some(record)
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}
