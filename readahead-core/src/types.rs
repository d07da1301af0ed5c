use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a physical page (the address of its page descriptor).
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for PageId {
    fn from(v: u64) -> Self {
        PageId(v)
    }
}

/// Monotonic clock reading in nanoseconds.
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const NANOS_PER_MILLI: u64 = 1_000_000;

    pub fn from_millis(ms: u64) -> Self {
        Timestamp(ms.saturating_mul(Self::NANOS_PER_MILLI))
    }

    /// Whole milliseconds from `earlier` to `self`; zero if the clock
    /// readings arrive out of order.
    pub fn millis_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0) / Self::NANOS_PER_MILLI
    }
}
