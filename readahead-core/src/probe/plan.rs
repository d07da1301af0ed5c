use crate::error::SetupError;
use crate::probe::KernelSymbols;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// The read-ahead routine was renamed in v5.10 (`__do_page_cache_readahead`
/// became `do_page_cache_ra`). Newest name first.
pub const WINDOW_SYMBOLS: &[&str] = &["do_page_cache_ra", "__do_page_cache_readahead"];

/// Page cache allocation; folio kernels allocate through `filemap_alloc_folio`.
pub const ALLOC_SYMBOLS: &[&str] = &["filemap_alloc_folio", "__page_cache_alloc"];

/// Page access marking; folio kernels mark through `folio_mark_accessed`.
pub const ACCESS_SYMBOLS: &[&str] = &["folio_mark_accessed", "mark_page_accessed"];

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// Function entry.
    Entry,
    /// Function return.
    Return,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    WindowStart,
    WindowEnd,
    PageAllocated,
    PageAccessed,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::WindowStart => "window-start",
            EventKind::WindowEnd => "window-end",
            EventKind::PageAllocated => "page-allocated",
            EventKind::PageAccessed => "page-accessed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct AttachPoint {
    pub symbol: &'static str,
    pub kind: ProbeKind,
    pub event: EventKind,
}

/// Which kernel functions to instrument on the running kernel.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ProbePlan {
    pub points: Vec<AttachPoint>,
}

impl ProbePlan {
    pub fn resolve(symbols: &KernelSymbols) -> Result<Self, SetupError> {
        let window = pick(symbols, WINDOW_SYMBOLS)?;
        let alloc = pick(symbols, ALLOC_SYMBOLS)?;
        let access = pick(symbols, ACCESS_SYMBOLS)?;

        debug!(window, alloc, access, "resolved read-ahead attach points");

        Ok(Self {
            points: vec![
                AttachPoint {
                    symbol: window,
                    kind: ProbeKind::Entry,
                    event: EventKind::WindowStart,
                },
                AttachPoint {
                    symbol: window,
                    kind: ProbeKind::Return,
                    event: EventKind::WindowEnd,
                },
                AttachPoint {
                    symbol: alloc,
                    kind: ProbeKind::Return,
                    event: EventKind::PageAllocated,
                },
                AttachPoint {
                    symbol: access,
                    kind: ProbeKind::Entry,
                    event: EventKind::PageAccessed,
                },
            ],
        })
    }

    pub fn symbol_for(&self, event: EventKind) -> Option<&'static str> {
        self.points
            .iter()
            .find(|p| p.event == event)
            .map(|p| p.symbol)
    }
}

fn pick(symbols: &KernelSymbols, candidates: &[&'static str]) -> Result<&'static str, SetupError> {
    candidates
        .iter()
        .copied()
        .find(|name| symbols.contains(name))
        .ok_or_else(|| SetupError::UnsupportedKernel {
            candidates: candidates.to_vec(),
        })
}
