//! Kernel symbol compatibility: decides which kernel entry points produce
//! the four tracker events on the running kernel.

mod kallsyms;
mod plan;


pub use kallsyms::{DEFAULT_KALLSYMS, KernelSymbols};
pub use plan::{
    ACCESS_SYMBOLS, ALLOC_SYMBOLS, AttachPoint, EventKind, ProbeKind, ProbePlan, WINDOW_SYMBOLS,
};
