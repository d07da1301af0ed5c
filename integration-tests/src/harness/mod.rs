pub mod trace;
pub mod tracing;

pub use trace::{EndlessTrace, TraceBuilder};
pub use tracing::{CapturedEvent, init_test_tracing};
