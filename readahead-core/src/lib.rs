pub mod cli;
pub mod config;
pub mod error;
pub mod histogram;
pub mod logging;
pub mod page_table;
pub mod probe;
pub mod report;
pub mod session;
pub mod source;
pub mod tracker;
pub mod types;

pub use config::{RunConfig, RunLimit, SessionConfig, TraceInput};
pub use error::{ConfigError, SetupError};
pub use histogram::{HistogramSnapshot, MAX_SLOTS};
pub use session::{EndReason, EventSink, ObservationSession, SessionReport, StopHandle};
pub use tracker::{LifecycleTracker, ReadaheadEvent, TrackerState};
pub use types::{PageId, Timestamp};
