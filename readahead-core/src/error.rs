use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration: {value} (must be a positive number of seconds)")]
    InvalidDuration { value: u64 },

    #[error("invalid producer count: {value} (must be at least 1)")]
    InvalidProducers { value: usize },

    #[error("invalid max entries: {value} (must be at least 1)")]
    InvalidMaxEntries { value: usize },
}

/// Failures while wiring the session to its event source. The session is
/// never run when one of these occurs.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to open trace {path}: {source}")]
    OpenTrace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load kallsyms from {path}: {source}")]
    LoadKallsyms {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to find symbol: {}, unsupported kernel version", .candidates.join("/"))]
    UnsupportedKernel { candidates: Vec<&'static str> },

    #[error("failed to spawn event source thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to install interrupt handler")]
    SignalHandler(#[from] ctrlc::Error),
}

impl SetupError {
    pub fn open_trace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OpenTrace {
            path: path.into(),
            source,
        }
    }

    pub fn load_kallsyms(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LoadKallsyms {
            path: path.into(),
            source,
        }
    }
}
