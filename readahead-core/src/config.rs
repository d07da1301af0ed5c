use crate::error::ConfigError;
use crate::page_table::DEFAULT_MAX_ENTRIES;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PRODUCERS: usize = 4;

/// How long an observation session runs.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RunLimit {
    For(Duration),
    /// Until interrupted or the event source is exhausted.
    UntilStopped,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SessionConfig {
    pub max_entries: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TraceInput {
    Stdin,
    File(PathBuf),
}

impl TraceInput {
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            TraceInput::Stdin
        } else {
            TraceInput::File(PathBuf::from(arg))
        }
    }
}

/// Validated settings for one `run` invocation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RunConfig {
    pub limit: RunLimit,
    pub json: bool,
    pub trace: TraceInput,
    pub producers: usize,
    pub session: SessionConfig,
}

impl RunConfig {
    pub fn new(
        duration_secs: Option<u64>,
        trace: TraceInput,
        producers: usize,
        max_entries: usize,
    ) -> Result<Self, ConfigError> {
        let limit = match duration_secs {
            Some(0) => return Err(ConfigError::InvalidDuration { value: 0 }),
            Some(secs) => RunLimit::For(Duration::from_secs(secs)),
            None => RunLimit::UntilStopped,
        };
        if producers == 0 {
            return Err(ConfigError::InvalidProducers { value: producers });
        }
        if max_entries == 0 {
            return Err(ConfigError::InvalidMaxEntries { value: max_entries });
        }

        Ok(Self {
            limit,
            json: false,
            trace,
            producers,
            session: SessionConfig { max_entries },
        })
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}
