//! Event sources: whatever sits between an instrumentation mechanism and
//! the session's [`EventSink`].

mod replay;

#[cfg(test)]
mod tests;

pub use replay::{ReplayStats, TraceReplaySource};

use crate::error::SetupError;
use crate::session::{EventSink, StopHandle};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub trait EventSource {
    fn name(&self) -> &str;

    /// Start delivering events into `sink`. A source that runs dry may end
    /// the session through `stop`.
    fn attach(self: Box<Self>, sink: EventSink, stop: StopHandle)
    -> Result<AttachedSource, SetupError>;
}

/// Producer threads started by a source.
///
/// Every worker reports on a shared completion channel when it exits,
/// including by panic, so `detach` waits on one deadline instead of polling.
#[derive(Debug)]
pub struct AttachedSource {
    name: String,
    workers: Vec<JoinHandle<()>>,
    done_tx: mpsc::Sender<usize>,
    done_rx: mpsc::Receiver<usize>,
}

/// Reports a worker's exit from its own thread.
struct Completion {
    index: usize,
    done: mpsc::Sender<usize>,
}

impl Drop for Completion {
    fn drop(&mut self) {
        let _ = self.done.send(self.index);
    }
}

impl AttachedSource {
    pub fn new(name: impl Into<String>) -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            name: name.into(),
            workers: Vec::new(),
            done_tx,
            done_rx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Start one producer thread named after the source.
    pub fn spawn(&mut self, work: impl FnOnce() + Send + 'static) -> Result<(), SetupError> {
        let completion = Completion {
            index: self.workers.len(),
            done: self.done_tx.clone(),
        };
        let worker = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || {
                let _completion = completion;
                work();
            })
            .map_err(SetupError::Spawn)?;
        self.workers.push(worker);
        Ok(())
    }

    /// Join every producer thread that exits within `grace`. A thread still
    /// blocked on its input at the deadline is not joined; it is left to die
    /// with the process.
    pub fn detach(self, grace: Duration) {
        let Self {
            name,
            workers,
            done_tx,
            done_rx,
        } = self;
        drop(done_tx);

        let deadline = Instant::now() + grace;
        let mut finished = vec![false; workers.len()];
        let mut remaining = workers.len();
        while remaining > 0 {
            match done_rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(index) => {
                    finished[index] = true;
                    remaining -= 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        for (worker, done) in workers.into_iter().zip(finished) {
            if done && worker.join().is_err() {
                warn!(source = %name, "event source thread panicked");
            }
        }

        if remaining > 0 {
            debug!(source = %name, abandoned = remaining, "event source threads still blocked on input");
        }
        info!(source = %name, "event source detached");
    }
}
