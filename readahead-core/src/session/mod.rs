//! One observation run: owns the tracker for its lifetime, hands producers
//! an [`EventSink`], waits for the configured limit and returns the final
//! report.

mod gate;

#[cfg(test)]
mod tests;

pub use gate::{EventGate, GateGuard};

use crate::config::{RunLimit, SessionConfig};
use crate::histogram::HistogramSnapshot;
use crate::tracker::{LifecycleTracker, ReadaheadEvent};
use serde::Serialize;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Elapsed,
    Interrupted,
    SourceExhausted,
}

#[derive(Debug)]
struct Shared {
    tracker: LifecycleTracker,
    gate: EventGate,
}

/// Producer-side handle. Cheap to clone and safe to use from any thread.
#[derive(Debug, Clone)]
pub struct EventSink {
    shared: Arc<Shared>,
}

impl EventSink {
    /// Apply `event` unless the session has already been cut off. Returns
    /// `false` once the session stopped accepting events.
    pub fn deliver(&self, event: ReadaheadEvent) -> bool {
        let Some(_guard) = self.shared.gate.try_enter() else {
            return false;
        };
        self.shared.tracker.handle(event);
        true
    }

    pub fn is_closed(&self) -> bool {
        self.shared.gate.is_closed()
    }
}

/// Ends a running session early.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Sender<EndReason>,
}

impl StopHandle {
    pub fn stop(&self, reason: EndReason) {
        // The session may already have returned; nothing left to wake.
        let _ = self.tx.send(reason);
    }
}

pub struct ObservationSession {
    shared: Arc<Shared>,
    stop: StopHandle,
    stop_rx: Receiver<EndReason>,
}

impl ObservationSession {
    pub fn new(config: SessionConfig) -> Self {
        let (tx, stop_rx) = mpsc::channel();
        Self {
            shared: Arc::new(Shared {
                tracker: LifecycleTracker::new(config.max_entries),
                gate: EventGate::new(),
            }),
            stop: StopHandle { tx },
            stop_rx,
        }
    }

    pub fn sink(&self) -> EventSink {
        EventSink {
            shared: self.shared.clone(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Block until `limit` elapses or a stop is requested, then cut off
    /// producers and snapshot the histogram.
    pub fn run(self, limit: RunLimit) -> SessionReport {
        let started = Instant::now();
        info!(
            limit = ?limit,
            max_entries = self.shared.tracker.max_entries(),
            "observation session started"
        );

        let end_reason = match limit {
            RunLimit::For(duration) => match self.stop_rx.recv_timeout(duration) {
                Ok(reason) => reason,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    EndReason::Elapsed
                }
            },
            // `self.stop` keeps a sender alive, so this only returns on a stop.
            RunLimit::UntilStopped => self.stop_rx.recv().unwrap_or(EndReason::Interrupted),
        };

        self.shared.gate.close();

        let report = SessionReport::new(
            self.shared.tracker.snapshot(),
            started.elapsed(),
            end_reason,
            self.shared.tracker.in_flight(),
        );

        info!(
            reason = ?report.end_reason,
            elapsed_ms = report.elapsed_ms,
            total = report.histogram.total,
            unused = report.histogram.unused,
            in_flight = report.in_flight,
            "observation session finished"
        );

        report
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub end_reason: EndReason,
    pub elapsed_ms: u64,
    /// Records still waiting for an access when the session ended.
    pub in_flight: usize,
    pub p50_ms: u64,
    pub p95_ms: u64,
    pub p99_ms: u64,
    pub histogram: HistogramSnapshot,
}

impl SessionReport {
    pub fn new(
        histogram: HistogramSnapshot,
        elapsed: Duration,
        end_reason: EndReason,
        in_flight: usize,
    ) -> Self {
        Self {
            end_reason,
            elapsed_ms: elapsed.as_millis() as u64,
            in_flight,
            p50_ms: histogram.percentile_ms(0.50),
            p95_ms: histogram.percentile_ms(0.95),
            p99_ms: histogram.percentile_ms(0.99),
            histogram,
        }
    }
}
