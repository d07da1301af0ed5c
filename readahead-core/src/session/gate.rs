use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Admission gate between event producers and the session cutoff.
///
/// Producers announce themselves in `in_flight` before checking `closed`;
/// `close` publishes `closed` before waiting for `in_flight` to drain. With
/// both sides `SeqCst`, every delivery either observes the gate closed or is
/// waited for by `close`, so nothing lands after the snapshot.
///
/// Producers that already see the gate closed never touch `in_flight`, so
/// the drain finishes even while they keep firing.
#[derive(Debug, Default)]
pub struct EventGate {
    closed: AtomicBool,
    in_flight: AtomicUsize,
}

impl EventGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one delivery. `None` once the gate is closed.
    pub fn try_enter(&self) -> Option<GateGuard<'_>> {
        if self.closed.load(Ordering::SeqCst) {
            return None;
        }
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if self.closed.load(Ordering::SeqCst) {
            self.release();
            return None;
        }
        Some(GateGuard { gate: self })
    }

    /// Stop admitting deliveries and wait for admitted ones to finish.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        while self.in_flight.load(Ordering::SeqCst) != 0 {
            std::thread::yield_now();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn release(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// RAII guard for one admitted delivery.
///
/// Invariants:
/// - A guard is created only after `try_enter` saw the gate open
/// - The in-flight slot is released exactly once on Drop
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a EventGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
