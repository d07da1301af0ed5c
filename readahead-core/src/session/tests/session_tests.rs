use crate::config::{RunLimit, SessionConfig};
use crate::session::{EndReason, ObservationSession};
use crate::tracker::ReadaheadEvent;
use crate::types::{PageId, Timestamp};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn session() -> ObservationSession {
    ObservationSession::new(SessionConfig::default())
}

#[test]
fn run_for_duration_ends_elapsed() {
    let s = session();
    let report = s.run(RunLimit::For(Duration::from_millis(30)));

    assert_eq!(report.end_reason, EndReason::Elapsed);
    assert!(report.elapsed_ms >= 30);
    assert_eq!(report.histogram.total, 0);
}

#[test]
fn stop_cuts_an_unbounded_run_short() {
    let s = session();
    let stop = s.stop_handle();

    let waker = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        stop.stop(EndReason::Interrupted);
    });

    let report = s.run(RunLimit::UntilStopped);
    waker.join().unwrap();

    assert_eq!(report.end_reason, EndReason::Interrupted);
}

#[test]
fn stop_before_run_is_not_lost() {
    let s = session();
    s.stop_handle().stop(EndReason::SourceExhausted);

    let report = s.run(RunLimit::For(Duration::from_secs(60)));
    assert_eq!(report.end_reason, EndReason::SourceExhausted);
}

#[test]
fn events_delivered_before_the_cutoff_are_reported() {
    let s = session();
    let sink = s.sink();

    assert!(sink.deliver(ReadaheadEvent::WindowStart));
    assert!(sink.deliver(ReadaheadEvent::PageAllocated {
        page: PageId(1),
        ts: Timestamp(0),
    }));
    assert!(sink.deliver(ReadaheadEvent::PageAccessed {
        page: PageId(1),
        ts: Timestamp::from_millis(5),
    }));
    s.stop_handle().stop(EndReason::Interrupted);

    let report = s.run(RunLimit::UntilStopped);
    assert_eq!(report.histogram.total, 1);
    assert_eq!(report.histogram.slots[2], 1);
    assert_eq!(report.p50_ms, 7);
}

#[test]
fn sink_is_closed_after_run() {
    let s = session();
    let sink = s.sink();
    let report = s.run(RunLimit::For(Duration::from_millis(1)));

    assert!(sink.is_closed());
    assert!(!sink.deliver(ReadaheadEvent::WindowStart));
    assert_eq!(report.histogram.total, 0);
}

#[test]
fn no_event_after_cutoff_reaches_the_report() {
    let s = session();
    let sink = s.sink();
    sink.deliver(ReadaheadEvent::WindowStart);

    let accepted = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4u64)
            .map(|w| {
                let sink = sink.clone();
                scope.spawn(move || {
                    let mut accepted = 0u64;
                    let mut i = 0u64;
                    loop {
                        let event = ReadaheadEvent::PageAllocated {
                            page: PageId(w << 32 | i),
                            ts: Timestamp(i),
                        };
                        if !sink.deliver(event) {
                            return accepted;
                        }
                        accepted += 1;
                        i += 1;
                    }
                })
            })
            .collect();

        let report = s.run(RunLimit::For(Duration::from_millis(50)));
        let accepted: u64 = workers.into_iter().map(|w| w.join().unwrap()).sum();
        (report, accepted)
    });

    let (report, accepted) = accepted;
    assert_eq!(report.histogram.total, accepted);
    assert_eq!(report.histogram.unused, accepted);
}

#[test]
fn many_producers_full_cycles() {
    const PRODUCERS: u64 = 32;
    let s = session();
    let sink = s.sink();
    sink.deliver(ReadaheadEvent::WindowStart);

    std::thread::scope(|scope| {
        for id in 0..PRODUCERS {
            let sink = sink.clone();
            scope.spawn(move || {
                sink.deliver(ReadaheadEvent::PageAllocated {
                    page: PageId(id),
                    ts: Timestamp(0),
                });
                sink.deliver(ReadaheadEvent::PageAccessed {
                    page: PageId(id),
                    ts: Timestamp::from_millis(id),
                });
            });
        }
    });

    s.stop_handle().stop(EndReason::Interrupted);
    let report = s.run(RunLimit::UntilStopped);

    assert_eq!(report.histogram.total, PRODUCERS);
    assert_eq!(report.histogram.unused, 0);
    assert_eq!(report.histogram.used(), PRODUCERS);
    assert_eq!(report.in_flight, 0);
}
