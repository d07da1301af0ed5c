use crate::source::AttachedSource;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

#[test]
fn detach_joins_finished_workers() {
    let ran = Arc::new(AtomicUsize::new(0));
    let mut attached = AttachedSource::new("test-source");
    for _ in 0..3 {
        let ran = ran.clone();
        attached
            .spawn(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    }
    assert_eq!(attached.workers(), 3);

    attached.detach(Duration::from_secs(5));
    assert_eq!(ran.load(Ordering::SeqCst), 3);
}

#[test]
fn detach_gives_up_on_blocked_worker_at_deadline() {
    let (release, blocked) = mpsc::channel::<()>();
    let mut attached = AttachedSource::new("test-source");
    attached
        .spawn(move || {
            let _ = blocked.recv();
        })
        .unwrap();
    attached.spawn(|| {}).unwrap();

    let started = Instant::now();
    attached.detach(Duration::from_millis(50));
    let waited = started.elapsed();

    assert!(waited >= Duration::from_millis(50), "returned early: {waited:?}");
    assert!(waited < Duration::from_secs(5), "blocked past grace: {waited:?}");
    drop(release);
}

#[test]
fn detach_does_not_wait_out_grace_when_all_exit() {
    let mut attached = AttachedSource::new("test-source");
    attached.spawn(|| {}).unwrap();

    let started = Instant::now();
    attached.detach(Duration::from_secs(30));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn panicked_worker_still_reports_completion() {
    let mut attached = AttachedSource::new("test-source");
    attached.spawn(|| panic!("worker failed")).unwrap();

    let started = Instant::now();
    attached.detach(Duration::from_secs(30));
    assert!(started.elapsed() < Duration::from_secs(5));
}
