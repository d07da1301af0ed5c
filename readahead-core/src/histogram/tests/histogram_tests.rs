use crate::histogram::{HistogramSnapshot, LatencyHistogram, MAX_SLOTS, UNIT};
use pretty_assertions::assert_eq;

#[test]
fn empty_histogram_snapshot() {
    let hist = LatencyHistogram::new();
    let snap = hist.snapshot();

    assert_eq!(snap.total, 0);
    assert_eq!(snap.unused, 0);
    assert_eq!(snap.unit, UNIT);
    assert_eq!(snap.slots, vec![0; MAX_SLOTS]);
}

#[test]
fn prefetched_pages_are_unused_until_classified() {
    let hist = LatencyHistogram::new();
    hist.record_prefetched();
    hist.record_prefetched();

    let snap = hist.snapshot();
    assert_eq!((snap.unused, snap.total), (2, 2));

    hist.record_used(5);
    let snap = hist.snapshot();
    assert_eq!((snap.unused, snap.total), (1, 2));
    assert_eq!(snap.slots[2], 1);
}

#[test]
fn total_equals_unused_plus_used() {
    let hist = LatencyHistogram::new();
    for _ in 0..10 {
        hist.record_prefetched();
    }
    for ms in [0, 1, 8, 200, 3000, 7] {
        hist.record_used(ms);
    }

    let snap = hist.snapshot();
    assert_eq!(snap.total, snap.unused + snap.used());
    assert_eq!(snap.unused, 4);
}

#[test]
fn concurrent_recording_is_exact() {
    let hist = LatencyHistogram::new();

    std::thread::scope(|s| {
        for t in 0..8u64 {
            let hist = &hist;
            s.spawn(move || {
                for i in 0..1000u64 {
                    hist.record_prefetched();
                    hist.record_used(t * 1000 + i);
                }
            });
        }
    });

    let snap = hist.snapshot();
    assert_eq!(snap.total, 8000);
    assert_eq!(snap.used(), 8000);
    assert_eq!(snap.unused, 0);
}

#[test]
fn percentiles_report_bucket_upper_bounds() {
    let mut slots = vec![0; MAX_SLOTS];
    slots[0] = 50; // 0-1ms
    slots[3] = 45; // 8-15ms
    slots[6] = 5; // 64-127ms
    let snap = HistogramSnapshot::new(slots, 120);

    assert_eq!(snap.unused, 20);
    assert_eq!(snap.percentile_ms(0.50), 1);
    assert_eq!(snap.percentile_ms(0.95), 15);
    assert_eq!(snap.percentile_ms(0.99), 127);
}

#[test]
fn percentile_of_empty_snapshot_is_zero() {
    let snap = HistogramSnapshot::new(vec![0; MAX_SLOTS], 3);
    assert_eq!(snap.percentile_ms(0.5), 0);
}
