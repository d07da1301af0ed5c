use crate::histogram::{MAX_SLOTS, bucket_bounds, bucket_index};

#[test]
fn powers_of_two_land_in_their_exponent() {
    for k in 0..MAX_SLOTS {
        assert_eq!(bucket_index(1u64 << k), k, "2^{k}");
    }
}

#[test]
fn sub_millisecond_clamps_to_first_slot() {
    assert_eq!(bucket_index(0), 0);
    assert_eq!(bucket_index(1), 0);
}

#[test]
fn huge_latencies_clamp_to_last_slot() {
    assert_eq!(bucket_index(1u64 << MAX_SLOTS), MAX_SLOTS - 1);
    assert_eq!(bucket_index(u64::MAX), MAX_SLOTS - 1);
}

#[test]
fn index_is_monotonic() {
    let mut prev = 0;
    for ms in 0..100_000u64 {
        let idx = bucket_index(ms);
        assert!(idx >= prev, "bucket_index({ms}) went backwards");
        prev = idx;
    }
}

#[test]
fn between_powers_rounds_down() {
    assert_eq!(bucket_index(3), 1);
    assert_eq!(bucket_index(5), 2);
    assert_eq!(bucket_index(7), 2);
    assert_eq!(bucket_index(1023), 9);
}

#[test]
fn bounds_match_classic_layout() {
    assert_eq!(bucket_bounds(0), (0, 1));
    assert_eq!(bucket_bounds(1), (2, 3));
    assert_eq!(bucket_bounds(2), (4, 7));
    assert_eq!(bucket_bounds(10), (1024, 2047));
}

#[test]
fn every_value_falls_inside_its_bucket_bounds() {
    for ms in [0u64, 1, 2, 3, 4, 9, 100, 4096, 65_535] {
        let (low, high) = bucket_bounds(bucket_index(ms));
        assert!(low <= ms && ms <= high, "{ms} not in {low}..={high}");
    }
}

#[test]
fn bounds_saturate_past_u64_width() {
    assert_eq!(bucket_bounds(62), (1 << 62, (1 << 63) - 1));
    assert_eq!(bucket_bounds(63), (1 << 63, u64::MAX));
    assert_eq!(bucket_bounds(64), (u64::MAX, u64::MAX));
    assert_eq!(bucket_bounds(usize::MAX), (u64::MAX, u64::MAX));
}
