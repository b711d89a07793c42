//! Invariants checked over seeded random inputs.

use aggregation::{
    aggregate, avg_views_per_video, build_roi, compare_windows, cpm, dedupe, percent_change,
    TrailingWindows, WindowEvent,
};
use analytics_core::{ContentItem, MetricTotals, SourceType};
use chrono::Duration;
use integration_tests::fixtures::{utc, SnapshotGen};

const SEEDS: std::ops::Range<u64> = 0..32;

#[test]
fn test_dedupe_is_idempotent() {
    for seed in SEEDS {
        let snapshots = SnapshotGen::new(seed).noisy(200, 10);

        let once = dedupe(&snapshots);
        let twice = dedupe(&once);

        assert_eq!(once, twice, "seed {seed}");
    }
}

#[test]
fn test_dedupe_keeps_one_per_source_day() {
    for seed in SEEDS {
        let snapshots = SnapshotGen::new(seed).noisy(200, 10);

        let deduped = dedupe(&snapshots);

        for pair in deduped.windows(2) {
            let a = (pair[0].day(), pair[0].source_type, &pair[0].source_id);
            let b = (pair[1].day(), pair[1].source_type, &pair[1].source_id);
            assert!(a < b, "seed {seed}: {a:?} !< {b:?}");
        }
        for kept in &deduped {
            let latest = snapshots
                .iter()
                .filter(|s| {
                    s.day() == kept.day()
                        && s.source_type == kept.source_type
                        && s.source_id == kept.source_id
                })
                .map(|s| s.recorded_at)
                .max();
            assert_eq!(latest, Some(kept.recorded_at), "seed {seed}");
        }
    }
}

#[test]
fn test_daily_deltas_never_exceed_growth() {
    for seed in SEEDS {
        let series = aggregate(&dedupe(&SnapshotGen::new(seed).noisy(300, 20)));

        // Unsigned deltas cannot be negative; they must also never exceed the
        // growth over the previous bucket.
        for pair in series.windows(2) {
            let expected = pair[1].cumulative.saturating_sub(&pair[0].cumulative);
            assert_eq!(pair[1].daily, expected, "seed {seed}");
        }
        if let Some(first) = series.first() {
            assert_eq!(first.daily, first.cumulative);
        }
    }
}

#[test]
fn test_monotone_deltas_reproduce_cumulative() {
    for seed in SEEDS {
        let series = aggregate(&dedupe(&SnapshotGen::new(seed).monotone(30)));
        assert_eq!(series.len(), 30);

        let mut running = MetricTotals::default();
        for day in &series {
            running += day.daily;
            assert_eq!(running, day.cumulative, "seed {seed} on {}", day.date);
        }
    }
}

#[test]
fn test_zero_denominators_yield_zero() {
    assert_eq!(cpm(100.0, 0), 0.0);
    assert_eq!(percent_change(500.0, 0.0), 0.0);
    assert_eq!(avg_views_per_video(0, 0), 0.0);

    let item = ContentItem::approved("v1", "u1", SourceType::Campaign, "c1", 0);
    let rows = build_roi(&[item], &[]);
    assert_eq!(rows[0].avg_views_per_video, 0.0);
    assert_eq!(rows[0].cost_per_view, 0.0);
    assert!(rows.iter().all(|r| r.cost_per_view.is_finite()));
}

#[test]
fn test_windows_are_disjoint_and_cover_fourteen_days() {
    let now = utc(2024, 5, 15, 13, 37);
    let windows = TrailingWindows::ending_at(now);

    assert_eq!(windows.span(), Duration::days(14));
    assert_eq!(windows.end - windows.current_start, Duration::days(7));
    assert_eq!(windows.current_start - windows.prior_start, Duration::days(7));

    // Every hour in the span lands in exactly one window
    let mut at = windows.prior_start;
    while at < windows.end {
        assert!(windows.in_current(at) ^ windows.in_prior(at), "{at}");
        at += Duration::hours(1);
    }
    assert!(!windows.in_current(now) && !windows.in_prior(now));
    let before = windows.prior_start - Duration::nanoseconds(1);
    assert!(!windows.in_current(before) && !windows.in_prior(before));
}

#[test]
fn test_window_sums_partition_events() {
    let now = utc(2024, 5, 15, 0, 0);
    let events: Vec<WindowEvent> = (0..14 * 24)
        .map(|h| WindowEvent::new(now - Duration::hours(h + 1), 1.0))
        .collect();

    let cmp = compare_windows(&events, now);

    assert_eq!(cmp.current_window_sum, 7.0 * 24.0);
    assert_eq!(cmp.prior_window_sum, 7.0 * 24.0);
    assert_eq!(cmp.percent_change, 0.0);
}
