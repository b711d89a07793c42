//! Reference scenarios for the aggregation engine.

use aggregation::{
    aggregate, build_roi, build_series, compare_windows, cpm, dedupe, reconcile, WindowEvent,
};
use analytics_core::{MetricTotals, SourceType};
use chrono::Duration;
use integration_tests::fixtures::{
    brand_programs, campaign_earning, campaign_views, submission, utc,
};

/// Two same-day syncs of one campaign collapse to the later one.
#[test]
fn test_same_day_snapshots_collapse_to_latest() {
    let snapshots = vec![
        campaign_views("c1", utc(2024, 1, 1, 8, 0), 100),
        campaign_views("c1", utc(2024, 1, 1, 20, 0), 150),
    ];

    let deduped = dedupe(&snapshots);

    assert_eq!(deduped.len(), 1);
    assert_eq!(deduped[0].source_type, SourceType::Campaign);
    assert_eq!(deduped[0].source_id, "c1");
    assert_eq!(deduped[0].totals.views, 150);
}

/// A later day reporting fewer cumulative views clamps its delta to zero.
#[test]
fn test_regression_clamps_daily_delta() {
    let snapshots = vec![
        campaign_views("c1", utc(2024, 1, 1, 12, 0), 100),
        campaign_views("c1", utc(2024, 1, 2, 12, 0), 250),
        campaign_views("c1", utc(2024, 1, 3, 12, 0), 200),
    ];

    let series = aggregate(&dedupe(&snapshots));

    let daily: Vec<u64> = series.iter().map(|d| d.daily.views).collect();
    assert_eq!(daily, vec![100, 150, 0]);
    let cumulative: Vec<u64> = series.iter().map(|d| d.cumulative.views).collect();
    assert_eq!(cumulative, vec![100, 250, 200]);
}

/// Activity only in the current week reports zero change, not infinity.
#[test]
fn test_no_prior_window_reports_zero_change() {
    let now = utc(2024, 2, 20, 9, 0);
    let events = vec![
        WindowEvent::new(now - Duration::days(1), 300.0),
        WindowEvent::new(now - Duration::days(6), 200.0),
    ];

    let cmp = compare_windows(&events, now);

    assert_eq!(cmp.prior_window_sum, 0.0);
    assert_eq!(cmp.current_window_sum, 500.0);
    assert_eq!(cmp.percent_change, 0.0);
    assert!(cmp.percent_change.is_finite());
}

/// Cost per thousand views per creator.
#[test]
fn test_creator_cost_per_view() {
    let at = utc(2024, 3, 1, 0, 0);
    let content = vec![
        submission("v1", "u1", "c1", 1000, at, false),
        submission("v2", "u2", "c1", 500, at, false),
    ];
    let transactions = vec![
        campaign_earning("u1", 10.0, at, "c1"),
        campaign_earning("u1", 20.0, at, "c1"),
        campaign_earning("u2", 5.0, at, "c1"),
    ];

    let rows = build_roi(&content, &transactions);

    let u1 = rows.iter().find(|r| r.user_id == "u1").unwrap();
    let u2 = rows.iter().find(|r| r.user_id == "u2").unwrap();
    assert_eq!(u1.total_paid, 30.0);
    assert_eq!(u1.cost_per_view, 30.0);
    assert_eq!(u2.total_paid, 5.0);
    assert_eq!(u2.cost_per_view, 10.0);
    assert_eq!(rows[0].user_id, "u1");
}

/// ROI cost per view and program CPM use the same formula.
#[test]
fn test_program_cpm_matches_roi_formula() {
    let at = utc(2024, 3, 1, 0, 0);
    let transactions = vec![
        campaign_earning("u1", 10.0, at, "c1"),
        campaign_earning("u1", 20.0, at, "c1"),
        campaign_earning("u2", 5.0, at, "c1"),
        campaign_earning("u3", 50.0, at, "someone-else"),
    ];

    let summary = reconcile(&transactions, &brand_programs(), None);

    assert_eq!(summary.total_payout, 35.0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(cpm(summary.total_payout, 1500), 35.0 / 1500.0 * 1000.0);
    assert_eq!(cpm(summary.total_payout, 0), 0.0);
}

/// Without snapshot history the chart is a single bucket from current totals.
#[test]
fn test_current_totals_fallback_bypasses_dedupe() {
    let today = utc(2024, 4, 10, 15, 0).date_naive();
    let current = MetricTotals::new(1200, 80, 9, 4, 3);

    let series = build_series(&[], Some(current), today);

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].date, today);
    assert_eq!(series[0].cumulative, current);
    assert_eq!(series[0].daily, current);
    assert!(build_series(&[], None, today).is_empty());
}
