//! Dashboard report composition.
//!
//! Scopes raw inputs to one set of programs and runs every stage of the
//! engine over them for a single timeframe.

use std::collections::BTreeSet;

use analytics_core::{
    ContentItem, DateRange, Error, MetricSnapshot, MetricTotals, ProgramSet, Result,
    SubmissionStatus, Timeframe, Transaction,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::activity::{activity_series, ActivityPoint};
use crate::compare::{compare_windows, WindowComparison, WindowEvent};
use crate::dedupe::dedupe;
use crate::payout::{cpm, expected_payout, matching_earnings, reconcile, split_paid_views, PayoutSummary};
use crate::period::period_views;
use crate::roi::{build_roi, CreatorRoi};
use crate::series::{aggregate, clip_to_range, count_regressions, series_or_fallback, DailyAggregate};

/// Borrowed inputs for one report.
#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    pub programs: &'a ProgramSet,
    pub snapshots: &'a [MetricSnapshot],
    pub transactions: &'a [Transaction],
    pub content: &'a [ContentItem],
    /// Payout per thousand views owed on approved content
    pub rpm_rate: f64,
}

/// Headline numbers for the selected timeframe.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Views of approved submissions in the timeframe
    pub total_views: u64,
    pub total_payouts: f64,
    pub effective_cpm: f64,
    pub views_week: WindowComparison,
    pub payouts_week: WindowComparison,
    pub total_submissions: u64,
    pub approved_submissions: u64,
    pub rejected_submissions: u64,
    pub pending_submissions: u64,
    /// Approved share of all submissions, in percent
    pub approval_rate: f64,
    /// Likes, shares and bookmarks per view of approved content, in percent
    pub engagement_rate: f64,
    pub paid_views: u64,
    pub unpaid_views: u64,
    pub rpm_rate: f64,
    pub expected_payout: f64,
    pub period_views: u64,
    pub previous_period_views: u64,
    pub views_difference: i64,
    pub all_time_views: u64,
    pub active_creators: u64,
    pub avg_views_per_creator: f64,
}

/// Counts describing how the inputs were consumed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportDiagnostics {
    pub snapshots_received: usize,
    pub snapshots_out_of_scope: usize,
    pub snapshots_kept: usize,
    pub transactions_matched: usize,
    pub transactions_skipped: usize,
    /// Days where a cumulative counter went backwards
    pub clamped_days: usize,
    /// The series was synthesized from current content totals
    pub used_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub timeframe: Timeframe,
    pub generated_at: DateTime<Utc>,
    pub range: Option<DateRange>,
    pub stats: DashboardStats,
    /// Daily series clipped to the timeframe
    pub series: Vec<DailyAggregate>,
    pub payouts: PayoutSummary,
    pub creators: Vec<CreatorRoi>,
    pub activity: Vec<ActivityPoint>,
    pub diagnostics: ReportDiagnostics,
}

/// Builds the full dashboard for `timeframe` as seen at `now`.
#[instrument(skip(input), fields(timeframe = timeframe.as_str(), programs = input.programs.len()))]
pub fn build_dashboard(
    input: &DashboardInput<'_>,
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> Result<DashboardReport> {
    if !input.rpm_rate.is_finite() || input.rpm_rate < 0.0 {
        return Err(Error::validation(format!(
            "rpm_rate must be a non-negative number, got {}",
            input.rpm_rate
        )));
    }

    let range = timeframe.range(now)?;
    let previous = timeframe.previous_range(now)?;
    let programs = input.programs;

    // Program scoping
    let snapshots: Vec<MetricSnapshot> = input
        .snapshots
        .iter()
        .filter(|s| programs.covers_snapshot(s))
        .cloned()
        .collect();
    let content: Vec<&ContentItem> = input
        .content
        .iter()
        .filter(|item| programs.covers_content(item))
        .collect();

    // Daily series over the full history
    let deduped = dedupe(&snapshots);
    let history = aggregate(&deduped);
    let used_fallback = history.is_empty();
    let series = series_or_fallback(history, current_totals(&content), now.date_naive());
    let used_fallback = used_fallback && !series.is_empty();

    // Submissions in the timeframe
    let in_range: Vec<ContentItem> = content
        .iter()
        .copied()
        .filter(|item| submitted_within(item, range.as_ref()))
        .cloned()
        .collect();
    let approved: Vec<&ContentItem> = in_range.iter().filter(|item| item.is_approved()).collect();
    let total_views = approved
        .iter()
        .fold(0u64, |sum, item| sum.saturating_add(item.views));
    let engagements = approved.iter().fold(0u64, |sum, item| {
        sum.saturating_add(item.likes)
            .saturating_add(item.shares)
            .saturating_add(item.bookmarks)
    });
    let rejected = in_range
        .iter()
        .filter(|item| item.status == SubmissionStatus::Rejected)
        .count() as u64;
    let pending = in_range
        .iter()
        .filter(|item| item.status == SubmissionStatus::Pending)
        .count() as u64;
    let split = split_paid_views(&in_range);

    let payouts = reconcile(input.transactions, programs, range.as_ref());
    let earnings: Vec<Transaction> = matching_earnings(input.transactions, programs, range.as_ref())
        .cloned()
        .collect();

    // Week over week, independent of the timeframe
    let view_events: Vec<WindowEvent> = content
        .iter()
        .copied()
        .filter_map(WindowEvent::views_of)
        .collect();
    let payout_events: Vec<WindowEvent> = matching_earnings(input.transactions, programs, None)
        .filter_map(WindowEvent::payout_of)
        .collect();

    let mut all_time_views = series.last().map_or(0, |day| day.cumulative.views);
    let (mut current_period, previous_period) = match &range {
        Some(range) => (
            period_views(&series, range),
            previous.as_ref().map_or(0, |prev| period_views(&series, prev)),
        ),
        None => (all_time_views, 0),
    };
    if current_period == 0 && total_views > 0 {
        current_period = total_views;
    }
    if all_time_views == 0 && total_views > 0 {
        all_time_views = total_views;
    }

    let creators: BTreeSet<&str> = approved
        .iter()
        .filter_map(|item| item.creator_id.as_deref())
        .collect();
    let active_creators = creators.len() as u64;

    let stats = DashboardStats {
        total_views,
        total_payouts: payouts.total_payout,
        effective_cpm: cpm(payouts.total_payout, total_views),
        views_week: compare_windows(&view_events, now),
        payouts_week: compare_windows(&payout_events, now),
        total_submissions: in_range.len() as u64,
        approved_submissions: approved.len() as u64,
        rejected_submissions: rejected,
        pending_submissions: pending,
        approval_rate: percent_of(approved.len() as u64, in_range.len() as u64),
        engagement_rate: percent_of(engagements, total_views),
        paid_views: split.paid_views,
        unpaid_views: split.unpaid_views,
        rpm_rate: input.rpm_rate,
        expected_payout: expected_payout(split.unpaid_views, input.rpm_rate),
        period_views: current_period,
        previous_period_views: previous_period,
        views_difference: signed_difference(current_period, previous_period),
        all_time_views,
        active_creators,
        avg_views_per_creator: if active_creators > 0 {
            total_views as f64 / active_creators as f64
        } else {
            0.0
        },
    };

    let approved_owned: Vec<ContentItem> = approved.into_iter().cloned().collect();
    let diagnostics = ReportDiagnostics {
        snapshots_received: input.snapshots.len(),
        snapshots_out_of_scope: input.snapshots.len() - snapshots.len(),
        snapshots_kept: deduped.len(),
        transactions_matched: payouts.matched,
        transactions_skipped: payouts.skipped,
        clamped_days: count_regressions(&series),
        used_fallback,
    };
    debug!(?diagnostics, "Dashboard assembled");

    Ok(DashboardReport {
        timeframe,
        generated_at: now,
        series: clip_to_range(&series, range.as_ref()),
        activity: activity_series(&in_range, None),
        creators: build_roi(&approved_owned, &earnings),
        range,
        stats,
        payouts,
        diagnostics,
    })
}

/// Totals of approved content, used when no snapshot history exists.
fn current_totals(content: &[&ContentItem]) -> Option<MetricTotals> {
    let approved = content.iter().filter(|item| item.is_approved());
    let mut totals = MetricTotals::default();
    let mut any = false;
    for item in approved {
        any = true;
        totals += MetricTotals::new(item.views, item.likes, item.shares, item.bookmarks, 1);
    }
    any.then_some(totals)
}

fn submitted_within(item: &ContentItem, range: Option<&DateRange>) -> bool {
    match range {
        Some(range) => item.submitted_at.is_some_and(|at| range.contains(at)),
        None => true,
    }
}

fn percent_of(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

fn signed_difference(current: u64, previous: u64) -> i64 {
    let current = i64::try_from(current).unwrap_or(i64::MAX);
    let previous = i64::try_from(previous).unwrap_or(i64::MAX);
    current.saturating_sub(previous)
}
