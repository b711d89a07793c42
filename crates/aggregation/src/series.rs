//! Daily time-bucket aggregation.
//!
//! Turns deduplicated snapshots into one cumulative total per calendar day,
//! plus per-day deltas for the "daily" chart mode.

use std::collections::BTreeMap;

use analytics_core::{DateRange, MetricSnapshot, MetricTotals};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dedupe::dedupe;

/// One day of a program's performance series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// Totals as of the end of the day, summed across sources
    pub cumulative: MetricTotals,
    /// Growth since the previous bucket, floored at zero
    pub daily: MetricTotals,
}

impl DailyAggregate {
    /// Synthetic bucket for programs with current totals but no snapshot history.
    pub fn from_current_totals(date: NaiveDate, totals: MetricTotals) -> Self {
        Self {
            date,
            cumulative: totals,
            daily: totals,
        }
    }
}

/// Sums deduplicated snapshots per day and derives clamped daily deltas.
///
/// The first bucket's delta equals its cumulative totals. A bucket whose
/// cumulative counter dropped below the previous bucket's reports zero for
/// that counter.
pub fn aggregate(deduped: &[MetricSnapshot]) -> Vec<DailyAggregate> {
    let mut by_day: BTreeMap<NaiveDate, MetricTotals> = BTreeMap::new();
    for snapshot in deduped {
        *by_day.entry(snapshot.day()).or_default() += snapshot.totals;
    }

    let mut previous: Option<MetricTotals> = None;
    by_day
        .into_iter()
        .map(|(date, cumulative)| {
            let daily = match previous {
                Some(prev) => {
                    if cumulative.regressed_from(&prev) {
                        trace!(%date, "Cumulative counters regressed, clamping delta");
                    }
                    cumulative.saturating_sub(&prev)
                }
                None => cumulative,
            };
            previous = Some(cumulative);
            DailyAggregate {
                date,
                cumulative,
                daily,
            }
        })
        .collect()
}

/// Falls back to a single `today` bucket built from `current` when the
/// snapshot history is empty.
pub fn series_or_fallback(
    series: Vec<DailyAggregate>,
    current: Option<MetricTotals>,
    today: NaiveDate,
) -> Vec<DailyAggregate> {
    if !series.is_empty() {
        return series;
    }
    current
        .map(|totals| vec![DailyAggregate::from_current_totals(today, totals)])
        .unwrap_or_default()
}

/// Deduplicates and aggregates raw snapshots, with the current-totals fallback.
pub fn build_series(
    snapshots: &[MetricSnapshot],
    current: Option<MetricTotals>,
    today: NaiveDate,
) -> Vec<DailyAggregate> {
    series_or_fallback(aggregate(&dedupe(snapshots)), current, today)
}

/// Restricts a full-history series to the days inside `range`.
///
/// Deltas are kept as computed against the full history, so the first day in
/// the window still reports growth over the day before it.
pub fn clip_to_range(series: &[DailyAggregate], range: Option<&DateRange>) -> Vec<DailyAggregate> {
    match range {
        Some(range) => series
            .iter()
            .filter(|day| range.contains_date(day.date))
            .cloned()
            .collect(),
        None => series.to_vec(),
    }
}

/// Number of buckets where at least one counter went backwards.
pub fn count_regressions(series: &[DailyAggregate]) -> usize {
    series
        .windows(2)
        .filter(|pair| pair[1].cumulative.regressed_from(&pair[0].cumulative))
        .count()
}
