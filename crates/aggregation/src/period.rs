//! Views gained within a reporting period.

use analytics_core::DateRange;

use crate::series::DailyAggregate;

/// Views gained inside `range`, measured against cumulative totals.
///
/// The baseline is the last cumulative value strictly before the range
/// (zero with no earlier history). The end value is the last cumulative value
/// inside the range, or the baseline when the range has no buckets. A drop
/// below the baseline yields zero.
pub fn period_views(series: &[DailyAggregate], range: &DateRange) -> u64 {
    let start = range.start.date_naive();
    let end = range.end.date_naive();

    let baseline = series
        .iter()
        .take_while(|day| day.date < start)
        .last()
        .map_or(0, |day| day.cumulative.views);

    let closing = series
        .iter()
        .filter(|day| start <= day.date && day.date <= end)
        .last()
        .map_or(baseline, |day| day.cumulative.views);

    closing.saturating_sub(baseline)
}
