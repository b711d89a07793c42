//! Payout reconciliation and cost metrics.

use std::collections::BTreeMap;

use analytics_core::limits::CPM_VIEWS;
use analytics_core::{ContentItem, DateRange, ProgramSet, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Earnings attributed to a set of programs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayoutSummary {
    pub total_payout: f64,
    /// Amount paid per creator user id
    pub per_creator: BTreeMap<String, f64>,
    /// Earnings counted toward the total
    pub matched: usize,
    /// Earnings with no or unknown program linkage
    pub skipped: usize,
}

/// Earnings linked to `programs`, optionally limited to `range` (inclusive).
pub fn matching_earnings<'a>(
    transactions: &'a [Transaction],
    programs: &'a ProgramSet,
    range: Option<&'a DateRange>,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions.iter().filter(move |tx| {
        tx.is_earning()
            && programs.covers_transaction(tx)
            && range.map_or(true, |r| r.contains(tx.created_at))
    })
}

/// Totals earnings for `programs`. No range means all time.
pub fn reconcile(
    transactions: &[Transaction],
    programs: &ProgramSet,
    range: Option<&DateRange>,
) -> PayoutSummary {
    let mut summary = PayoutSummary::default();

    for tx in matching_earnings(transactions, programs, range) {
        summary.total_payout += tx.amount;
        *summary.per_creator.entry(tx.user_id.clone()).or_insert(0.0) += tx.amount;
        summary.matched += 1;
    }

    summary.skipped = transactions
        .iter()
        .filter(|tx| tx.is_earning() && !programs.covers_transaction(tx))
        .count();
    if summary.skipped > 0 {
        debug!(
            skipped = summary.skipped,
            "Skipped earnings without a known program"
        );
    }

    summary
}

/// Cost per thousand views. Zero when there are no views.
pub fn cpm(total_payout: f64, total_views: u64) -> f64 {
    if total_views > 0 {
        total_payout / total_views as f64 * CPM_VIEWS
    } else {
        0.0
    }
}

/// Approved views split by payout status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewSplit {
    pub paid_views: u64,
    pub unpaid_views: u64,
}

/// Partitions approved submissions into paid and not-yet-paid views.
///
/// This is bookkeeping from submission flags only and is not checked
/// against the ledger.
pub fn split_paid_views(items: &[ContentItem]) -> ViewSplit {
    items
        .iter()
        .filter(|item| item.is_approved())
        .fold(ViewSplit::default(), |mut split, item| {
            if item.is_paid() {
                split.paid_views = split.paid_views.saturating_add(item.views);
            } else {
                split.unpaid_views = split.unpaid_views.saturating_add(item.views);
            }
            split
        })
}

/// Amount still owed for unpaid views at the program's RPM rate.
pub fn expected_payout(unpaid_views: u64, rpm_rate: f64) -> f64 {
    unpaid_views as f64 * rpm_rate / CPM_VIEWS
}
