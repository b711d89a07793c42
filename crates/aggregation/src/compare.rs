//! Week-over-week comparison.

use analytics_core::limits::COMPARISON_WINDOW_DAYS;
use analytics_core::{ContentItem, Transaction};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped amount: views of a submission, or a payout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowEvent {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl WindowEvent {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Views of an approved submission, placed at its submission time.
    pub fn views_of(item: &ContentItem) -> Option<Self> {
        if !item.is_approved() {
            return None;
        }
        item.submitted_at
            .map(|at| Self::new(at, item.views as f64))
    }

    /// Amount of an earning, placed at its creation time.
    pub fn payout_of(tx: &Transaction) -> Option<Self> {
        tx.is_earning().then(|| Self::new(tx.created_at, tx.amount))
    }
}

/// Boundaries of the two trailing windows ending at `end`.
///
/// Current covers `[current_start, end)`, prior covers
/// `[prior_start, current_start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingWindows {
    pub prior_start: DateTime<Utc>,
    pub current_start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TrailingWindows {
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        let width = Duration::days(COMPARISON_WINDOW_DAYS);
        let current_start = now
            .checked_sub_signed(width)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let prior_start = current_start
            .checked_sub_signed(width)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            prior_start,
            current_start,
            end: now,
        }
    }

    pub fn in_current(&self, at: DateTime<Utc>) -> bool {
        self.current_start <= at && at < self.end
    }

    pub fn in_prior(&self, at: DateTime<Utc>) -> bool {
        self.prior_start <= at && at < self.current_start
    }

    /// Total time covered by both windows.
    pub fn span(&self) -> Duration {
        self.end - self.prior_start
    }
}

/// Current vs. prior window totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowComparison {
    pub current_window_sum: f64,
    pub prior_window_sum: f64,
    pub percent_change: f64,
}

/// Relative change in percent. Zero when there is no prior activity.
pub fn percent_change(current: f64, prior: f64) -> f64 {
    if prior > 0.0 {
        (current - prior) / prior * 100.0
    } else {
        0.0
    }
}

/// Sums events into the trailing windows ending at `now`.
///
/// Events at or after `now` and before the prior window are ignored.
pub fn compare_windows(events: &[WindowEvent], now: DateTime<Utc>) -> WindowComparison {
    let windows = TrailingWindows::ending_at(now);

    let mut current_window_sum = 0.0;
    let mut prior_window_sum = 0.0;
    for event in events {
        if windows.in_current(event.timestamp) {
            current_window_sum += event.value;
        } else if windows.in_prior(event.timestamp) {
            prior_window_sum += event.value;
        }
    }

    WindowComparison {
        current_window_sum,
        prior_window_sum,
        percent_change: percent_change(current_window_sum, prior_window_sum),
    }
}
