//! Per-creator ROI table.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use analytics_core::{ContentItem, Transaction};
use serde::{Deserialize, Serialize};

use crate::payout::cpm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorRoi {
    pub user_id: String,
    /// First username found on the creator's items. `None` when no item
    /// carries one; display code should fall back to `user_id`.
    pub username: Option<String>,
    pub total_views: u64,
    pub total_paid: f64,
    pub video_count: u64,
    pub avg_views_per_video: f64,
    /// Paid per thousand views
    pub cost_per_view: f64,
}

#[derive(Default)]
struct CreatorTally<'a> {
    username: Option<&'a str>,
    views: u64,
    videos: u64,
    paid: f64,
}

/// Builds one row per creator from their content, overlaying earnings by
/// user id.
///
/// Items without a creator are skipped, as are earnings for users with no
/// content. Rows are ordered by views, highest first; equal views fall back
/// to user id so the order is stable.
pub fn build_roi(items: &[ContentItem], transactions: &[Transaction]) -> Vec<CreatorRoi> {
    let mut creators: BTreeMap<&str, CreatorTally> = BTreeMap::new();

    for item in items {
        let Some(creator) = item.creator_id.as_deref() else {
            continue;
        };
        let tally = creators.entry(creator).or_default();
        tally.views = tally.views.saturating_add(item.views);
        tally.videos += 1;
        if tally.username.is_none() {
            tally.username = item.username.as_deref();
        }
    }

    for tx in transactions.iter().filter(|tx| tx.is_earning()) {
        if let Some(tally) = creators.get_mut(tx.user_id.as_str()) {
            tally.paid += tx.amount;
        }
    }

    let mut rows: Vec<CreatorRoi> = creators
        .into_iter()
        .map(|(user_id, tally)| CreatorRoi {
            user_id: user_id.to_string(),
            username: tally.username.map(str::to_string),
            total_views: tally.views,
            total_paid: tally.paid,
            video_count: tally.videos,
            avg_views_per_video: avg_views_per_video(tally.views, tally.videos),
            cost_per_view: cpm(tally.paid, tally.views),
        })
        .collect();

    rows.sort_by(rank);
    rows
}

/// Mean views per video. Zero when there are no videos.
pub fn avg_views_per_video(views: u64, videos: u64) -> f64 {
    if videos > 0 {
        views as f64 / videos as f64
    } else {
        0.0
    }
}

fn rank(a: &CreatorRoi, b: &CreatorRoi) -> Ordering {
    b.total_views
        .cmp(&a.total_views)
        .then_with(|| a.user_id.cmp(&b.user_id))
}
