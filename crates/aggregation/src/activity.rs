//! Submission activity per day.

use std::collections::{BTreeMap, BTreeSet};

use analytics_core::{ContentItem, DateRange};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub date: NaiveDate,
    pub submissions: u64,
    pub unique_creators: u64,
}

/// Counts submissions and distinct creators per UTC day, ascending.
///
/// Items without a submission time are left out. Items without a creator
/// count as submissions but not as creators.
pub fn activity_series(items: &[ContentItem], range: Option<&DateRange>) -> Vec<ActivityPoint> {
    let mut by_day: BTreeMap<NaiveDate, (u64, BTreeSet<&str>)> = BTreeMap::new();

    for item in items {
        let Some(at) = item.submitted_at else {
            continue;
        };
        if range.is_some_and(|r| !r.contains(at)) {
            continue;
        }
        let (submissions, creators) = by_day.entry(at.date_naive()).or_default();
        *submissions += 1;
        if let Some(creator) = item.creator_id.as_deref() {
            creators.insert(creator);
        }
    }

    by_day
        .into_iter()
        .map(|(date, (submissions, creators))| ActivityPoint {
            date,
            submissions,
            unique_creators: creators.len() as u64,
        })
        .collect()
}
