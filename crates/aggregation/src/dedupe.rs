//! Snapshot deduplication.
//!
//! The sync process may record a source several times per day. Each snapshot
//! carries cumulative counters, so same-day snapshots supersede each other
//! and must never be summed.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use analytics_core::{MetricSnapshot, SourceType};
use chrono::NaiveDate;
use tracing::debug;

/// Keeps the latest snapshot per `(source_type, source_id, UTC day)`.
///
/// When two snapshots of a group share the same `recorded_at`, the one seen
/// first in the input wins. Output is ordered by day, then source type, then
/// source id, which makes the function idempotent.
pub fn dedupe(snapshots: &[MetricSnapshot]) -> Vec<MetricSnapshot> {
    let mut latest: BTreeMap<(NaiveDate, SourceType, &str), &MetricSnapshot> = BTreeMap::new();

    for snapshot in snapshots {
        let key = (
            snapshot.day(),
            snapshot.source_type,
            snapshot.source_id.as_str(),
        );
        match latest.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(snapshot);
            }
            Entry::Occupied(mut slot) => {
                if snapshot.recorded_at > slot.get().recorded_at {
                    slot.insert(snapshot);
                }
            }
        }
    }

    let superseded = snapshots.len() - latest.len();
    if superseded > 0 {
        debug!(
            received = snapshots.len(),
            kept = latest.len(),
            superseded,
            "Dropped superseded same-day snapshots"
        );
    }

    latest.into_values().cloned().collect()
}
