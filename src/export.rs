//! CSV export of the creator ROI table.

use aggregation::CreatorRoi;
use anyhow::{anyhow, Result};
use csv::Writer;

const HEADERS: [&str; 6] = [
    "Creator",
    "Videos",
    "Total Views",
    "Avg Views/Video",
    "Total Paid",
    "CPM",
];

/// Renders ROI rows in table order. Creators without a username are listed
/// by user id.
pub fn roi_csv(rows: &[CreatorRoi]) -> Result<Vec<u8>> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(HEADERS)?;

    for row in rows {
        wtr.write_record([
            row.username.as_deref().unwrap_or(&row.user_id),
            &row.video_count.to_string(),
            &row.total_views.to_string(),
            &format!("{:.0}", row.avg_views_per_video),
            &format!("{:.2}", row.total_paid),
            &format!("{:.2}", row.cost_per_view),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow!("Failed to flush ROI CSV: {}", e.error()))
}
