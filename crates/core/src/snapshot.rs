//! Metric snapshot records.

use std::fmt;
use std::ops::{Add, AddAssign};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Kind of program that owns a tracked content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Campaign,
    Boost,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Campaign => "campaign",
            Self::Boost => "boost",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored rows use `null` for columns the sync never populated.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Engagement counters for one source, a day, or a whole program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTotals {
    #[serde(default, alias = "total_views", deserialize_with = "null_as_default")]
    pub views: u64,
    #[serde(default, alias = "total_likes", deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, alias = "total_shares", deserialize_with = "null_as_default")]
    pub shares: u64,
    #[serde(default, alias = "total_bookmarks", deserialize_with = "null_as_default")]
    pub bookmarks: u64,
    #[serde(default, alias = "total_videos", deserialize_with = "null_as_default")]
    pub videos: u64,
}

impl MetricTotals {
    pub fn new(views: u64, likes: u64, shares: u64, bookmarks: u64, videos: u64) -> Self {
        Self {
            views,
            likes,
            shares,
            bookmarks,
            videos,
        }
    }

    /// Totals with only the view counter set.
    pub fn views(views: u64) -> Self {
        Self {
            views,
            ..Self::default()
        }
    }

    /// Per-field `self - earlier`, floored at zero.
    pub fn saturating_sub(&self, earlier: &Self) -> Self {
        Self {
            views: self.views.saturating_sub(earlier.views),
            likes: self.likes.saturating_sub(earlier.likes),
            shares: self.shares.saturating_sub(earlier.shares),
            bookmarks: self.bookmarks.saturating_sub(earlier.bookmarks),
            videos: self.videos.saturating_sub(earlier.videos),
        }
    }

    /// Whether any counter is lower than in `earlier`.
    pub fn regressed_from(&self, earlier: &Self) -> bool {
        self.views < earlier.views
            || self.likes < earlier.likes
            || self.shares < earlier.shares
            || self.bookmarks < earlier.bookmarks
            || self.videos < earlier.videos
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for MetricTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            views: self.views.saturating_add(rhs.views),
            likes: self.likes.saturating_add(rhs.likes),
            shares: self.shares.saturating_add(rhs.shares),
            bookmarks: self.bookmarks.saturating_add(rhs.bookmarks),
            videos: self.videos.saturating_add(rhs.videos),
        }
    }
}

impl AddAssign for MetricTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// One measurement of a tracked source's cumulative counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MetricSnapshot {
    pub source_type: SourceType,
    #[validate(length(min = 1, max = 128))]
    pub source_id: String,
    pub recorded_at: DateTime<Utc>,
    /// Cumulative counts as of `recorded_at`
    #[serde(flatten)]
    pub totals: MetricTotals,
}

impl MetricSnapshot {
    pub fn new(
        source_type: SourceType,
        source_id: impl Into<String>,
        recorded_at: DateTime<Utc>,
        totals: MetricTotals,
    ) -> Self {
        Self {
            source_type,
            source_id: source_id.into(),
            recorded_at,
            totals,
        }
    }

    /// UTC calendar day this snapshot belongs to.
    pub fn day(&self) -> NaiveDate {
        self.recorded_at.date_naive()
    }
}
