//! Video submission records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::snapshot::{null_as_default, SourceType};

/// Review state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Other,
}

/// Payout state of an approved submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    #[default]
    Available,
    Locked,
    Paid,
    #[serde(other)]
    Other,
}

/// A creator's video submitted to a campaign or boost, with its latest metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContentItem {
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    /// Creator who submitted the video
    #[serde(default, alias = "user_id")]
    #[validate(length(min = 1, max = 128))]
    pub creator_id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub username: Option<String>,
    pub source_type: SourceType,
    #[validate(length(min = 1, max = 128))]
    pub source_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: SubmissionStatus,
    #[serde(default)]
    pub payout_status: Option<PayoutStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shares: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bookmarks: u64,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Creates an approved, unpaid item with the given view count.
    pub fn approved(
        id: impl Into<String>,
        creator_id: impl Into<String>,
        source_type: SourceType,
        source_id: impl Into<String>,
        views: u64,
    ) -> Self {
        Self {
            id: id.into(),
            creator_id: Some(creator_id.into()),
            username: None,
            source_type,
            source_id: source_id.into(),
            status: SubmissionStatus::Approved,
            payout_status: None,
            views,
            likes: 0,
            shares: 0,
            bookmarks: 0,
            submitted_at: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == SubmissionStatus::Approved
    }

    /// Missing payout status counts as not paid.
    pub fn is_paid(&self) -> bool {
        self.payout_status == Some(PayoutStatus::Paid)
    }
}
