//! Wallet ledger records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::snapshot::{null_as_default, SourceType};

/// Ledger entry type. Only earnings count toward program payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Earning,
    BalanceCorrection,
    Withdrawal,
    Deposit,
    Refund,
    #[serde(other)]
    Other,
}

/// Program linkage stored in the transaction metadata blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost_id: Option<String>,
}

impl TransactionMetadata {
    pub fn campaign(id: impl Into<String>) -> Self {
        Self {
            campaign_id: Some(id.into()),
            boost_id: None,
        }
    }

    pub fn boost(id: impl Into<String>) -> Self {
        Self {
            campaign_id: None,
            boost_id: Some(id.into()),
        }
    }

    /// The owning program. A campaign link takes precedence over a boost link.
    pub fn program(&self) -> Option<(SourceType, &str)> {
        match (&self.campaign_id, &self.boost_id) {
            (Some(id), _) if !id.is_empty() => Some((SourceType::Campaign, id.as_str())),
            (_, Some(id)) if !id.is_empty() => Some((SourceType::Boost, id.as_str())),
            _ => None,
        }
    }
}

fn validate_finite(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() {
        return Ok(());
    }
    let mut err = ValidationError::new("non_finite_amount");
    err.message = Some("amount must be a finite number".into());
    Err(err)
}

/// A financial ledger entry crediting a creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Transaction {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    #[validate(custom(function = "validate_finite"))]
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: TransactionMetadata,
}

impl Transaction {
    /// Creates an earning credited to `user_id`.
    pub fn earning(
        user_id: impl Into<String>,
        amount: f64,
        created_at: DateTime<Utc>,
        metadata: TransactionMetadata,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            created_at,
            kind: TransactionType::Earning,
            metadata,
        }
    }

    pub fn is_earning(&self) -> bool {
        self.kind == TransactionType::Earning
    }
}
