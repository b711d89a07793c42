//! Program (campaign/boost) scoping.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::content::ContentItem;
use crate::ledger::Transaction;
use crate::snapshot::{MetricSnapshot, SourceType};

/// The campaigns and boosts a report covers, typically all programs of one brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSet {
    #[serde(default)]
    pub campaign_ids: BTreeSet<String>,
    #[serde(default)]
    pub boost_ids: BTreeSet<String>,
}

impl ProgramSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_campaign(mut self, id: impl Into<String>) -> Self {
        self.campaign_ids.insert(id.into());
        self
    }

    pub fn with_boost(mut self, id: impl Into<String>) -> Self {
        self.boost_ids.insert(id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.campaign_ids.is_empty() && self.boost_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.campaign_ids.len() + self.boost_ids.len()
    }

    pub fn contains(&self, source_type: SourceType, id: &str) -> bool {
        match source_type {
            SourceType::Campaign => self.campaign_ids.contains(id),
            SourceType::Boost => self.boost_ids.contains(id),
        }
    }

    pub fn covers_snapshot(&self, snapshot: &MetricSnapshot) -> bool {
        self.contains(snapshot.source_type, &snapshot.source_id)
    }

    pub fn covers_content(&self, item: &ContentItem) -> bool {
        self.contains(item.source_type, &item.source_id)
    }

    /// Whether the transaction's metadata links it to one of these programs.
    pub fn covers_transaction(&self, tx: &Transaction) -> bool {
        tx.metadata
            .program()
            .is_some_and(|(source_type, id)| self.contains(source_type, id))
    }
}
