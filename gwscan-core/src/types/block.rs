use serde::Serialize;
use strum::{Display, EnumString};

use crate::PENDING_TIMESTAMP;

/// Commitment status of a rollup block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum FinalizeState {
    /// not yet submitted to layer 1
    #[default]
    Pending,
    /// submitted to layer 1, still challengeable
    Committed,
    /// past the challenge period
    Finalized,
}

/// Layer 1 commitment of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer1Info {
    /// layer 1 transaction that committed the block
    pub tx_hash: Option<String>,
    /// layer 1 block holding that transaction
    pub block_number: Option<u64>,
}

/// The block fields embedded in transactions, transfers and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub number: u64,
    pub hash: Option<String>,
    /// unix seconds, [`PENDING_TIMESTAMP`] when unknown
    pub timestamp: i64,
    pub status: FinalizeState,
}

/// A rollup block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: u64,
    pub hash: String,
    pub parent_hash: Option<String>,
    /// unix seconds, [`PENDING_TIMESTAMP`] when unknown
    pub timestamp: i64,
    pub status: FinalizeState,
    pub transaction_count: u64,
    pub gas_used: String,
    pub gas_limit: String,
    pub size: u64,
    pub producer_address: Option<String>,
    pub layer1: Layer1Info,
}

impl Block {
    /// Whether the backend reported a time for this block.
    pub fn has_timestamp(&self) -> bool {
        self.timestamp != PENDING_TIMESTAMP
    }

    /// The embedded form of this block.
    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            number: self.number,
            hash: Some(self.hash.clone()),
            timestamp: self.timestamp,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn finalize_state_parses_any_case() {
        assert_eq!(
            FinalizeState::from_str("FINALIZED").unwrap(),
            FinalizeState::Finalized
        );
        assert_eq!(
            FinalizeState::from_str("committed").unwrap(),
            FinalizeState::Committed
        );
        assert!(FinalizeState::from_str("reverted").is_err());
        assert!(FinalizeState::Pending < FinalizeState::Finalized);
    }
}
