use serde::Serialize;

use crate::{BlockSummary, PolyjuiceStatus, Udt, PENDING_TIMESTAMP};

/// What moved in a transfer. The variant follows the token standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "standard", rename_all = "camelCase")]
pub enum TransferKind {
    /// fungible amount in the token's smallest unit
    Erc20 { amount: String },
    /// single collectible
    #[serde(rename_all = "camelCase")]
    Erc721 { token_id: String },
    /// one or more ids with a matching amount each
    #[serde(rename_all = "camelCase")]
    Erc1155 {
        token_ids: Vec<String>,
        amounts: Vec<String>,
    },
}

/// Identity of a transfer. A single transaction can emit many transfers, so
/// the hash alone is not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferKey {
    pub transaction_hash: String,
    pub log_index: u32,
}

/// A token transfer event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub transaction_hash: String,
    pub log_index: u32,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub udt: Option<Udt>,
    pub block: Option<BlockSummary>,
    pub polyjuice_status: Option<PolyjuiceStatus>,
    #[serde(flatten)]
    pub kind: TransferKind,
}

impl TokenTransfer {
    pub fn key(&self) -> TransferKey {
        TransferKey {
            transaction_hash: self.transaction_hash.clone(),
            log_index: self.log_index,
        }
    }

    /// Block time, or [`PENDING_TIMESTAMP`].
    pub fn timestamp(&self) -> i64 {
        self.block
            .as_ref()
            .map_or(PENDING_TIMESTAMP, |block| block.timestamp)
    }
}
