use serde::Serialize;
use strum::{Display, EnumString};

use crate::{AccountRef, BlockSummary, FinalizeState, PENDING_TIMESTAMP};

/// Kind of layer 2 transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    Polyjuice,
    PolyjuiceCreator,
    EthAddressRegistry,
}

/// Execution outcome of a polyjuice transaction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum PolyjuiceStatus {
    Succeed,
    Failed,
    #[default]
    Pending,
}

/// Where a transaction is in its lifecycle, derived from its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionStatus {
    /// not yet included in a block
    Pending,
    Committed,
    Finalized,
}

impl TransactionStatus {
    /// A transaction inherits its block's finalize state. A pending block and
    /// a missing block both mean pending.
    pub fn from_block(block: Option<&BlockSummary>) -> Self {
        match block.map(|b| b.status) {
            Some(FinalizeState::Finalized) => TransactionStatus::Finalized,
            Some(FinalizeState::Committed) => TransactionStatus::Committed,
            Some(FinalizeState::Pending) | None => TransactionStatus::Pending,
        }
    }
}

/// EVM execution details of a polyjuice transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyjuiceInfo {
    pub gas_limit: String,
    pub gas_price: String,
    pub gas_used: Option<String>,
    pub value: String,
    pub status: PolyjuiceStatus,
    pub input: Option<String>,
    pub native_transfer_address_hash: Option<String>,
    pub created_contract_address_hash: Option<String>,
}

/// A layer 2 transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub eth_hash: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    /// absent while pending
    pub block: Option<BlockSummary>,
    pub index: Option<u32>,
    pub nonce: u64,
    pub from_account: AccountRef,
    pub to_account: AccountRef,
    pub method_id: Option<String>,
    pub method_name: Option<String>,
    pub polyjuice: Option<PolyjuiceInfo>,
    pub status: TransactionStatus,
}

impl Transaction {
    /// The hash the explorer routes by: eth hash when present.
    pub fn display_hash(&self) -> &str {
        self.eth_hash.as_deref().unwrap_or(&self.hash)
    }

    /// Block time, or [`PENDING_TIMESTAMP`].
    pub fn timestamp(&self) -> i64 {
        self.block
            .as_ref()
            .map_or(PENDING_TIMESTAMP, |block| block.timestamp)
    }
}
