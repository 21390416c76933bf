use serde::Serialize;
use strum::{Display, EnumString};

/// Direction of a bridged record relative to layer 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum BridgeDirection {
    Deposit,
    Withdrawal,
}

/// Token fields embedded in a bridged record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgedToken {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimal: u32,
    pub icon: Option<String>,
}

/// A deposit into or a withdrawal out of the rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgedRecord {
    /// `None` when the backend sent no recognised direction
    #[serde(rename = "type")]
    pub direction: Option<BridgeDirection>,
    pub eth_address: Option<String>,
    pub ckb_address: Option<String>,
    pub amount: String,
    pub capacity: String,
    pub layer1_tx_hash: Option<String>,
    pub layer1_output_index: Option<u32>,
    pub layer1_block_number: Option<u64>,
    pub block_number: Option<u64>,
    pub block_hash: Option<String>,
    /// unix seconds, [`crate::PENDING_TIMESTAMP`] when unknown
    pub timestamp: i64,
    pub state: Option<String>,
    pub udt: Option<BridgedToken>,
}
