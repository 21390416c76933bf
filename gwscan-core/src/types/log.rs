use serde::Serialize;

use crate::utils::truncate_middle;

/// An event log as the backend stores it. Topics and data are kept as the
/// original `0x` hex so they can always be shown raw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    /// `<transaction hash>-<log index>`
    pub id: String,
    pub address_hash: Option<String>,
    pub transaction_hash: Option<String>,
    pub block_number: Option<u64>,
    pub log_index: u32,
    pub topics: Vec<String>,
    pub data: String,
}

/// How a positional argument is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "as", content = "value", rename_all = "camelCase")]
pub enum SlotValue {
    /// checksummed address, rendered as a link
    Address(String),
    /// scalar decoded through the ABI
    Decoded(String),
    /// hex exactly as received
    Raw(String),
}

impl SlotValue {
    /// Text for a table cell; addresses are shortened.
    pub fn display(&self) -> String {
        match self {
            SlotValue::Address(address) => truncate_middle(address, 6, 4),
            SlotValue::Decoded(value) | SlotValue::Raw(value) => value.clone(),
        }
    }
}

/// One positional argument of a log: an indexed topic or a data word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSlot {
    pub position: usize,
    pub name: Option<String>,
    /// solidity type, when an ABI input lines up with the slot
    pub kind: Option<String>,
    pub indexed: bool,
    pub value: SlotValue,
}

/// Result of a successful ABI decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLog {
    pub name: String,
    /// e.g. `Transfer(address,address,uint256)`
    pub signature: String,
    pub topic: String,
    pub arguments: Vec<LogSlot>,
}

/// An event log with whatever could be decoded about it. `parsed_log` is
/// present only when ABI decoding succeeded; `slots` is always filled, from
/// the decode when there is one and from the raw hex otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEventLog {
    #[serde(flatten)]
    pub log: EventLog,
    pub parsed_log: Option<ParsedLog>,
    pub slots: Vec<LogSlot>,
}
