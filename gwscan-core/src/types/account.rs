use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use crate::Udt;

/// Discriminant of a godwoken account. An account whose type the backend did
/// not report (or reported as something unrecognised) carries `None` and
/// renders through the unknown branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, EnumIter, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum AccountType {
    MetaContract,
    Udt,
    EthUser,
    PolyjuiceCreator,
    PolyjuiceContract,
    EthAddrReg,
}

impl AccountType {
    /// Parse a backend discriminant. REST sends `eth_user`, GraphQL sends
    /// `ETH_USER`; both are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMerkleState {
    pub account_count: u64,
    pub account_merkle_root: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMerkleState {
    pub block_count: u64,
    pub block_merkle_root: Option<String>,
}

/// The lock script of an account plus, for the meta contract, the global
/// rollup state stored alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountScript {
    pub code_hash: Option<String>,
    pub hash_type: Option<String>,
    pub args: Option<String>,
    pub account_merkle_state: Option<AccountMerkleState>,
    pub block_merkle_state: Option<BlockMerkleState>,
    pub reverted_block_root: Option<String>,
    pub last_finalized_block_number: Option<u64>,
    pub status: Option<String>,
}

/// Verified source information of a polyjuice contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartContract {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub compiler_version: Option<String>,
    pub compiler_file_format: Option<String>,
    pub deployment_tx_hash: Option<String>,
    pub contract_source_code: Option<String>,
    pub constructor_arguments: Option<String>,
    pub abi: Option<serde_json::Value>,
    pub sourcify_metadata: Option<serde_json::Value>,
}

impl SmartContract {
    /// Source is published either directly or through sourcify.
    pub fn is_verified(&self) -> bool {
        self.contract_source_code.is_some() || self.sourcify_metadata.is_some()
    }
}

/// A godwoken account. `kind` decides which of the optional parts are
/// meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: Option<AccountType>,
    pub eth_address: Option<String>,
    pub script_hash: Option<String>,
    pub transaction_count: u64,
    pub token_transfer_count: u64,
    pub nonce: u64,
    pub bit_alias: Option<String>,
    pub script: Option<AccountScript>,
    pub udt: Option<Udt>,
    pub smart_contract: Option<SmartContract>,
}

impl Account {
    /// The identifier shown for the account: eth address when it has one,
    /// otherwise its script hash.
    pub fn display_address(&self) -> Option<&str> {
        self.eth_address.as_deref().or(self.script_hash.as_deref())
    }
}

/// Minimal account reference embedded in transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    #[serde(rename = "type")]
    pub kind: Option<AccountType>,
    pub eth_address: Option<String>,
    pub script_hash: Option<String>,
    /// token symbol or contract name when the account has one
    pub alias: Option<String>,
}

impl AccountRef {
    /// Same preference as [`Account::display_address`].
    pub fn display_address(&self) -> Option<&str> {
        self.eth_address.as_deref().or(self.script_hash.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_both_casings() {
        for kind in AccountType::iter() {
            let snake = kind.to_string();
            assert_eq!(AccountType::parse(&snake), Some(kind));
            assert_eq!(AccountType::parse(&snake.to_uppercase()), Some(kind));
        }
        assert_eq!(
            AccountType::parse("ETH_ADDR_REG"),
            Some(AccountType::EthAddrReg)
        );
        assert_eq!(AccountType::parse("something_else"), None);
    }

    #[test]
    fn display_address_prefers_eth() {
        let mut account = Account {
            script_hash: Some("0xscript".into()),
            ..Default::default()
        };
        assert_eq!(account.display_address(), Some("0xscript"));
        account.eth_address = Some("0xeth".into());
        assert_eq!(account.display_address(), Some("0xeth"));
    }
}
