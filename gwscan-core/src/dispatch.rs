//! The account page renders one of seven views depending on the account's
//! discriminant. [`dispatch`] picks the branch and hands it only the fields
//! that branch uses. The choice depends on `kind` alone, so an account whose
//! optional parts are missing still lands in its own branch with `None`s.

use serde::Serialize;

use crate::{Account, AccountScript, AccountType, SmartContract, Udt};

/// Work a branch asks the caller to schedule after rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FollowUp {
    /// Check sourcify for a verified source of this contract
    CheckSourcify {
        /// contract address
        address: String,
    },
}

/// Externally owned account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EthUserView<'a> {
    /// 20 byte address
    pub eth_address: Option<&'a str>,
    /// next nonce
    pub nonce: u64,
    /// transactions sent or received
    pub transaction_count: u64,
    /// token transfers involving the account
    pub token_transfer_count: u64,
    /// registered .bit name
    pub bit_alias: Option<&'a str>,
}

/// The eth address registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EthAddrRegView<'a> {
    /// layer 2 account id
    pub id: Option<u64>,
    /// hash of the account's script
    pub script_hash: Option<&'a str>,
    /// registrations handled
    pub transaction_count: u64,
}

/// The rollup meta contract, holder of global state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaContractView<'a> {
    /// hash of the account's script
    pub script_hash: Option<&'a str>,
    /// accounts in the account merkle tree
    pub account_count: Option<u64>,
    /// blocks in the block merkle tree
    pub block_count: Option<u64>,
    /// highest finalized block
    pub last_finalized_block_number: Option<u64>,
    /// rollup status, `running` or `halting`
    pub status: Option<&'a str>,
    /// the full global state script
    pub script: Option<&'a AccountScript>,
}

/// An EVM contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyjuiceContractView<'a> {
    /// contract address
    pub eth_address: Option<&'a str>,
    /// calls to the contract
    pub transaction_count: u64,
    /// token transfers involving the contract
    pub token_transfer_count: u64,
    /// verification and compiler details
    pub smart_contract: Option<&'a SmartContract>,
    /// set when the contract is itself a token
    pub udt: Option<&'a Udt>,
    /// source code is known
    pub is_verified: bool,
}

/// The polyjuice creator account that deploys EVM contracts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyjuiceCreatorView<'a> {
    /// hash of the account's script
    pub script_hash: Option<&'a str>,
    /// script code hash
    pub code_hash: Option<&'a str>,
    /// script hash type
    pub hash_type: Option<&'a str>,
    /// script args
    pub args: Option<&'a str>,
    /// deployments handled
    pub transaction_count: u64,
}

/// A layer 2 sUDT account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UdtView<'a> {
    /// hash of the account's script
    pub script_hash: Option<&'a str>,
    /// the token the account holds the state of
    pub udt: Option<&'a Udt>,
}

/// Reduced view for address-shaped partial results and unrecognised types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownView<'a> {
    /// 20 byte address, when known
    pub eth_address: Option<&'a str>,
    /// script hash, when known
    pub script_hash: Option<&'a str>,
    /// transactions involving the address
    pub transaction_count: u64,
    /// token transfers involving the address
    pub token_transfer_count: u64,
}

/// Exactly one rendering branch per account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "branch", rename_all = "camelCase")]
pub enum AccountView<'a> {
    /// [`AccountType::EthUser`]
    EthUser(EthUserView<'a>),
    /// [`AccountType::EthAddrReg`]
    EthAddrReg(EthAddrRegView<'a>),
    /// [`AccountType::MetaContract`]
    MetaContract(MetaContractView<'a>),
    /// [`AccountType::PolyjuiceContract`]
    PolyjuiceContract(PolyjuiceContractView<'a>),
    /// [`AccountType::PolyjuiceCreator`]
    PolyjuiceCreator(PolyjuiceCreatorView<'a>),
    /// [`AccountType::Udt`]
    Udt(UdtView<'a>),
    /// no type, or a bare address
    Unknown(UnknownView<'a>),
}

impl<'a> AccountView<'a> {
    /// The discriminant that selected this branch; `None` for unknown.
    pub fn kind(&self) -> Option<AccountType> {
        match self {
            AccountView::EthUser(_) => Some(AccountType::EthUser),
            AccountView::EthAddrReg(_) => Some(AccountType::EthAddrReg),
            AccountView::MetaContract(_) => Some(AccountType::MetaContract),
            AccountView::PolyjuiceContract(_) => Some(AccountType::PolyjuiceContract),
            AccountView::PolyjuiceCreator(_) => Some(AccountType::PolyjuiceCreator),
            AccountView::Udt(_) => Some(AccountType::Udt),
            AccountView::Unknown(_) => None,
        }
    }

    /// Secondary work the branch needs. Only unverified contracts ask for
    /// anything.
    pub fn follow_ups(&self) -> Vec<FollowUp> {
        match self {
            AccountView::PolyjuiceContract(PolyjuiceContractView {
                eth_address: Some(address),
                is_verified: false,
                ..
            }) => vec![FollowUp::CheckSourcify {
                address: (*address).to_owned(),
            }],
            _ => vec![],
        }
    }
}

/// Select the branch for `account`.
pub fn dispatch(account: &Account) -> AccountView<'_> {
    let eth_address = account.eth_address.as_deref();
    let script_hash = account.script_hash.as_deref();
    let script = account.script.as_ref();

    match account.kind {
        Some(AccountType::EthUser) => AccountView::EthUser(EthUserView {
            eth_address,
            nonce: account.nonce,
            transaction_count: account.transaction_count,
            token_transfer_count: account.token_transfer_count,
            bit_alias: account.bit_alias.as_deref(),
        }),
        Some(AccountType::EthAddrReg) => AccountView::EthAddrReg(EthAddrRegView {
            id: account.id,
            script_hash,
            transaction_count: account.transaction_count,
        }),
        Some(AccountType::MetaContract) => AccountView::MetaContract(MetaContractView {
            script_hash,
            account_count: script
                .and_then(|s| s.account_merkle_state.as_ref())
                .map(|s| s.account_count),
            block_count: script
                .and_then(|s| s.block_merkle_state.as_ref())
                .map(|s| s.block_count),
            last_finalized_block_number: script.and_then(|s| s.last_finalized_block_number),
            status: script.and_then(|s| s.status.as_deref()),
            script,
        }),
        Some(AccountType::PolyjuiceContract) => {
            let smart_contract = account.smart_contract.as_ref();
            AccountView::PolyjuiceContract(PolyjuiceContractView {
                eth_address,
                transaction_count: account.transaction_count,
                token_transfer_count: account.token_transfer_count,
                smart_contract,
                udt: account.udt.as_ref(),
                is_verified: smart_contract.map_or(false, SmartContract::is_verified),
            })
        }
        Some(AccountType::PolyjuiceCreator) => {
            AccountView::PolyjuiceCreator(PolyjuiceCreatorView {
                script_hash,
                code_hash: script.and_then(|s| s.code_hash.as_deref()),
                hash_type: script.and_then(|s| s.hash_type.as_deref()),
                args: script.and_then(|s| s.args.as_deref()),
                transaction_count: account.transaction_count,
            })
        }
        Some(AccountType::Udt) => AccountView::Udt(UdtView {
            script_hash,
            udt: account.udt.as_ref(),
        }),
        None => AccountView::Unknown(UnknownView {
            eth_address,
            script_hash,
            transaction_count: account.transaction_count,
            token_transfer_count: account.token_transfer_count,
        }),
    }
}
