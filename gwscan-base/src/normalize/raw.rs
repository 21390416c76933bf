//! Wire shapes shared by the REST attributes and the GraphQL objects. Both
//! backends send `snake_case` keys; every field is optional here and gets its
//! default while converting, so nothing past this module deals with missing
//! or differently typed values.

use std::str::FromStr;

use gwscan_core::config::StrOrInt;
use gwscan_core::utils::{is_hex, strip_0x_prefix};
use gwscan_core::*;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::warn;

/// Millisecond timestamps are above this, second ones far below.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Treat an explicit `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn opt_u64(raw: Option<StrOrInt>) -> Option<u64> {
    let raw = raw?;
    match u64::try_from(&raw) {
        Ok(v) => Some(v),
        Err(err) => {
            warn!(value = %raw, %err, "Ignoring non numeric value");
            None
        }
    }
}

fn count(raw: Option<StrOrInt>) -> u64 {
    opt_u64(raw).unwrap_or_default()
}

fn opt_u32(raw: Option<StrOrInt>) -> Option<u32> {
    opt_u64(raw).and_then(|v| u32::try_from(v).ok())
}

/// Decimal text of a number sent as a JSON number or string.
fn opt_decimal(raw: Option<Value>) -> Option<String> {
    match raw? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decimal(raw: Option<Value>) -> String {
    opt_decimal(raw).unwrap_or_else(|| "0".to_owned())
}

fn parse_enum<T: FromStr>(raw: Option<&str>) -> Option<T> {
    let raw = raw?.trim();
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(value = raw, kind = std::any::type_name::<T>(), "Unrecognised value");
            None
        }
    }
}

fn from_number(n: i64) -> i64 {
    match n {
        n if n < 0 => PENDING_TIMESTAMP,
        n if n > MILLIS_THRESHOLD => n / 1000,
        n => n,
    }
}

/// Unix seconds of an RFC 3339 string, a naive ISO 8601 string taken as
/// UTC, or a number of seconds or milliseconds. Anything else is
/// [`PENDING_TIMESTAMP`].
pub(crate) fn timestamp(raw: Option<&Value>) -> i64 {
    match raw {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map_or(PENDING_TIMESTAMP, from_number),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return PENDING_TIMESTAMP;
            }
            if let Ok(n) = s.parse::<i64>() {
                return from_number(n);
            }
            let iso = s.replacen(' ', "T", 1);
            OffsetDateTime::parse(&iso, &Rfc3339)
                .or_else(|_| OffsetDateTime::parse(&format!("{iso}Z"), &Rfc3339))
                .map(OffsetDateTime::unix_timestamp)
                .unwrap_or_else(|err| {
                    warn!(value = s, %err, "Unreadable timestamp");
                    PENDING_TIMESTAMP
                })
        }
        _ => PENDING_TIMESTAMP,
    }
}

fn id_text(raw: Option<Value>) -> Option<String> {
    match raw? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Split a flat `from`/`to` field into address or script hash by length.
fn account_ref(raw: Option<String>, alias: Option<String>) -> AccountRef {
    let Some(raw) = raw.filter(|s| {
        let digits = strip_0x_prefix(s);
        !digits.is_empty() && is_hex(digits)
    }) else {
        return AccountRef {
            alias,
            ..Default::default()
        };
    };
    let is_address = strip_0x_prefix(&raw).len() == 40;
    AccountRef {
        kind: None,
        eth_address: is_address.then(|| raw.clone()),
        script_hash: (!is_address).then_some(raw),
        alias,
    }
}

/// Block fields, whether a full block or one embedded elsewhere.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawBlock {
    number: Option<StrOrInt>,
    hash: Option<String>,
    parent_hash: Option<String>,
    timestamp: Option<Value>,
    #[serde(alias = "finalize_state")]
    status: Option<String>,
    #[serde(alias = "tx_count")]
    transaction_count: Option<StrOrInt>,
    gas_used: Option<Value>,
    gas_limit: Option<Value>,
    size: Option<StrOrInt>,
    #[serde(alias = "miner_hash")]
    producer_address: Option<String>,
    layer1_tx_hash: Option<String>,
    layer1_block_number: Option<StrOrInt>,
}

impl RawBlock {
    pub(crate) fn into_block(self) -> Block {
        Block {
            number: count(self.number),
            hash: self.hash.unwrap_or_default(),
            parent_hash: self.parent_hash,
            timestamp: timestamp(self.timestamp.as_ref()),
            status: parse_enum(self.status.as_deref()).unwrap_or_default(),
            transaction_count: count(self.transaction_count),
            gas_used: decimal(self.gas_used),
            gas_limit: decimal(self.gas_limit),
            size: count(self.size),
            producer_address: self.producer_address,
            layer1: Layer1Info {
                tx_hash: self.layer1_tx_hash,
                block_number: opt_u64(self.layer1_block_number),
            },
        }
    }

    /// `None` when the object identifies no block.
    pub(crate) fn into_summary(self) -> Option<BlockSummary> {
        if self.number.is_none() && self.hash.is_none() {
            return None;
        }
        Some(BlockSummary {
            number: count(self.number),
            hash: self.hash,
            timestamp: timestamp(self.timestamp.as_ref()),
            status: parse_enum(self.status.as_deref()).unwrap_or_default(),
        })
    }
}

/// Block fields some REST payloads inline next to the entity.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFlatBlock {
    block_number: Option<StrOrInt>,
    block_hash: Option<String>,
    timestamp: Option<Value>,
    status: Option<String>,
}

impl RawFlatBlock {
    fn into_summary(self) -> Option<BlockSummary> {
        let number = opt_u64(self.block_number)?;
        Some(BlockSummary {
            number,
            hash: self.block_hash,
            timestamp: timestamp(self.timestamp.as_ref()),
            status: parse_enum(self.status.as_deref()).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawUdt {
    id: Option<StrOrInt>,
    name: Option<String>,
    symbol: Option<String>,
    decimal: Option<StrOrInt>,
    eth_type: Option<String>,
    #[serde(rename = "type")]
    origin: Option<String>,
    supply: Option<Value>,
    #[serde(alias = "holder_count")]
    holders_count: Option<StrOrInt>,
    transfer_count: Option<StrOrInt>,
    contract_address_hash: Option<String>,
    script_hash: Option<String>,
    bridge_account_id: Option<StrOrInt>,
    icon: Option<String>,
    official_site: Option<String>,
    description: Option<String>,
    minted_count: Option<StrOrInt>,
}

impl RawUdt {
    fn standard(&self) -> Option<TokenStandard> {
        parse_enum(self.eth_type.as_deref())
    }

    pub(crate) fn into_udt(self) -> Udt {
        let standard = self.standard().unwrap_or_default();
        Udt {
            id: opt_u64(self.id),
            name: self.name,
            symbol: self.symbol,
            decimal: opt_u32(self.decimal).unwrap_or_default(),
            standard,
            origin: parse_enum(self.origin.as_deref()),
            supply: decimal(self.supply),
            holders_count: count(self.holders_count),
            transfer_count: count(self.transfer_count),
            contract_address_hash: self.contract_address_hash,
            script_hash: self.script_hash,
            bridge_account_id: opt_u64(self.bridge_account_id),
            icon: self.icon,
            official_site: self.official_site,
            description: self.description,
            minted_count: opt_u64(self.minted_count),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSmartContract {
    id: Option<StrOrInt>,
    name: Option<String>,
    compiler_version: Option<String>,
    compiler_file_format: Option<String>,
    deployment_tx_hash: Option<String>,
    contract_source_code: Option<String>,
    constructor_arguments: Option<String>,
    abi: Option<Value>,
    sourcify_metadata: Option<Value>,
}

impl RawSmartContract {
    fn into_smart_contract(self) -> SmartContract {
        SmartContract {
            id: opt_u64(self.id),
            name: self.name,
            compiler_version: self.compiler_version,
            compiler_file_format: self.compiler_file_format,
            deployment_tx_hash: self.deployment_tx_hash,
            contract_source_code: self.contract_source_code.filter(|s| !s.is_empty()),
            constructor_arguments: self.constructor_arguments,
            abi: self.abi.filter(|abi| !abi.is_null()),
            sourcify_metadata: self.sourcify_metadata.filter(|m| !m.is_null()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAccountMerkleState {
    account_count: Option<StrOrInt>,
    account_merkle_root: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBlockMerkleState {
    block_count: Option<StrOrInt>,
    block_merkle_root: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawScript {
    code_hash: Option<String>,
    hash_type: Option<String>,
    args: Option<String>,
    account_merkle_state: Option<RawAccountMerkleState>,
    block_merkle_state: Option<RawBlockMerkleState>,
    reverted_block_root: Option<String>,
    last_finalized_block_number: Option<StrOrInt>,
    status: Option<String>,
}

impl RawScript {
    fn into_script(self) -> AccountScript {
        AccountScript {
            code_hash: self.code_hash,
            hash_type: self.hash_type,
            args: self.args,
            account_merkle_state: self.account_merkle_state.map(|s| AccountMerkleState {
                account_count: count(s.account_count),
                account_merkle_root: s.account_merkle_root,
            }),
            block_merkle_state: self.block_merkle_state.map(|s| BlockMerkleState {
                block_count: count(s.block_count),
                block_merkle_root: s.block_merkle_root,
            }),
            reverted_block_root: self.reverted_block_root,
            last_finalized_block_number: opt_u64(self.last_finalized_block_number),
            status: self.status,
        }
    }
}

/// An account, or the `Address` shaped partial object GraphQL returns for
/// an address that has no account yet.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawAccount {
    #[serde(rename = "__typename")]
    typename: Option<String>,
    id: Option<StrOrInt>,
    #[serde(rename = "type")]
    kind: Option<String>,
    eth_address: Option<String>,
    script_hash: Option<String>,
    #[serde(alias = "tx_count")]
    transaction_count: Option<StrOrInt>,
    token_transfer_count: Option<StrOrInt>,
    nonce: Option<StrOrInt>,
    bit_alias: Option<String>,
    script: Option<RawScript>,
    udt: Option<RawUdt>,
    smart_contract: Option<RawSmartContract>,
}

impl RawAccount {
    pub(crate) fn into_account(self) -> Account {
        let kind = match self.typename.as_deref() {
            Some("Address") => None,
            _ => self.kind.as_deref().and_then(AccountType::parse),
        };
        Account {
            id: opt_u64(self.id),
            kind,
            eth_address: self.eth_address,
            script_hash: self.script_hash,
            transaction_count: count(self.transaction_count),
            token_transfer_count: count(self.token_transfer_count),
            nonce: count(self.nonce),
            bit_alias: self.bit_alias,
            script: self.script.map(RawScript::into_script),
            udt: self.udt.map(RawUdt::into_udt),
            smart_contract: self
                .smart_contract
                .map(RawSmartContract::into_smart_contract),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAccountRef {
    #[serde(rename = "type")]
    kind: Option<String>,
    eth_address: Option<String>,
    script_hash: Option<String>,
    bit_alias: Option<String>,
    udt: Option<RawUdt>,
    smart_contract: Option<RawSmartContract>,
}

impl RawAccountRef {
    fn into_ref(self) -> AccountRef {
        let alias = self
            .udt
            .and_then(|udt| udt.symbol.or(udt.name))
            .or_else(|| self.smart_contract.and_then(|c| c.name))
            .or(self.bit_alias);
        AccountRef {
            kind: self.kind.as_deref().and_then(AccountType::parse),
            eth_address: self.eth_address,
            script_hash: self.script_hash,
            alias,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPolyjuice {
    gas_limit: Option<Value>,
    gas_price: Option<Value>,
    gas_used: Option<Value>,
    value: Option<Value>,
    status: Option<String>,
    input: Option<String>,
    native_transfer_address_hash: Option<String>,
    created_contract_address_hash: Option<String>,
}

impl RawPolyjuice {
    fn is_empty(&self) -> bool {
        self.gas_limit.is_none()
            && self.gas_price.is_none()
            && self.gas_used.is_none()
            && self.value.is_none()
            && self.status.is_none()
    }

    fn into_info(self) -> PolyjuiceInfo {
        PolyjuiceInfo {
            gas_limit: decimal(self.gas_limit),
            gas_price: decimal(self.gas_price),
            gas_used: opt_decimal(self.gas_used),
            value: decimal(self.value),
            status: parse_enum(self.status.as_deref()).unwrap_or_default(),
            input: self.input,
            native_transfer_address_hash: self.native_transfer_address_hash,
            created_contract_address_hash: self.created_contract_address_hash,
        }
    }
}

/// A transaction. GraphQL nests block, accounts and polyjuice data; REST
/// inlines them, with `status` being the block's finalize state.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawTransaction {
    hash: Option<String>,
    eth_hash: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    block: Option<RawBlock>,
    block_number: Option<StrOrInt>,
    block_hash: Option<String>,
    timestamp: Option<Value>,
    status: Option<String>,
    index: Option<StrOrInt>,
    nonce: Option<StrOrInt>,
    from_account: Option<RawAccountRef>,
    to_account: Option<RawAccountRef>,
    from: Option<String>,
    to: Option<String>,
    to_alias: Option<String>,
    method_id: Option<String>,
    method_name: Option<String>,
    polyjuice: Option<RawPolyjuice>,
    gas_limit: Option<Value>,
    gas_price: Option<Value>,
    gas_used: Option<Value>,
    value: Option<Value>,
    polyjuice_status: Option<String>,
    input: Option<String>,
}

impl RawTransaction {
    pub(crate) fn into_transaction(self) -> Transaction {
        let block = self.block.and_then(RawBlock::into_summary).or_else(|| {
            RawFlatBlock {
                block_number: self.block_number,
                block_hash: self.block_hash,
                timestamp: self.timestamp,
                status: self.status,
            }
            .into_summary()
        });
        let kind: Option<TransactionType> = parse_enum(self.kind.as_deref());

        let flat = RawPolyjuice {
            gas_limit: self.gas_limit,
            gas_price: self.gas_price,
            gas_used: self.gas_used,
            value: self.value,
            status: self.polyjuice_status,
            input: self.input,
            native_transfer_address_hash: None,
            created_contract_address_hash: None,
        };
        let polyjuice = match self.polyjuice {
            Some(polyjuice) => Some(polyjuice.into_info()),
            None if !flat.is_empty() => Some(flat.into_info()),
            None => None,
        };

        let from_account = match self.from_account {
            Some(account) => account.into_ref(),
            None => account_ref(self.from, None),
        };
        let to_account = match self.to_account {
            Some(account) => account.into_ref(),
            None => account_ref(self.to, self.to_alias),
        };

        Transaction {
            hash: self.hash.unwrap_or_default(),
            eth_hash: self.eth_hash.filter(|h| !h.is_empty()),
            kind,
            status: TransactionStatus::from_block(block.as_ref()),
            block,
            index: opt_u32(self.index),
            nonce: count(self.nonce),
            from_account,
            to_account,
            method_id: self.method_id,
            method_name: self.method_name,
            polyjuice,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPolyjuiceStatus {
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawTransfer {
    transaction_hash: Option<String>,
    log_index: Option<StrOrInt>,
    from_address: Option<String>,
    to_address: Option<String>,
    amount: Option<Value>,
    token_id: Option<Value>,
    #[serde(deserialize_with = "nullable")]
    token_ids: Vec<Value>,
    #[serde(deserialize_with = "nullable")]
    amounts: Vec<Value>,
    udt: Option<RawUdt>,
    block: Option<RawBlock>,
    block_number: Option<StrOrInt>,
    block_hash: Option<String>,
    timestamp: Option<Value>,
    status: Option<String>,
    polyjuice: Option<RawPolyjuiceStatus>,
    polyjuice_status: Option<String>,
}

impl RawTransfer {
    /// The token's standard decides the kind. Without one, ERC-1155 id lists
    /// and a lone ERC-721 id are recognised by shape.
    fn kind(
        standard: Option<TokenStandard>,
        amount: Option<Value>,
        token_id: Option<Value>,
        token_ids: Vec<Value>,
        amounts: Vec<Value>,
    ) -> TransferKind {
        let standard = standard.unwrap_or(if !token_ids.is_empty() {
            TokenStandard::Erc1155
        } else if token_id.is_some() && amount.is_none() {
            TokenStandard::Erc721
        } else {
            TokenStandard::Erc20
        });
        match standard {
            TokenStandard::Erc20 => TransferKind::Erc20 {
                amount: decimal(amount),
            },
            TokenStandard::Erc721 => TransferKind::Erc721 {
                token_id: opt_decimal(token_id)
                    .or_else(|| token_ids.into_iter().find_map(|id| opt_decimal(Some(id))))
                    .unwrap_or_else(|| "0".to_owned()),
            },
            TokenStandard::Erc1155 => {
                let mut token_ids: Vec<String> = token_ids
                    .into_iter()
                    .map(|id| decimal(Some(id)))
                    .collect();
                let mut amounts: Vec<String> =
                    amounts.into_iter().map(|a| decimal(Some(a))).collect();
                if token_ids.is_empty() {
                    token_ids.extend(opt_decimal(token_id));
                }
                if amounts.is_empty() {
                    amounts.extend(opt_decimal(amount));
                }
                TransferKind::Erc1155 { token_ids, amounts }
            }
        }
    }

    pub(crate) fn into_transfer(self) -> TokenTransfer {
        let standard = self.udt.as_ref().and_then(RawUdt::standard);
        let kind = Self::kind(
            standard,
            self.amount,
            self.token_id,
            self.token_ids,
            self.amounts,
        );
        let block = self.block.and_then(RawBlock::into_summary).or_else(|| {
            RawFlatBlock {
                block_number: self.block_number,
                block_hash: self.block_hash,
                timestamp: self.timestamp,
                status: self.status,
            }
            .into_summary()
        });
        let polyjuice_status = self
            .polyjuice
            .and_then(|p| p.status)
            .or(self.polyjuice_status);

        TokenTransfer {
            transaction_hash: self.transaction_hash.unwrap_or_default(),
            log_index: opt_u32(self.log_index).unwrap_or_default(),
            from_address: self.from_address,
            to_address: self.to_address,
            udt: self.udt.map(RawUdt::into_udt),
            block,
            polyjuice_status: parse_enum(polyjuice_status.as_deref()),
            kind,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBridgedToken {
    id: Option<StrOrInt>,
    name: Option<String>,
    symbol: Option<String>,
    decimal: Option<StrOrInt>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawBridged {
    #[serde(rename = "type")]
    kind: Option<String>,
    eth_address: Option<String>,
    ckb_address: Option<String>,
    #[serde(alias = "value")]
    amount: Option<Value>,
    capacity: Option<Value>,
    layer1_tx_hash: Option<String>,
    layer1_output_index: Option<StrOrInt>,
    layer1_block_number: Option<StrOrInt>,
    block_number: Option<StrOrInt>,
    block_hash: Option<String>,
    timestamp: Option<Value>,
    state: Option<String>,
    udt: Option<RawBridgedToken>,
}

impl RawBridged {
    pub(crate) fn into_record(self) -> BridgedRecord {
        BridgedRecord {
            direction: parse_enum(self.kind.as_deref()),
            eth_address: self.eth_address,
            ckb_address: self.ckb_address,
            amount: decimal(self.amount),
            capacity: decimal(self.capacity),
            layer1_tx_hash: self.layer1_tx_hash,
            layer1_output_index: opt_u32(self.layer1_output_index),
            layer1_block_number: opt_u64(self.layer1_block_number),
            block_number: opt_u64(self.block_number),
            block_hash: self.block_hash,
            timestamp: timestamp(self.timestamp.as_ref()),
            state: self.state,
            udt: self.udt.map(|udt| BridgedToken {
                id: opt_u64(udt.id),
                name: udt.name,
                symbol: udt.symbol,
                decimal: opt_u32(udt.decimal).unwrap_or_default(),
                icon: udt.icon,
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawDailyStat {
    date: Option<String>,
    avg_block_size: Option<Value>,
    avg_block_time: Option<Value>,
    avg_gas_limit: Option<Value>,
    avg_gas_used: Option<Value>,
    erc20_transfer_count: Option<StrOrInt>,
    total_block_count: Option<StrOrInt>,
    total_txn: Option<StrOrInt>,
}

impl RawDailyStat {
    pub(crate) fn into_stat(self) -> DailyStat {
        DailyStat {
            date: self.date.unwrap_or_default(),
            avg_block_size: decimal(self.avg_block_size),
            avg_block_time: decimal(self.avg_block_time),
            avg_gas_limit: decimal(self.avg_gas_limit),
            avg_gas_used: decimal(self.avg_gas_used),
            erc20_transfer_count: count(self.erc20_transfer_count),
            total_block_count: count(self.total_block_count),
            total_txn: count(self.total_txn),
        }
    }
}

/// A list sent either bare or wrapped as `{ entries: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawList<T> {
    Plain(Vec<T>),
    Paged {
        #[serde(default, deserialize_with = "nullable")]
        entries: Vec<T>,
    },
}

impl<T> Default for RawList<T> {
    fn default() -> Self {
        RawList::Plain(vec![])
    }
}

impl<T> RawList<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            RawList::Plain(items) | RawList::Paged { entries: items } => items,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawStatistic {
    account_count: Option<StrOrInt>,
    block_count: Option<StrOrInt>,
    #[serde(alias = "tx_count")]
    transaction_count: Option<StrOrInt>,
    tps: Option<Value>,
}

impl RawStatistic {
    pub(crate) fn into_statistic(self) -> HomeStatistic {
        HomeStatistic {
            account_count: count(self.account_count),
            block_count: count(self.block_count),
            transaction_count: count(self.transaction_count),
            tps: decimal(self.tps),
        }
    }
}

/// The home payload, also the shape of `home:refresh` pushes where any part
/// may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawHome {
    #[serde(alias = "blocks", deserialize_with = "nullable")]
    pub(crate) block_list: RawList<RawBlock>,
    #[serde(alias = "transactions", deserialize_with = "nullable")]
    pub(crate) tx_list: RawList<RawTransaction>,
    pub(crate) statistic: Option<RawStatistic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawLog {
    transaction_hash: Option<String>,
    #[serde(alias = "index")]
    log_index: Option<StrOrInt>,
    address_hash: Option<String>,
    block_number: Option<StrOrInt>,
    #[serde(deserialize_with = "nullable")]
    topics: Vec<Option<String>>,
    first_topic: Option<String>,
    second_topic: Option<String>,
    third_topic: Option<String>,
    fourth_topic: Option<String>,
    data: Option<String>,
}

impl RawLog {
    pub(crate) fn into_log(self) -> EventLog {
        let topics: Vec<String> = if self.topics.is_empty() {
            [
                self.first_topic,
                self.second_topic,
                self.third_topic,
                self.fourth_topic,
            ]
            .into_iter()
            .map_while(|topic| topic)
            .collect()
        } else {
            self.topics.into_iter().flatten().collect()
        };
        let log_index = opt_u32(self.log_index).unwrap_or_default();
        let transaction_hash = self.transaction_hash;
        EventLog {
            id: format!(
                "{}-{log_index}",
                transaction_hash.as_deref().unwrap_or_default()
            ),
            address_hash: self.address_hash,
            transaction_hash,
            block_number: opt_u64(self.block_number),
            log_index,
            topics,
            data: self
                .data
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "0x".to_owned()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawNftItem {
    #[serde(alias = "token_contract_address_hash")]
    contract_address_hash: Option<String>,
    #[serde(alias = "address_hash")]
    owner: Option<String>,
    token_id: Option<Value>,
    #[serde(alias = "value")]
    quantity: Option<Value>,
    #[serde(alias = "metadata_url")]
    token_uri: Option<String>,
    metadata: Option<Value>,
    udt: Option<RawUdt>,
}

impl RawNftItem {
    pub(crate) fn into_item(self, ipfs_gateway: &str) -> NftItem {
        let standard = self
            .udt
            .as_ref()
            .and_then(RawUdt::standard)
            .unwrap_or(TokenStandard::Erc721);
        let contract_address_hash = self
            .contract_address_hash
            .or_else(|| self.udt.and_then(|udt| udt.contract_address_hash))
            .unwrap_or_default();
        let metadata = self.metadata.unwrap_or_default();
        let text = |key: &str| metadata.get(key).and_then(Value::as_str).map(str::to_owned);
        let image = text("image")
            .or_else(|| text("image_url"))
            .map(|uri| resolve_ipfs_uri(&uri, ipfs_gateway));
        NftItem {
            contract_address_hash,
            token_id: decimal(self.token_id),
            standard,
            owner: self.owner,
            quantity: opt_decimal(self.quantity).unwrap_or_else(|| "1".to_owned()),
            token_uri: self.token_uri,
            name: text("name"),
            image,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawPageMetadata {
    #[serde(alias = "total")]
    total_count: Option<StrOrInt>,
    before: Option<String>,
    after: Option<String>,
    current_page: Option<StrOrInt>,
    total_page: Option<StrOrInt>,
}

impl RawPageMetadata {
    pub(crate) fn into_metadata(self) -> PageMetadata {
        PageMetadata {
            total_count: count(self.total_count),
            before: self.before.filter(|c| !c.is_empty()),
            after: self.after.filter(|c| !c.is_empty()),
            current_page: opt_u64(self.current_page),
            total_page: opt_u64(self.total_page),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSearchResult {
    #[serde(rename = "type")]
    pub(crate) kind: Option<String>,
    pub(crate) id: Option<Value>,
}

impl RawSearchResult {
    pub(crate) fn id(&self) -> Option<String> {
        id_text(self.id.clone()).filter(|id| !id.is_empty())
    }
}
