//! Response normalization: one entry point per entity, each accepting the raw
//! JSON of either backend and returning the typed view model.

use derive_new::new;
use gwscan_core::log_decoder::LogDecoder;
use gwscan_core::search::SearchTarget;
use gwscan_core::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::{Display, EnumString};
use tracing::{debug, instrument};

use crate::settings::{ChainConf, DEFAULT_IPFS_GATEWAY};

mod envelope;
pub(crate) mod raw;

use envelope::{collection, resource};
use raw::*;

/// Backend a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Source {
    /// JSON:API style REST routes
    Rest,
    /// The GraphQL endpoint
    Graphql,
}

fn decode<T: DeserializeOwned>(value: Value) -> ExplorerResult<T> {
    Ok(serde_json::from_value(value)?)
}

fn decode_page<R, T>(
    source: Source,
    payload: &Value,
    fields: &[&str],
    convert: impl FnMut(R) -> T,
) -> ExplorerResult<Page<T>>
where
    R: DeserializeOwned,
{
    let (entries, meta) = collection(source, payload, fields)?;
    let entries: Vec<R> = entries
        .into_iter()
        .map(decode)
        .collect::<ExplorerResult<_>>()?;
    let metadata = if meta.is_null() {
        PageMetadata {
            total_count: entries.len() as u64,
            ..Default::default()
        }
    } else {
        decode::<RawPageMetadata>(meta)?.into_metadata()
    };
    debug!(
        count = entries.len(),
        total = metadata.total_count,
        "Normalized list"
    );
    Ok(Page {
        entries: entries.into_iter().map(convert).collect(),
        metadata,
    })
}

/// Shapes raw payloads into view models.
#[derive(Debug, Clone, new)]
pub struct Normalizer {
    ipfs_gateway: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_IPFS_GATEWAY.to_owned())
    }
}

impl Normalizer {
    /// Normalizer for the configured chain.
    pub fn from_chain(chain: &ChainConf) -> Self {
        Self::new(chain.ipfs_gateway.clone())
    }

    /// A single block.
    #[instrument(skip_all, fields(%source))]
    pub fn block(&self, source: Source, payload: &Value) -> ExplorerResult<Block> {
        let raw: RawBlock = decode(resource(source, payload, &["block"])?)?;
        Ok(raw.into_block())
    }

    /// A single transaction. Polyjuice transactions are served under their
    /// eth hash: requesting one by its godwoken hash is reported as
    /// [`ExplorerError::GwHash`], carrying the eth hash when the backend
    /// returned it.
    #[instrument(skip_all, fields(%source, requested = requested.unwrap_or_default()))]
    pub fn transaction(
        &self,
        source: Source,
        payload: &Value,
        requested: Option<&str>,
    ) -> ExplorerResult<Transaction> {
        let raw: RawTransaction = decode(resource(source, payload, &["transaction"])?)?;
        let tx = raw.into_transaction();
        let Some(requested) = requested.map(str::trim) else {
            return Ok(tx);
        };
        if !requested.eq_ignore_ascii_case(&tx.hash) {
            return Ok(tx);
        }
        let eth_hash = match tx.eth_hash.clone() {
            Some(eth_hash) if eth_hash.eq_ignore_ascii_case(&tx.hash) => return Ok(tx),
            Some(eth_hash) => Some(eth_hash),
            None if tx.kind == Some(TransactionType::Polyjuice) => {
                debug!(hash = %tx.hash, "Polyjuice transaction without an eth hash");
                None
            }
            None => return Ok(tx),
        };
        Err(ExplorerError::GwHash {
            hash: tx.hash,
            eth_hash,
        })
    }

    /// A single account. The restricted `Address` object GraphQL returns for
    /// an address without an account normalizes to an account with no type.
    #[instrument(skip_all, fields(%source))]
    pub fn account(&self, source: Source, payload: &Value) -> ExplorerResult<Account> {
        let raw: RawAccount = decode(resource(source, payload, &["account", "address"])?)?;
        Ok(raw.into_account())
    }

    /// A single token.
    #[instrument(skip_all, fields(%source))]
    pub fn token(&self, source: Source, payload: &Value) -> ExplorerResult<Udt> {
        let raw: RawUdt = decode(resource(source, payload, &["udt", "token"])?)?;
        Ok(raw.into_udt())
    }

    /// A page of token transfers.
    #[instrument(skip_all, fields(%source))]
    pub fn transfers(
        &self,
        source: Source,
        payload: &Value,
    ) -> ExplorerResult<Page<TokenTransfer>> {
        decode_page(
            source,
            payload,
            &["token_transfers", "erc721_erc1155_token_transfers"],
            RawTransfer::into_transfer,
        )
    }

    /// A page of deposits and withdrawals.
    #[instrument(skip_all, fields(%source))]
    pub fn bridged_records(
        &self,
        source: Source,
        payload: &Value,
    ) -> ExplorerResult<Page<BridgedRecord>> {
        decode_page(
            source,
            payload,
            &["deposit_withdrawals", "bridged_records"],
            RawBridged::into_record,
        )
    }

    /// The daily statistics series, oldest first as sent.
    #[instrument(skip_all, fields(%source))]
    pub fn daily_stats(&self, source: Source, payload: &Value) -> ExplorerResult<Vec<DailyStat>> {
        let page = decode_page(source, payload, &["daily_stats"], RawDailyStat::into_stat)?;
        Ok(page.entries)
    }

    /// The home page.
    #[instrument(skip_all, fields(%source))]
    pub fn home(&self, source: Source, payload: &Value) -> ExplorerResult<Home> {
        let raw: RawHome = decode(resource(source, payload, &[])?)?;
        Ok(Home {
            blocks: raw
                .block_list
                .into_vec()
                .into_iter()
                .map(RawBlock::into_block)
                .collect(),
            transactions: raw
                .tx_list
                .into_vec()
                .into_iter()
                .map(RawTransaction::into_transaction)
                .collect(),
            statistic: raw
                .statistic
                .map(RawStatistic::into_statistic)
                .unwrap_or_default(),
        })
    }

    /// Where a backend search result points.
    #[instrument(skip_all, fields(%source))]
    pub fn search(&self, source: Source, payload: &Value) -> ExplorerResult<SearchTarget> {
        let raw: RawSearchResult =
            decode(resource(source, payload, &["search_keyword", "search"])?)?;
        let (Some(kind), Some(id)) = (raw.kind.as_deref(), raw.id()) else {
            return Err(ExplorerError::NotFound);
        };
        match kind.to_ascii_lowercase().as_str() {
            "block" => Ok(SearchTarget::Block(id)),
            "transaction" => Ok(SearchTarget::Transaction(id)),
            "account" | "address" => Ok(SearchTarget::Account(id)),
            "udt" | "token" => Ok(SearchTarget::Token(id)),
            other => {
                debug!(kind = other, "Search result of unknown type");
                Err(ExplorerError::NotFound)
            }
        }
    }

    /// A single event log, decoded where `decoder` can.
    #[instrument(skip_all, fields(%source, abi = decoder.has_abi()))]
    pub fn event_log(
        &self,
        source: Source,
        payload: &Value,
        decoder: &LogDecoder,
    ) -> ExplorerResult<ParsedEventLog> {
        let raw: RawLog = decode(resource(source, payload, &["log"])?)?;
        Ok(decoder.decode(raw.into_log()))
    }

    /// A page of event logs, decoded where `decoder` can.
    #[instrument(skip_all, fields(%source, abi = decoder.has_abi()))]
    pub fn event_logs(
        &self,
        source: Source,
        payload: &Value,
        decoder: &LogDecoder,
    ) -> ExplorerResult<Page<ParsedEventLog>> {
        decode_page(source, payload, &["logs"], |raw: RawLog| {
            decoder.decode(raw.into_log())
        })
    }

    /// A page of an NFT inventory with image uris resolved.
    #[instrument(skip_all, fields(%source))]
    pub fn nft_items(&self, source: Source, payload: &Value) -> ExplorerResult<Page<NftItem>> {
        decode_page(
            source,
            payload,
            &[
                "erc721_inventory",
                "erc1155_inventory",
                "user_erc721_assets",
                "user_erc1155_assets",
            ],
            |raw: RawNftItem| raw.into_item(&self.ipfs_gateway),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sources_parse() {
        assert_eq!("REST".parse::<Source>().unwrap(), Source::Rest);
        assert_eq!("graphql".parse::<Source>().unwrap(), Source::Graphql);
        assert_eq!(Source::Graphql.to_string(), "graphql");
    }

    #[test]
    fn gw_hash_is_redirected() {
        let payload = json!({
            "data": { "transaction": { "hash": "0xgw", "eth_hash": "0xeth" } }
        });
        let normalizer = Normalizer::default();
        let err = normalizer
            .transaction(Source::Graphql, &payload, Some("0xGW"))
            .unwrap_err();
        assert_eq!(err.redirect().href(), "/tx/0xeth");

        let tx = normalizer
            .transaction(Source::Graphql, &payload, Some("0xeth"))
            .unwrap();
        assert_eq!(tx.display_hash(), "0xeth");
    }

    #[test]
    fn polyjuice_gw_hash_without_eth_hash() {
        let normalizer = Normalizer::default();
        let payload = json!({
            "data": { "transaction": { "hash": "0xgw", "type": "POLYJUICE" } }
        });
        let err = normalizer
            .transaction(Source::Graphql, &payload, Some("0xgw"))
            .unwrap_err();
        assert_eq!(err.redirect().href(), "/404?hash=0xgw&type=gw");

        let payload = json!({
            "data": { "transaction": { "hash": "0xgw", "type": "ETH_ADDRESS_REGISTRY" } }
        });
        let tx = normalizer
            .transaction(Source::Graphql, &payload, Some("0xgw"))
            .unwrap();
        assert_eq!(tx.kind, Some(TransactionType::EthAddressRegistry));
    }

    #[test]
    fn address_typename_has_no_kind() {
        let payload = json!({
            "data": {
                "account": { "__typename": "Address", "eth_address": "0xab", "type": "eth_user" }
            }
        });
        let account = Normalizer::default()
            .account(Source::Graphql, &payload)
            .unwrap();
        assert_eq!(account.kind, None);
        assert_eq!(account.eth_address.as_deref(), Some("0xab"));
    }

    #[test]
    fn search_targets() {
        let normalizer = Normalizer::default();
        let target = normalizer
            .search(Source::Rest, &json!({ "type": "block", "id": 42 }))
            .unwrap();
        assert_eq!(target.redirect().href(), "/block/42");

        let err = normalizer
            .search(Source::Rest, &json!({ "type": "nothing", "id": "x" }))
            .unwrap_err();
        assert!(matches!(err, ExplorerError::NotFound));
    }

    #[test]
    fn nft_images_use_gateway() {
        let payload = json!({
            "data": { "erc721_inventory": { "entries": [{
                "token_contract_address_hash": "0xcc",
                "token_id": 3,
                "metadata": { "name": "Cat", "image": "ipfs://QmCat" }
            }], "metadata": { "total_count": 1 } } }
        });
        let page = Normalizer::new("https://ipfs.test/".into())
            .nft_items(Source::Graphql, &payload)
            .unwrap();
        let item = &page.entries[0];
        assert_eq!(item.token_id, "3");
        assert_eq!(item.quantity, "1");
        assert_eq!(item.image.as_deref(), Some("https://ipfs.test/QmCat"));
    }
}
