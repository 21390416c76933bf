use gwscan_base::{Normalizer, Source};
use gwscan_core::dispatch::{dispatch, AccountView, FollowUp};
use gwscan_core::log_decoder::LogDecoder;
use gwscan_core::*;
use serde::Serialize;
use serde_json::{json, Value};

const ETH_ADDRESS: &str = "0x5b38da6a701c568545dcfcb03fcb875f56beddc4";
const GW_HASH: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
const TRANSFER_TOPIC: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Every object key of `value`, recursively.
fn keys(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                out.push(key.clone());
                keys(value, out);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| keys(item, out)),
        _ => {}
    }
}

fn assert_camel_case(view: &impl Serialize) {
    let mut all = vec![];
    keys(&serde_json::to_value(view).unwrap(), &mut all);
    for key in all {
        assert!(!key.contains('_'), "snake_case key {key:?}");
        assert!(
            key.chars().next().map_or(false, |c| c.is_ascii_lowercase()),
            "key {key:?} does not start lowercase"
        );
    }
}

fn rest_transaction() -> Value {
    json!({
        "data": {
            "id": "1",
            "type": "transaction",
            "attributes": {
                "hash": GW_HASH,
                "eth_hash": "0x2222222222222222222222222222222222222222222222222222222222222222",
                "type": "polyjuice",
                "block_number": "1024",
                "block_hash": "0x33",
                "timestamp": "2022-04-15T05:20:00.000000Z",
                "status": "finalized",
                "from": ETH_ADDRESS,
                "to": "0x4444444444444444444444444444444444444444444444444444444444444444",
                "to_alias": "pCKB",
                "nonce": 7,
                "gas_limit": "50000",
                "gas_price": 1000,
                "gas_used": null,
                "value": "0",
                "polyjuice_status": "succeed",
                "input": "0x"
            }
        }
    })
}

#[test]
fn rest_transaction_is_flattened() {
    let tx = Normalizer::default()
        .transaction(Source::Rest, &rest_transaction(), None)
        .unwrap();

    assert_eq!(tx.kind, Some(TransactionType::Polyjuice));
    assert_eq!(tx.status, TransactionStatus::Finalized);
    let block = tx.block.as_ref().unwrap();
    assert_eq!(block.number, 1024);
    assert_eq!(block.timestamp, 1650000000);
    assert_eq!(tx.from_account.eth_address.as_deref(), Some(ETH_ADDRESS));
    assert!(tx.to_account.script_hash.is_some());
    assert_eq!(tx.to_account.alias.as_deref(), Some("pCKB"));
    let polyjuice = tx.polyjuice.as_ref().unwrap();
    assert_eq!(polyjuice.gas_price, "1000");
    assert_eq!(polyjuice.gas_used, None);
    assert_eq!(polyjuice.status, PolyjuiceStatus::Succeed);
    assert_camel_case(&tx);
}

#[test]
fn missing_fields_get_defaults() {
    let normalizer = Normalizer::default();

    let block = normalizer
        .block(Source::Graphql, &json!({ "data": { "block": {} } }))
        .unwrap();
    assert_eq!(block.number, 0);
    assert_eq!(block.hash, "");
    assert_eq!(block.timestamp, PENDING_TIMESTAMP);
    assert_eq!(block.status, FinalizeState::Pending);
    assert_eq!(block.gas_used, "0");

    let payload = json!({ "data": { "transaction": { "hash": "0xaa" } } });
    let tx = normalizer
        .transaction(Source::Graphql, &payload, None)
        .unwrap();
    assert!(tx.block.is_none());
    assert_eq!(tx.status, TransactionStatus::Pending);
    assert_eq!(tx.timestamp(), PENDING_TIMESTAMP);
    assert!(tx.polyjuice.is_none());
    assert_eq!(tx.from_account, AccountRef::default());

    let payload = json!({
        "data": { "id": "1", "type": "udt", "attributes": { "supply": null } }
    });
    let token = normalizer.token(Source::Rest, &payload).unwrap();
    assert_eq!(token.id, Some(1));
    assert_eq!(token.supply, "0");
    assert_eq!(token.standard, TokenStandard::Erc20);

    let payload = json!({
        "data": {
            "deposit_withdrawals": {
                "entries": [{ "value": null, "udt": null }],
                "metadata": null
            }
        }
    });
    let page = normalizer
        .bridged_records(Source::Graphql, &payload)
        .unwrap();
    let record = &page.entries[0];
    assert_eq!(record.amount, "0");
    assert_eq!(record.direction, None);
    assert_eq!(record.timestamp, PENDING_TIMESTAMP);
    assert_eq!(page.metadata.total_count, 1);

    let payload = json!({
        "data": { "blocks": null, "transactions": { "entries": null } }
    });
    let home = normalizer.home(Source::Graphql, &payload).unwrap();
    assert!(home.blocks.is_empty());
    assert!(home.transactions.is_empty());
    assert_eq!(home.statistic, HomeStatistic::default());
}

#[test]
fn graphql_transfers_pick_their_kind() {
    let payload = json!({
        "data": {
            "token_transfers": {
                "entries": [
                    {
                        "transaction_hash": "0xaa",
                        "log_index": 0,
                        "amount": "1500000000000000000",
                        "udt": { "id": 1, "symbol": "USDC", "decimal": 18, "eth_type": "ERC20" },
                        "block": {
                            "number": 9,
                            "timestamp": "2022-04-15T05:20:00Z",
                            "status": "COMMITTED"
                        },
                        "polyjuice": { "status": "SUCCEED" }
                    },
                    {
                        "transaction_hash": "0xaa",
                        "log_index": 1,
                        "token_id": "12",
                        "udt": { "eth_type": "ERC721" }
                    },
                    {
                        "transaction_hash": "0xbb",
                        "log_index": 0,
                        "token_ids": [1, 2],
                        "amounts": ["3", "4"],
                        "udt": { "eth_type": "ERC1155" }
                    }
                ],
                "metadata": { "total_count": 3, "before": null, "after": "g3QAAAAB" }
            }
        }
    });
    let page = Normalizer::default()
        .transfers(Source::Graphql, &payload)
        .unwrap();

    assert_eq!(page.metadata.total_count, 3);
    assert_eq!(page.metadata.after.as_deref(), Some("g3QAAAAB"));
    assert!(page.metadata.before.is_none());

    let first = &page.entries[0];
    assert_eq!(
        first.kind,
        TransferKind::Erc20 {
            amount: "1500000000000000000".into()
        }
    );
    assert_eq!(first.polyjuice_status, Some(PolyjuiceStatus::Succeed));
    assert_eq!(
        first.block.as_ref().unwrap().status,
        FinalizeState::Committed
    );
    assert_ne!(first.key(), page.entries[1].key());
    assert_eq!(
        page.entries[1].kind,
        TransferKind::Erc721 {
            token_id: "12".into()
        }
    );
    assert_eq!(
        page.entries[2].kind,
        TransferKind::Erc1155 {
            token_ids: vec!["1".into(), "2".into()],
            amounts: vec!["3".into(), "4".into()]
        }
    );
    assert_camel_case(&page);
}

#[test]
fn accounts_dispatch_after_normalizing() {
    let normalizer = Normalizer::default();

    let contract = normalizer
        .account(
            Source::Graphql,
            &json!({ "data": { "account": {
                "type": "POLYJUICE_CONTRACT",
                "eth_address": ETH_ADDRESS,
                "transaction_count": "12",
                "smart_contract": { "name": "Token", "contract_source_code": null, "abi": null }
            } } }),
        )
        .unwrap();
    let view = dispatch(&contract);
    assert!(matches!(view, AccountView::PolyjuiceContract(_)));
    assert_eq!(
        view.follow_ups(),
        vec![FollowUp::CheckSourcify {
            address: ETH_ADDRESS.to_owned()
        }]
    );
    assert_camel_case(&contract);

    let meta = normalizer
        .account(
            Source::Rest,
            &json!({ "data": { "id": "0", "type": "account", "attributes": {
                "type": "meta_contract",
                "script": {
                    "account_merkle_state": { "account_count": 120 },
                    "block_merkle_state": { "block_count": "5000" },
                    "status": "running"
                }
            } } }),
        )
        .unwrap();
    match dispatch(&meta) {
        AccountView::MetaContract(view) => {
            assert_eq!(view.account_count, Some(120));
            assert_eq!(view.block_count, Some(5000));
            assert_eq!(view.status, Some("running"));
        }
        other => panic!("unexpected branch {other:?}"),
    }

    let payload = json!({
        "data": { "address": { "__typename": "Address", "eth_address": ETH_ADDRESS } }
    });
    let address = normalizer.account(Source::Graphql, &payload).unwrap();
    assert!(matches!(dispatch(&address), AccountView::Unknown(_)));
}

#[test]
fn error_envelopes_map_to_redirects() {
    let normalizer = Normalizer::default();

    let err = normalizer
        .block(Source::Rest, &json!({ "error_code": 404, "message": "not found" }))
        .unwrap_err();
    assert_eq!(err.redirect().href(), "/404");

    let err = normalizer
        .account(
            Source::Graphql,
            &json!({ "data": { "account": null }, "errors": [{ "message": "account not found" }] }),
        )
        .unwrap_err();
    assert_eq!(err.redirect().href(), "/404");

    let err = normalizer
        .token(
            Source::Graphql,
            &json!({ "data": null, "errors": [{ "message": "internal failure" }] }),
        )
        .unwrap_err();
    assert_eq!(err.redirect().href(), "/500?message=internal+failure");

    let err = normalizer
        .transaction(
            Source::Rest,
            &rest_transaction(),
            Some(GW_HASH),
        )
        .unwrap_err();
    assert_eq!(
        err.redirect().href(),
        "/tx/0x2222222222222222222222222222222222222222222222222222222222222222"
    );
}

#[test]
fn logs_decode_or_fall_back() {
    let abi = json!([{
        "type": "event",
        "name": "Transfer",
        "anonymous": false,
        "inputs": [
            { "name": "from", "type": "address", "indexed": true },
            { "name": "to", "type": "address", "indexed": true },
            { "name": "value", "type": "uint256", "indexed": false }
        ]
    }]);
    let padded = |address: &str| format!("0x000000000000000000000000{}", &address[2..]);
    let payload = json!({
        "data": { "logs": { "entries": [
            {
                "transaction_hash": "0xaa",
                "index": 0,
                "address_hash": "0xcc",
                "first_topic": TRANSFER_TOPIC,
                "second_topic": padded(ETH_ADDRESS),
                "third_topic": padded(ETH_ADDRESS),
                "data": "0x00000000000000000000000000000000000000000000000000000000000003e8"
            },
            {
                "transaction_hash": "0xaa",
                "index": 1,
                "topics": [TRANSFER_TOPIC],
                "data": "0xabc"
            }
        ], "metadata": { "total_count": 2 } } }
    });

    let page = Normalizer::default()
        .event_logs(Source::Graphql, &payload, &LogDecoder::from_abi_json(&abi))
        .unwrap();

    let decoded = &page.entries[0];
    let parsed = decoded.parsed_log.as_ref().unwrap();
    assert_eq!(parsed.name, "Transfer");
    assert_eq!(parsed.arguments.len(), 3);
    assert_eq!(decoded.log.id, "0xaa-0");

    let fallback = &page.entries[1];
    assert!(fallback.parsed_log.is_none());
    assert!(fallback
        .slots
        .iter()
        .all(|slot| matches!(slot.value, SlotValue::Raw(_))));
    assert_camel_case(&page);
}
