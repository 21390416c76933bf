use std::fs;
use std::path::PathBuf;

use clap::Parser;
use gwscan_base::{Normalizer, Source};
use gwscan_cli::cli::args::{Args, Commands, NormalizeArgs, PayloadKind};
use gwscan_core::log_decoder::LogDecoder;
use serde_json::json;

fn normalize_args(kind: PayloadKind, source: Source) -> NormalizeArgs {
    NormalizeArgs {
        kind,
        source,
        hash: None,
        abi: None,
        file: PathBuf::from("payload.json"),
    }
}

#[test]
fn parses_normalize_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("block.json");
    fs::write(&file, "{}").unwrap();

    let args = Args::try_parse_from([
        "gwscan",
        "normalize",
        "--kind",
        "daily-stats",
        "--source",
        "REST",
        file.to_str().unwrap(),
    ])
    .unwrap();
    match args.command {
        Commands::Normalize(cmd) => {
            assert_eq!(cmd.kind, PayloadKind::DailyStats);
            assert_eq!(cmd.source, Source::Rest);
            assert_eq!(cmd.file, file);
        }
        other => panic!("unexpected {other:?}"),
    }

    let unknown_kind = ["gwscan", "normalize", "--kind", "mempool", "x.json"];
    assert!(Args::try_parse_from(unknown_kind).is_err());
}

#[test]
fn account_view_carries_branch_and_follow_ups() {
    let payload = json!({ "data": { "account": {
        "type": "POLYJUICE_CONTRACT",
        "eth_address": "0x5b38da6a701c568545dcfcb03fcb875f56beddc4",
        "smart_contract": { "name": "Token" }
    } } });
    let view = normalize_args(PayloadKind::Account, Source::Graphql)
        .view(&Normalizer::default(), &LogDecoder::default(), &payload)
        .unwrap();

    assert_eq!(view["view"]["branch"], "polyjuiceContract");
    assert_eq!(view["followUps"][0]["kind"], "checkSourcify");
    assert_eq!(view["account"]["type"], "polyjuiceContract");
}

#[test]
fn search_view_includes_route() {
    let payload = json!({ "data": { "search_keyword": { "type": "UDT", "id": 1 } } });
    let view = normalize_args(PayloadKind::Search, Source::Graphql)
        .view(&Normalizer::default(), &LogDecoder::default(), &payload)
        .unwrap();
    assert_eq!(view["redirect"], "/token/1");
}

#[test]
fn error_payloads_resolve_to_redirects() {
    let payload = json!({ "error_code": 404 });
    let err = normalize_args(PayloadKind::Block, Source::Rest)
        .view(&Normalizer::default(), &LogDecoder::default(), &payload)
        .unwrap_err();
    assert_eq!(err.redirect().href(), "/404");
}

#[test]
fn decode_log_reads_a_bare_log_by_default() {
    let argv = ["gwscan", "decode-log", "--log", "log.json"];
    let args = Args::try_parse_from(argv).unwrap();
    let Commands::DecodeLog(cmd) = args.command else {
        panic!("expected decode-log");
    };
    assert_eq!(cmd.source, Source::Rest);
    assert!(!cmd.json);

    let log = json!({
        "transaction_hash": "0xaa",
        "index": 3,
        "address_hash": "0xcc",
        "topics": ["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"],
        "data": "0x01"
    });
    let parsed = Normalizer::default()
        .event_log(cmd.source, &log, &LogDecoder::default())
        .unwrap();
    assert_eq!(parsed.log.id, "0xaa-3");
    assert!(parsed.parsed_log.is_none());
}
