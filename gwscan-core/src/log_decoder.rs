//! Logs are decoded best-effort. With a matching ABI event the arguments are
//! decoded through ethabi; when there is no ABI, no matching event, or the
//! decode fails, every indexed topic and every 32 byte data word becomes a
//! positional slot shown as raw hex. Address typed slots are rendered as
//! addresses in both paths whenever the word actually holds one. Nothing in
//! here returns an error to the caller.

use ethers_core::abi::{Abi, Event, EventParam, ParamType, RawLog, Token};
use ethers_core::types::{H256, I256};
use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::utils::{checksum_address, strip_0x_prefix, word_as_h160, HashString};
use crate::{EventLog, LogSlot, ParsedEventLog, ParsedLog, SlotValue};

/// Hex characters in one ABI word.
pub const WORD_HEX_LEN: usize = 64;

/// Log data that cannot be split into ABI words.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordSplitError {
    /// Data contains non hex characters
    #[error("Log data is not hex: {0:?}")]
    NotHex(String),
    /// Data length is not a multiple of a word
    #[error("Log data has {0} hex characters, not a multiple of 64")]
    Misaligned(usize),
}

/// Split `0x` prefixed log data into 64 character words.
pub fn split_words(data: &str) -> Result<Vec<&str>, WordSplitError> {
    let data = strip_0x_prefix(data);
    if !data.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(WordSplitError::NotHex(data.to_owned()));
    }
    if data.len() % WORD_HEX_LEN != 0 {
        return Err(WordSplitError::Misaligned(data.len()));
    }
    Ok((0..data.len())
        .step_by(WORD_HEX_LEN)
        .map(|start| &data[start..start + WORD_HEX_LEN])
        .collect())
}

#[derive(Debug, Error)]
enum DecodeError {
    #[error("Invalid topic {0:?}")]
    InvalidTopic(String),
    #[error("Invalid log data: {0}")]
    Data(#[from] hex::FromHexError),
    #[error(transparent)]
    Abi(#[from] ethers_core::abi::Error),
}

/// Decodes event logs against an optional contract ABI.
#[derive(Debug, Clone, Default)]
pub struct LogDecoder {
    abi: Option<Abi>,
}

impl LogDecoder {
    /// Decoder for an already parsed ABI, or none.
    pub fn new(abi: Option<Abi>) -> Self {
        Self { abi }
    }

    /// Decoder for an ABI as stored on a verified contract. A malformed ABI
    /// leaves the decoder in raw mode.
    pub fn from_abi_json(abi: &serde_json::Value) -> Self {
        match serde_json::from_value::<Abi>(abi.clone()) {
            Ok(abi) => Self::new(Some(abi)),
            Err(err) => {
                warn!(%err, "Ignoring malformed contract ABI");
                Self::new(None)
            }
        }
    }

    /// Same as [`LogDecoder::from_abi_json`] for ABI text.
    pub fn from_abi_str(abi: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(abi) {
            Ok(value) => Self::from_abi_json(&value),
            Err(err) => {
                warn!(%err, "Ignoring contract ABI that is not JSON");
                Self::new(None)
            }
        }
    }

    /// Whether an ABI is available.
    pub fn has_abi(&self) -> bool {
        self.abi.is_some()
    }

    /// Decode `log`, never failing.
    #[instrument(level = "trace", skip_all, fields(log = %log.id))]
    pub fn decode(&self, log: EventLog) -> ParsedEventLog {
        let event = match (&self.abi, log.topics.first()) {
            (Some(abi), Some(topic0)) => find_event(abi, topic0),
            _ => None,
        };
        if self.abi.is_some() && event.is_none() {
            debug!(topics = log.topics.len(), "No ABI event matches log");
        }

        let parsed_log = event.and_then(|event| match parse_with(event, &log) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(%err, event = %event.name, "Failed to decode log, showing raw values");
                None
            }
        });
        let slots = match &parsed_log {
            Some(parsed) => parsed.arguments.clone(),
            None => fallback_slots(event, &log),
        };

        ParsedEventLog {
            log,
            parsed_log,
            slots,
        }
    }
}

fn parse_topic(topic: &str) -> Option<H256> {
    let topic = HashString::from_string(topic).ok()?;
    let bytes = hex::decode(topic.as_ref()).ok()?;
    Some(H256::from_slice(&bytes))
}

fn find_event<'a>(abi: &'a Abi, topic0: &str) -> Option<&'a Event> {
    let topic0 = parse_topic(topic0)?;
    abi.events()
        .find(|event| !event.anonymous && event.signature() == topic0)
}

fn event_signature(event: &Event) -> String {
    let kinds = event.inputs.iter().map(|input| &input.kind).join(",");
    format!("{}({kinds})", event.name)
}

fn required_topic(topic: &str) -> Result<H256, DecodeError> {
    match parse_topic(topic) {
        Some(hash) => Ok(hash),
        None => Err(DecodeError::InvalidTopic(topic.to_owned())),
    }
}

fn parse_with(event: &Event, log: &EventLog) -> Result<ParsedLog, DecodeError> {
    let topics = log
        .topics
        .iter()
        .map(|topic| required_topic(topic))
        .collect::<Result<Vec<_>, _>>()?;
    let data = hex::decode(strip_0x_prefix(&log.data))?;
    let decoded = event.parse_log(RawLog { topics, data })?;

    let arguments = event
        .inputs
        .iter()
        .zip(decoded.params)
        .enumerate()
        .map(|(position, (input, param))| LogSlot {
            position,
            name: Some(param.name).filter(|name| !name.is_empty()),
            kind: Some(input.kind.to_string()),
            indexed: input.indexed,
            value: token_value(&param.value),
        })
        .collect();

    Ok(ParsedLog {
        name: event.name.clone(),
        signature: event_signature(event),
        topic: format!("{:#x}", event.signature()),
        arguments,
    })
}

fn fallback_slots(event: Option<&Event>, log: &EventLog) -> Vec<LogSlot> {
    let (indexed_inputs, data_inputs): (Vec<&EventParam>, Vec<&EventParam>) = event
        .map(|event| event.inputs.iter().partition(|input| input.indexed))
        .unwrap_or_default();

    let mut slots: Vec<LogSlot> = log
        .topics
        .iter()
        .skip(1)
        .enumerate()
        .map(|(i, topic)| word_slot(i, topic, indexed_inputs.get(i).copied(), true))
        .collect();

    match split_words(&log.data) {
        Ok(words) => {
            let offset = slots.len();
            for (i, word) in words.into_iter().enumerate() {
                let input = data_inputs.get(i).copied();
                slots.push(word_slot(offset + i, word, input, false));
            }
        }
        Err(err) => {
            warn!(%err, log = %log.id, "Showing log data as a single raw value");
            slots.push(LogSlot {
                position: slots.len(),
                name: None,
                kind: None,
                indexed: false,
                value: SlotValue::Raw(log.data.clone()),
            });
        }
    }
    slots
}

fn word_slot(position: usize, word: &str, input: Option<&EventParam>, indexed: bool) -> LogSlot {
    let value = match input.map(|input| &input.kind) {
        Some(ParamType::Address) => word_as_h160(word)
            .map(|address| SlotValue::Address(checksum_address(&address)))
            .unwrap_or_else(|| SlotValue::Raw(prefixed(word))),
        _ => SlotValue::Raw(prefixed(word)),
    };
    LogSlot {
        position,
        name: input
            .map(|input| input.name.clone())
            .filter(|name| !name.is_empty()),
        kind: input.map(|input| input.kind.to_string()),
        indexed,
        value,
    }
}

fn prefixed(word: &str) -> String {
    format!("0x{}", strip_0x_prefix(word))
}

fn token_value(token: &Token) -> SlotValue {
    match token {
        Token::Address(address) => SlotValue::Address(checksum_address(address)),
        other => SlotValue::Decoded(render_token(other)),
    }
}

/// Human readable rendering of a decoded ABI value.
pub fn render_token(token: &Token) -> String {
    match token {
        Token::Address(address) => checksum_address(address),
        Token::Uint(value) => value.to_string(),
        Token::Int(value) => I256::from_raw(*value).to_string(),
        Token::Bool(value) => value.to_string(),
        Token::String(value) => value.clone(),
        Token::Bytes(bytes) | Token::FixedBytes(bytes) => format!("0x{}", hex::encode(bytes)),
        Token::Array(items) | Token::FixedArray(items) => {
            format!("[{}]", items.iter().map(render_token).join(", "))
        }
        Token::Tuple(items) => format!("({})", items.iter().map(render_token).join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;

    const TRANSFER_TOPIC: &str =
        "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
    const FROM_TOPIC: &str = "0x0000000000000000000000005b38da6a701c568545dcfcb03fcb875f56beddc4";
    const TO_TOPIC: &str = "0x000000000000000000000000ab8483f64d9c6d1ecf9b849ae677dd3315835cb2";
    const VALUE_1000: &str = "0x00000000000000000000000000000000000000000000000000000000000003e8";

    fn erc20_abi() -> serde_json::Value {
        json!([{
            "anonymous": false,
            "type": "event",
            "name": "Transfer",
            "inputs": [
                { "indexed": true, "name": "from", "type": "address" },
                { "indexed": true, "name": "to", "type": "address" },
                { "indexed": false, "name": "value", "type": "uint256" }
            ]
        }])
    }

    fn erc721_abi() -> serde_json::Value {
        json!([{
            "anonymous": false,
            "type": "event",
            "name": "Transfer",
            "inputs": [
                { "indexed": true, "name": "from", "type": "address" },
                { "indexed": true, "name": "to", "type": "address" },
                { "indexed": true, "name": "tokenId", "type": "uint256" }
            ]
        }])
    }

    fn transfer_log(data: &str) -> EventLog {
        EventLog {
            id: "0xabc-0".into(),
            log_index: 0,
            topics: vec![TRANSFER_TOPIC.into(), FROM_TOPIC.into(), TO_TOPIC.into()],
            data: data.into(),
            ..Default::default()
        }
    }

    #[test]
    fn splits_words() {
        assert_eq!(split_words("0x").unwrap(), Vec::<&str>::new());
        assert_eq!(split_words(VALUE_1000).unwrap().len(), 1);
        assert_eq!(
            split_words("0x123").unwrap_err(),
            WordSplitError::Misaligned(3)
        );
        assert_eq!(
            split_words("0xzz"),
            Err(WordSplitError::NotHex("zz".into()))
        );
    }

    #[test]
    fn decodes_erc20_transfer() {
        let decoder = LogDecoder::from_abi_json(&erc20_abi());
        let decoded = decoder.decode(transfer_log(VALUE_1000));

        let parsed = decoded.parsed_log.expect("decoded");
        assert_eq!(parsed.name, "Transfer");
        assert_eq!(parsed.signature, "Transfer(address,address,uint256)");
        assert_eq!(parsed.topic, TRANSFER_TOPIC);
        // two indexed inputs plus one data input
        assert_eq!(parsed.arguments.len(), 3);
        assert_eq!(
            parsed.arguments[0].value,
            SlotValue::Address("0x5B38Da6a701c568545dCfcB03FcB875f56beddC4".into())
        );
        match &parsed.arguments[1].value {
            SlotValue::Address(to) => assert_eq!(
                to.to_lowercase(),
                "0xab8483f64d9c6d1ecf9b849ae677dd3315835cb2"
            ),
            other => panic!("expected address, got {other:?}"),
        }
        assert_eq!(
            parsed.arguments[2].value,
            SlotValue::Decoded("1000".into())
        );
        assert_eq!(parsed.arguments[2].name.as_deref(), Some("value"));
        assert_eq!(decoded.slots, parsed.arguments);
    }

    #[traced_test]
    #[test]
    fn odd_data_falls_back_to_raw() {
        let decoder = LogDecoder::from_abi_json(&erc20_abi());
        let decoded = decoder.decode(transfer_log("0x3e8"));

        assert!(decoded.parsed_log.is_none());
        assert_eq!(decoded.slots.len(), 3);
        assert!(matches!(decoded.slots[0].value, SlotValue::Address(_)));
        assert!(matches!(decoded.slots[1].value, SlotValue::Address(_)));
        assert_eq!(decoded.slots[2].value, SlotValue::Raw("0x3e8".into()));
        assert!(logs_contain("Failed to decode log"));
    }

    #[test]
    fn mismatched_indexing_falls_back_per_slot() {
        // ERC-721 declares tokenId indexed, an ERC-20 log carries it in data
        let decoder = LogDecoder::from_abi_json(&erc721_abi());
        let decoded = decoder.decode(transfer_log(VALUE_1000));

        assert!(decoded.parsed_log.is_none());
        assert_eq!(decoded.slots.len(), 3);
        assert_eq!(decoded.slots[0].name.as_deref(), Some("from"));
        assert!(matches!(decoded.slots[1].value, SlotValue::Address(_)));
        assert_eq!(decoded.slots[2].value, SlotValue::Raw(VALUE_1000.into()));
        assert!(!decoded.slots[2].indexed);
    }

    #[test]
    fn no_abi_is_all_raw() {
        let decoded = LogDecoder::default().decode(transfer_log(VALUE_1000));
        assert!(decoded.parsed_log.is_none());
        assert_eq!(decoded.slots.len(), 3);
        assert!(decoded
            .slots
            .iter()
            .all(|slot| matches!(slot.value, SlotValue::Raw(_))));
        assert_eq!(decoded.slots[0].value, SlotValue::Raw(FROM_TOPIC.into()));
    }

    #[test]
    fn malformed_abi_is_ignored() {
        let decoder = LogDecoder::from_abi_str("{ not json");
        assert!(!decoder.has_abi());
        let decoder = LogDecoder::from_abi_json(&json!({ "type": "event" }));
        assert!(!decoder.has_abi());
        assert_eq!(decoder.decode(transfer_log("0x")).slots.len(), 2);
    }

    #[test]
    fn renders_tokens() {
        assert_eq!(render_token(&Token::Bool(true)), "true");
        assert_eq!(render_token(&Token::Bytes(vec![0xde, 0xad])), "0xdead");
        let array = Token::Array(vec![Token::Uint(1u64.into()), Token::Uint(2u64.into())]);
        assert_eq!(render_token(&array), "[1, 2]");
        assert_eq!(render_token(&Token::Int(I256::from(-5).into_raw())), "-5");
    }
}
