use std::fmt::{Display, Formatter};
use std::str::FromStr;

use gwscan_core::feed::RecencyBuffer;
use gwscan_core::*;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::normalize::raw::{RawBlock, RawHome, RawStatistic, RawTransaction};
use crate::{Normalizer, Source};

/// A websocket topic a live view subscribes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// `home:refresh`, latest blocks, transactions and counters
    HomeRefresh,
    /// `blocks:<number>`
    Block(u64),
    /// `accounts:<id>`
    Account(String),
    /// `transactions:<hash>`
    Transaction(String),
    /// `tokens:<id>`
    Token(String),
}

/// A topic string that names no known channel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopicParseError {
    /// missing the `:` separator
    #[error("Topic {0:?} has no `<channel>:<subtopic>` form")]
    Malformed(String),
    /// unknown channel or subtopic
    #[error("Unknown topic {0:?}")]
    Unknown(String),
    /// the block subtopic is not a number
    #[error("Block topic {0:?} is not a block number")]
    BlockNumber(String),
}

impl FromStr for Topic {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (channel, subtopic) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| TopicParseError::Malformed(s.to_owned()))?;
        if subtopic.is_empty() {
            return Err(TopicParseError::Malformed(s.to_owned()));
        }
        match channel {
            "home" if subtopic == "refresh" => Ok(Topic::HomeRefresh),
            "blocks" => subtopic
                .parse()
                .map(Topic::Block)
                .map_err(|_| TopicParseError::BlockNumber(s.to_owned())),
            "accounts" => Ok(Topic::Account(subtopic.to_owned())),
            "transactions" => Ok(Topic::Transaction(subtopic.to_owned())),
            "tokens" => Ok(Topic::Token(subtopic.to_owned())),
            _ => Err(TopicParseError::Unknown(s.to_owned())),
        }
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Topic::HomeRefresh => write!(f, "home:refresh"),
            Topic::Block(number) => write!(f, "blocks:{number}"),
            Topic::Account(id) => write!(f, "accounts:{id}"),
            Topic::Transaction(hash) => write!(f, "transactions:{hash}"),
            Topic::Token(id) => write!(f, "tokens:{id}"),
        }
    }
}

/// The parts of the home page a `home:refresh` push carried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeDelta {
    /// new or updated blocks
    pub blocks: Vec<Block>,
    /// new or updated transactions
    pub transactions: Vec<Transaction>,
    /// replacement counters, when sent
    pub statistic: Option<HomeStatistic>,
}

impl HomeDelta {
    fn from_payload(payload: &Value) -> ExplorerResult<Self> {
        let raw: RawHome = serde_json::from_value(payload.get("data").unwrap_or(payload).clone())?;
        Ok(Self {
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
            statistic: raw.statistic.map(RawStatistic::into_statistic),
        })
    }
}

/// A normalized push.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "topic", content = "data", rename_all = "camelCase")]
pub enum Refreshed {
    /// `home:refresh`
    Home(HomeDelta),
    /// `blocks:<number>`
    Block(Block),
    /// `accounts:<id>`
    Account(Account),
    /// `transactions:<hash>`
    Transaction(Transaction),
    /// `tokens:<id>`
    Token(Udt),
}

impl Normalizer {
    /// Normalize the payload pushed on `topic`. Pushes use the REST shape.
    #[instrument(skip_all, fields(%topic))]
    pub fn refreshed(&self, topic: &Topic, payload: &Value) -> ExplorerResult<Refreshed> {
        let refreshed = match topic {
            Topic::HomeRefresh => Refreshed::Home(HomeDelta::from_payload(payload)?),
            Topic::Block(number) => {
                let block = self.block(Source::Rest, payload)?;
                if block.number != *number {
                    warn!(got = block.number, "Block push for a different block");
                }
                Refreshed::Block(block)
            }
            Topic::Account(_) => Refreshed::Account(self.account(Source::Rest, payload)?),
            Topic::Transaction(_) => {
                Refreshed::Transaction(self.transaction(Source::Rest, payload, None)?)
            }
            Topic::Token(_) => Refreshed::Token(self.token(Source::Rest, payload)?),
        };
        Ok(refreshed)
    }
}

/// The live home page: bounded latest blocks and transactions plus counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeed {
    blocks: RecencyBuffer<Block>,
    transactions: RecencyBuffer<Transaction>,
    statistic: HomeStatistic,
}

impl HomeFeed {
    /// Feed seeded with the initially fetched home page, each list capped at
    /// `capacity`.
    pub fn new(home: Home, capacity: usize) -> Self {
        Self {
            blocks: RecencyBuffer::with_entries(capacity, home.blocks),
            transactions: RecencyBuffer::with_entries(capacity, home.transactions),
            statistic: home.statistic,
        }
    }

    /// Merge a push into the feed.
    pub fn apply(&mut self, delta: HomeDelta) {
        debug!(
            blocks = delta.blocks.len(),
            transactions = delta.transactions.len(),
            statistic = delta.statistic.is_some(),
            "Applying home refresh"
        );
        self.blocks.merge(delta.blocks);
        self.transactions.merge(delta.transactions);
        if let Some(statistic) = delta.statistic {
            self.statistic = statistic;
        }
    }

    /// The current home page.
    pub fn snapshot(&self) -> Home {
        Home {
            blocks: self.blocks.entries().to_vec(),
            transactions: self.transactions.entries().to_vec(),
            statistic: self.statistic.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn topics_round_trip_through_text() {
        for text in [
            "home:refresh",
            "blocks:42",
            "accounts:0x5b38da6a701c568545dcfcb03fcb875f56beddc4",
            "transactions:0xabc",
            "tokens:1",
        ] {
            let topic: Topic = text.parse().unwrap();
            assert_eq!(topic.to_string(), text);
        }
    }

    #[test]
    fn bad_topics() {
        let err = |text: &str| text.parse::<Topic>().unwrap_err();
        assert!(matches!(err("home"), TopicParseError::Malformed(_)));
        assert!(matches!(err("blocks:x"), TopicParseError::BlockNumber(_)));
        assert!(matches!(err("home:other"), TopicParseError::Unknown(_)));
        assert!(matches!(err("blocks:"), TopicParseError::Malformed(_)));
    }

    #[test]
    fn home_refresh_merges_and_caps() {
        let home = Normalizer::default()
            .home(
                Source::Rest,
                &json!({
                    "block_list": [
                        { "number": 2, "hash": "0x02", "timestamp": 20 },
                        { "number": 1, "hash": "0x01", "timestamp": 10 },
                    ],
                    "tx_list": [],
                    "statistic": { "block_count": "2", "tps": "0.1" }
                }),
            )
            .unwrap();
        let mut feed = HomeFeed::new(home, 2);

        let refreshed = Normalizer::default()
            .refreshed(
                &Topic::HomeRefresh,
                &json!({
                    "block_list": [{ "number": 3, "hash": "0x03", "timestamp": 30 }],
                    "tx_list": [{ "hash": "0xpending" }]
                }),
            )
            .unwrap();
        let Refreshed::Home(delta) = refreshed else {
            panic!("expected a home delta");
        };
        assert!(delta.statistic.is_none());
        feed.apply(delta);

        let home = feed.snapshot();
        let numbers: Vec<u64> = home.blocks.iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![3, 2]);
        assert_eq!(home.transactions.len(), 1);
        assert_eq!(home.transactions[0].status, TransactionStatus::Pending);
        assert_eq!(home.statistic.block_count, 2);
        assert_eq!(home.statistic.tps, "0.1");
    }

    #[test]
    fn block_push() {
        let payload = json!({
            "data": {
                "id": "7",
                "type": "block",
                "attributes": { "number": 7, "status": "committed" }
            }
        });
        let topic = "blocks:7".parse().unwrap();
        let refreshed = Normalizer::default().refreshed(&topic, &payload).unwrap();
        match refreshed {
            Refreshed::Block(block) => {
                assert_eq!(block.number, 7);
                assert_eq!(block.status, FinalizeState::Committed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
