use serde::Serialize;

use crate::{Block, Transaction};

/// Chain-wide counters shown on the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeStatistic {
    pub account_count: u64,
    pub block_count: u64,
    pub transaction_count: u64,
    /// kept as a decimal string
    pub tps: String,
}

/// The home page: latest blocks, latest transactions and counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Home {
    pub blocks: Vec<Block>,
    pub transactions: Vec<Transaction>,
    pub statistic: HomeStatistic,
}
