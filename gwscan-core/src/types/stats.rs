use serde::Serialize;

/// One day of chain statistics, as consumed by the charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    /// `YYYY-MM-DD`
    pub date: String,
    pub avg_block_size: String,
    pub avg_block_time: String,
    pub avg_gas_limit: String,
    pub avg_gas_used: String,
    pub erc20_transfer_count: u64,
    pub total_block_count: u64,
    pub total_txn: u64,
}
