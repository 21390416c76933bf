use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use gwscan_base::Source;

#[derive(Parser, Debug)]
#[command(name = "gwscan", version, about = "Godwoken explorer view-model tooling")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a raw REST or GraphQL payload into its view model
    Normalize(NormalizeArgs),
    /// Decode an event log against a contract ABI
    DecodeLog(DecodeLogArgs),
    /// Render a raw token amount
    FormatAmount(FormatAmountArgs),
    /// Compute the pagination links of a list
    Paginate(PaginateArgs),
}

/// Entity a payload holds.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    Block,
    Transaction,
    Account,
    Token,
    Transfer,
    Bridged,
    DailyStats,
    Home,
    Search,
    Logs,
    Nft,
}

#[derive(ClapArgs, Debug)]
pub struct NormalizeArgs {
    /// Entity the payload holds
    #[arg(long)]
    pub kind: PayloadKind,

    /// Backend the payload came from: rest or graphql
    #[arg(long, default_value = "graphql")]
    pub source: Source,

    /// Hash the transaction was requested by, to detect godwoken hashes
    #[arg(long)]
    pub hash: Option<String>,

    /// Contract ABI used to decode logs
    #[arg(long)]
    pub abi: Option<PathBuf>,

    /// JSON payload file
    pub file: PathBuf,
}

#[derive(ClapArgs, Debug)]
pub struct DecodeLogArgs {
    /// Contract ABI JSON file; without one the log is shown raw
    #[arg(long)]
    pub abi: Option<PathBuf>,

    /// Log JSON file, in the backend's shape
    #[arg(long)]
    pub log: PathBuf,

    /// Backend shape of the log file. The default also reads a bare log
    /// object
    #[arg(long, default_value = "rest")]
    pub source: Source,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct FormatAmountArgs {
    /// Integer amount in the token's smallest unit
    pub amount: Option<String>,

    /// Token decimals, the native token's when omitted
    #[arg(long)]
    pub decimals: Option<u32>,

    /// Symbol to append; `--native` appends the native token's
    #[arg(long, conflicts_with = "native")]
    pub symbol: Option<String>,

    /// Use the configured native token for decimals and symbol
    #[arg(long)]
    pub native: bool,

    /// Truncate the fraction to this many digits
    #[arg(long)]
    pub max_fraction_digits: Option<u32>,

    /// No thousands separators
    #[arg(long)]
    pub plain: bool,
}

#[derive(ClapArgs, Debug)]
pub struct PaginateArgs {
    /// Total number of entries in the list
    #[arg(long)]
    pub total: u64,

    /// Route of the list
    #[arg(long, default_value = "/txs")]
    pub path: String,

    /// Current query string, e.g. `address_from=0x..&sort=desc`
    #[arg(long, default_value = "")]
    pub query: String,

    /// Requested page
    #[arg(long)]
    pub page: Option<String>,

    /// Requested page size
    #[arg(long)]
    pub page_size: Option<String>,

    /// `before` token returned by a cursor backend
    #[arg(long)]
    pub before: Option<String>,

    /// `after` token returned by a cursor backend
    #[arg(long)]
    pub after: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
