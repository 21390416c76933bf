#![allow(missing_docs)]

pub use account::*;
pub use block::*;
pub use bridge::*;
pub use home::*;
pub use log::*;
pub use nft::*;
pub use page::*;
pub use stats::*;
pub use token::*;
pub use transaction::*;
pub use transfer::*;

mod account;
mod block;
mod bridge;
mod home;
mod log;
mod nft;
mod page;
mod stats;
mod token;
mod transaction;
mod transfer;

/// Timestamp used for anything that is not yet in a block, or whose time the
/// backend did not report.
pub const PENDING_TIMESTAMP: i64 = -1;
