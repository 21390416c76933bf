//! gwscan core. Typed view models for the Godwoken explorer and the pure
//! logic that derives them: amount formatting, pagination, event-log
//! decoding, account dispatch and live-feed merging.
//!
//! Nothing in this crate performs I/O. Raw payloads are shaped into these
//! types by `gwscan-base`.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]
#![forbid(unsafe_code)]

pub use error::*;
pub use types::*;

/// Config parsing helpers shared by every settings block
pub mod config;
/// Utilities for hex strings and display helpers
pub mod utils;

/// Token amount formatting
pub mod amount;
/// Selection of the account view branch
pub mod dispatch;
/// Bounded, recency ordered collections for live updates
pub mod feed;
/// ABI based event log decoding with raw hex fallback
pub mod log_decoder;
/// Cursor and numeric pagination
pub mod pagination;
/// List view query-string parameters
pub mod query;
/// Search keyword classification
pub mod search;

mod error;
mod types;
