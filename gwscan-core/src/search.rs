use serde::Serialize;

use crate::utils::{is_hex, strip_0x_prefix};
use crate::Redirect;

/// What a search keyword looks like before asking the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Keyword {
    /// decimal block number
    BlockNumber(u64),
    /// 32 byte hash: block, transaction or script hash
    Hash(String),
    /// 20 byte address
    Address(String),
    /// anything else is looked up as a token name
    TokenName(String),
}

impl Keyword {
    /// Classify a user supplied keyword. Hex keywords are lowercased and
    /// `0x` prefixed. Blank input yields `None`.
    pub fn classify(raw: &str) -> Option<Self> {
        let keyword = raw.trim();
        if keyword.is_empty() {
            return None;
        }
        if keyword.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(number) = keyword.parse() {
                return Some(Keyword::BlockNumber(number));
            }
        }
        let digits = strip_0x_prefix(keyword);
        if digits.len() != keyword.len() && is_hex(digits) {
            let normalized = format!("0x{}", digits.to_ascii_lowercase());
            match digits.len() {
                64 => return Some(Keyword::Hash(normalized)),
                40 => return Some(Keyword::Address(normalized)),
                _ => {}
            }
        }
        Some(Keyword::TokenName(keyword.to_owned()))
    }
}

/// Where a resolved search sends the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum SearchTarget {
    /// block number or hash
    Block(String),
    /// eth hash when the transaction has one
    Transaction(String),
    /// eth address or script hash
    Account(String),
    /// udt id
    Token(String),
}

impl SearchTarget {
    /// Route of the target's page.
    pub fn redirect(&self) -> Redirect {
        match self {
            SearchTarget::Block(id) => Redirect::path(format!("/block/{id}")),
            SearchTarget::Transaction(hash) => Redirect::path(format!("/tx/{hash}")),
            SearchTarget::Account(id) => Redirect::path(format!("/account/{id}")),
            SearchTarget::Token(id) => Redirect::path(format!("/token/{id}")),
        }
    }

    /// Fallback for a token name the backend did not resolve: the token list
    /// filtered by that name.
    pub fn token_list(name: &str) -> Redirect {
        Redirect::new("/tokens/bridged", [("name", name)])
    }
}
