use std::str::FromStr;

use ethers_core::types::H160;
use ethers_core::utils::to_checksum;
use thiserror::Error;

/// Strips the '0x' prefix off of hex string so it can be deserialized.
///
/// # Arguments
///
/// * `s` - The hex str
pub fn strip_0x_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Whether `s` contains only hex digits. A `0x` prefix is not hex, strip it
/// first.
pub fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A Hex String of length `N` representing bytes of length `N / 2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexString<const N: usize>(String);

/// 20 byte ethereum style address
pub type AddressString = HexString<40>;
/// 32 byte hash
pub type HashString = HexString<64>;

/// An hex string parsing error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HexStringError {
    /// String was expected to be of a different length
    #[error("Expected string of length {expected}, got {actual}")]
    InvalidStringLength {
        /// expected string length
        expected: usize,
        /// actual string length
        actual: usize,
    },
    /// Provided string was not hex
    #[error("The provided string is not hex: {0:?}")]
    NotHex(String),
}

impl<const N: usize> AsRef<str> for HexString<N> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> HexString<N> {
    /// Instantiate a new HexString from any `AsRef<str>`. Tolerates 0x
    /// prefixing and lowercases the digits.
    pub fn from_string<S: AsRef<str>>(candidate: S) -> Result<Self, HexStringError> {
        let s = strip_0x_prefix(candidate.as_ref());

        if s.len() != N {
            return Err(HexStringError::InvalidStringLength {
                actual: s.len(),
                expected: N,
            });
        }
        if !is_hex(s) {
            return Err(HexStringError::NotHex(s.to_owned()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// The value with a `0x` prefix.
    pub fn prefixed(&self) -> String {
        format!("0x{}", self.0)
    }
}

impl<const N: usize> FromStr for HexString<N> {
    type Err = HexStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl<'de, const N: usize> serde::Deserialize<'de> for HexString<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// Interpret a 32 byte ABI word as an address. The upper 12 bytes must be
/// zero, otherwise the word is not an address.
pub fn word_as_h160(word: &str) -> Option<H160> {
    let word = strip_0x_prefix(word);
    if word.len() != 64 || !is_hex(word) {
        return None;
    }
    let (padding, address) = word.split_at(24);
    if padding.bytes().any(|b| b != b'0') {
        return None;
    }
    let bytes = hex::decode(address).ok()?;
    Some(H160::from_slice(&bytes))
}

/// EIP-55 checksummed rendering of an address.
pub fn checksum_address(address: &H160) -> String {
    to_checksum(address, None)
}

/// Shorten a long value to `head...tail` for display. Values that already fit
/// are returned unchanged.
pub fn truncate_middle(s: &str, head: usize, tail: usize) -> String {
    let count = s.chars().count();
    if count <= head + tail + 3 {
        return s.to_owned();
    }
    let start: String = s.chars().take(head).collect();
    let end: String = s.chars().skip(count - tail).collect();
    format!("{start}...{end}")
}
