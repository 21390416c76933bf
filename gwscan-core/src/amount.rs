//! Integer token amounts are scaled by `10^decimals` with exact decimal
//! arithmetic and rendered with thousands separators. Floats never appear on
//! this path.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::Sign;
use num_traits::Zero;
use thiserror::Error;
use tracing::warn;

/// An amount that could not be read as a decimal number.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid amount {0:?}")]
pub struct InvalidAmount(pub String);

/// Largest decimal exponent, either direction, an amount may carry once
/// scaled. Rendering pads with this many zeros at most.
pub const MAX_SCALE: u64 = 512;

/// Scale a raw on-chain amount down by `10^decimals`.
pub fn scale_amount(raw: &str, decimals: u32) -> Result<BigDecimal, InvalidAmount> {
    let raw = raw.trim();
    let value = BigDecimal::from_str(raw).map_err(|_| InvalidAmount(raw.to_owned()))?;
    let (digits, exponent) = value.as_bigint_and_exponent();
    let scale = exponent
        .checked_add(i64::from(decimals))
        .filter(|scale| scale.unsigned_abs() <= MAX_SCALE)
        .ok_or_else(|| InvalidAmount(raw.to_owned()))?;
    Ok(BigDecimal::new(digits, scale))
}

/// Display options for an amount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountFormat {
    /// decimals of the token the amount is denominated in
    pub decimals: u32,
    /// symbol appended after a space
    pub symbol: Option<String>,
    /// truncate the fraction to this many digits
    pub max_fraction_digits: Option<u32>,
    /// render without thousands separators
    pub plain: bool,
}

impl AmountFormat {
    /// Format for a token with the given decimals.
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals,
            ..Default::default()
        }
    }

    /// Append `symbol` to the rendered value.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Keep at most `digits` fraction digits, rounding toward zero.
    pub fn with_max_fraction_digits(mut self, digits: u32) -> Self {
        self.max_fraction_digits = Some(digits);
        self
    }

    /// Drop thousands separators.
    pub fn plain(mut self) -> Self {
        self.plain = true;
        self
    }

    /// Render `raw`. Missing, empty and unreadable amounts render as zero.
    pub fn format(&self, raw: Option<&str>) -> String {
        let value = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => BigDecimal::zero(),
            Some(raw) => match scale_amount(raw, self.decimals) {
                Ok(value) => value,
                Err(err) => {
                    warn!(%err, "Rendering unreadable amount as zero");
                    BigDecimal::zero()
                }
            },
        };
        let number = self.render(&value);
        match &self.symbol {
            Some(symbol) if !symbol.is_empty() => format!("{number} {symbol}"),
            _ => number,
        }
    }

    fn render(&self, value: &BigDecimal) -> String {
        let (digits, scale) = value.as_bigint_and_exponent();
        let negative = digits.sign() == Sign::Minus;
        let magnitude = digits.magnitude().to_string();

        let (int_part, mut frac_part) = if scale <= 0 {
            let zeros = "0".repeat(scale.unsigned_abs() as usize);
            (format!("{magnitude}{zeros}"), String::new())
        } else {
            let scale = scale as usize;
            let padded = if magnitude.len() <= scale {
                format!("{}{magnitude}", "0".repeat(scale + 1 - magnitude.len()))
            } else {
                magnitude
            };
            let (i, f) = padded.split_at(padded.len() - scale);
            (i.to_owned(), f.to_owned())
        };

        if let Some(max) = self.max_fraction_digits {
            frac_part.truncate(max as usize);
        }
        let frac_part = frac_part.trim_end_matches('0');
        let int_part = match int_part.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };
        let int_part = if self.plain {
            int_part.to_owned()
        } else {
            group_thousands(int_part)
        };

        let is_zero = int_part == "0" && frac_part.is_empty();
        let sign = if negative && !is_zero { "-" } else { "" };
        if frac_part.is_empty() {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac_part}")
        }
    }
}

/// Render `raw` scaled by `decimals`, optionally suffixed with `symbol`.
pub fn format_amount(raw: Option<&str>, decimals: u32, symbol: Option<&str>) -> String {
    let format = AmountFormat::new(decimals);
    match symbol {
        Some(symbol) => format.with_symbol(symbol).format(raw),
        None => format.format(raw),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
