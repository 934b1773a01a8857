//! Amounts typed by users: `--income 80,000`, `--amount "€ 1,000"`.
//!
//! Both entry points accept commas as thousand separators and one leading
//! currency symbol. They differ only in what blank or non-numeric text means.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::trace;

/// Prefixes dropped before parsing. `NZ$` comes before `$` so it wins.
const CURRENCY_SYMBOLS: [&str; 4] = ["NZ$", "$", "€", "£"];

#[derive(Debug, Error)]
#[error("'{input}' is not an amount: {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

fn amount_digits(text: &str) -> String {
    let text = text.trim();
    let unprefixed = CURRENCY_SYMBOLS
        .iter()
        .find_map(|symbol| text.strip_prefix(symbol))
        .unwrap_or(text);
    unprefixed.trim().replace(',', "")
}

/// Amount from a command-line flag or settings file.
///
/// Blank text is zero. Range checks (negative income and the like) belong to
/// the calculators, not here.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let digits = amount_digits(s);
    if digits.is_empty() {
        return Ok(Decimal::ZERO);
    }
    digits.parse().map_err(|source| ParseDecimalError {
        input: s.to_string(),
        source,
    })
}

/// Amount from the converter field, where blank and garbled text both mean
/// "nothing to convert".
pub fn parse_optional_decimal(s: &str) -> Option<Decimal> {
    let digits = amount_digits(s);
    if digits.is_empty() {
        return None;
    }
    match digits.parse() {
        Ok(amount) => Some(amount),
        Err(err) => {
            trace!(input = %s, %err, "not an amount");
            None
        }
    }
}
