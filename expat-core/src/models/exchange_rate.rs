use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeRateError {
    #[error("exchange rate {base}->{quote} must be positive, got {rate}")]
    NonPositive {
        base: String,
        quote: String,
        rate: Decimal,
    },

    #[error("currency code must not be empty")]
    EmptyCurrency,
}

/// `1 base = rate quote`.
///
/// The rate is guaranteed positive, so converting in either direction never
/// divides by zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExchangeRate")]
pub struct ExchangeRate {
    base: String,
    quote: String,
    rate: Decimal,
}

#[derive(Deserialize)]
struct RawExchangeRate {
    base: String,
    quote: String,
    rate: Decimal,
}

impl TryFrom<RawExchangeRate> for ExchangeRate {
    type Error = ExchangeRateError;

    fn try_from(raw: RawExchangeRate) -> Result<Self, Self::Error> {
        Self::new(&raw.base, &raw.quote, raw.rate)
    }
}

impl ExchangeRate {
    /// Currency codes are stored uppercase.
    pub fn new(
        base: &str,
        quote: &str,
        rate: Decimal,
    ) -> Result<Self, ExchangeRateError> {
        let base = base.trim().to_ascii_uppercase();
        let quote = quote.trim().to_ascii_uppercase();
        if base.is_empty() || quote.is_empty() {
            return Err(ExchangeRateError::EmptyCurrency);
        }
        if rate <= Decimal::ZERO {
            return Err(ExchangeRateError::NonPositive { base, quote, rate });
        }
        Ok(Self { base, quote, rate })
    }

    /// `1 currency = 1 currency`.
    pub fn identity(currency: &str) -> Result<Self, ExchangeRateError> {
        Self::new(currency, currency, Decimal::ONE)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// The same rate seen from the quote currency.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
            rate: Decimal::ONE / self.rate,
        }
    }

    pub fn is_pair(
        &self,
        base: &str,
        quote: &str,
    ) -> bool {
        self.base.eq_ignore_ascii_case(base.trim()) && self.quote.eq_ignore_ascii_case(quote.trim())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_uppercases_codes() {
        let rate = ExchangeRate::new("eur", " nzd", dec!(1.65)).unwrap();

        assert_eq!(rate.base(), "EUR");
        assert_eq!(rate.quote(), "NZD");
        assert!(rate.is_pair("EUR", "nzd"));
    }

    #[test]
    fn rejects_zero_rate() {
        let result = ExchangeRate::new("EUR", "NZD", dec!(0));

        assert_eq!(
            result,
            Err(ExchangeRateError::NonPositive {
                base: "EUR".to_string(),
                quote: "NZD".to_string(),
                rate: dec!(0),
            })
        );
    }

    #[test]
    fn rejects_negative_rate() {
        assert!(ExchangeRate::new("EUR", "NZD", dec!(-1.65)).is_err());
    }

    #[test]
    fn rejects_empty_currency() {
        assert_eq!(
            ExchangeRate::new("", "NZD", dec!(1)),
            Err(ExchangeRateError::EmptyCurrency)
        );
    }

    #[test]
    fn inverse_swaps_pair() {
        let rate = ExchangeRate::new("EUR", "NZD", dec!(2)).unwrap();
        let inverse = rate.inverse();

        assert_eq!(inverse.base(), "NZD");
        assert_eq!(inverse.quote(), "EUR");
        assert_eq!(inverse.rate(), dec!(0.5));
    }
}
