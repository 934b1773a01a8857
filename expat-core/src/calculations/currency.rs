//! Bidirectional conversion against a single exchange rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ExchangeRate;
use crate::calculations::common::{AmountOverflow, mul, round_half_up};
use crate::utils::parse_optional_decimal;

/// Which way a user-typed amount is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Base currency in, quote currency out.
    ToQuote,
    /// Quote currency in, base currency out.
    ToBase,
}

/// Movement of a rate between two fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateTrend {
    Up,
    Down,
    Stable,
}

impl RateTrend {
    pub fn between(
        previous: Decimal,
        current: Decimal,
    ) -> Self {
        if current > previous {
            Self::Up
        } else if current < previous {
            Self::Down
        } else {
            Self::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyConverter {
    rate: ExchangeRate,
}

impl CurrencyConverter {
    pub fn new(rate: ExchangeRate) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> &ExchangeRate {
        &self.rate
    }

    /// Replaces the rate and reports how it moved.
    pub fn refresh(
        &mut self,
        rate: ExchangeRate,
    ) -> RateTrend {
        let trend = RateTrend::between(self.rate.rate(), rate.rate());
        self.rate = rate;
        trend
    }

    pub fn to_quote(
        &self,
        amount: Decimal,
    ) -> Result<Decimal, AmountOverflow> {
        mul(amount, self.rate.rate())
    }

    pub fn to_base(
        &self,
        amount: Decimal,
    ) -> Result<Decimal, AmountOverflow> {
        // rate is positive by construction
        amount.checked_div(self.rate.rate()).ok_or(AmountOverflow)
    }

    pub fn convert(
        &self,
        amount: Decimal,
        direction: Direction,
    ) -> Result<Decimal, AmountOverflow> {
        match direction {
            Direction::ToQuote => self.to_quote(amount),
            Direction::ToBase => self.to_base(amount),
        }
    }

    /// Converts text typed into one side of the converter.
    ///
    /// Empty or unparseable text clears the other side (`Ok(None)`) rather
    /// than raising an error. The result is rounded to cents. Only an amount
    /// too large to convert is an error.
    pub fn convert_input(
        &self,
        text: &str,
        direction: Direction,
    ) -> Result<Option<Decimal>, AmountOverflow> {
        parse_optional_decimal(text)
            .map(|amount| self.convert(amount, direction).map(round_half_up))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn eur_nzd() -> CurrencyConverter {
        CurrencyConverter::new(ExchangeRate::new("EUR", "NZD", dec!(1.65)).unwrap())
    }

    #[test]
    fn to_quote_multiplies() {
        assert_eq!(eur_nzd().to_quote(dec!(1000)), Ok(dec!(1650)));
    }

    #[test]
    fn to_base_divides() {
        assert_eq!(eur_nzd().to_base(dec!(1650)), Ok(dec!(1000)));
    }

    #[test]
    fn convert_input_rounds_to_cents() {
        let converter = eur_nzd();

        assert_eq!(
            converter.convert_input("100", Direction::ToBase),
            Ok(Some(dec!(60.61)))
        );
        assert_eq!(
            converter.convert_input("1,000", Direction::ToQuote),
            Ok(Some(dec!(1650.00)))
        );
    }

    #[test]
    fn convert_input_empty_or_invalid_is_none() {
        let converter = eur_nzd();

        assert_eq!(converter.convert_input("", Direction::ToQuote), Ok(None));
        assert_eq!(converter.convert_input("  ", Direction::ToQuote), Ok(None));
        assert_eq!(converter.convert_input("12abc", Direction::ToBase), Ok(None));
    }

    #[test]
    fn oversized_amount_is_an_error() {
        let converter = eur_nzd();

        assert_eq!(
            converter.convert_input("79228162514264337593543950335", Direction::ToQuote),
            Err(AmountOverflow)
        );
        assert_eq!(converter.to_quote(Decimal::MAX), Err(AmountOverflow));
    }

    #[test]
    fn oversized_reverse_conversion_is_an_error() {
        let converter =
            CurrencyConverter::new(ExchangeRate::new("EUR", "NZD", dec!(0.5)).unwrap());

        assert_eq!(converter.to_base(Decimal::MAX), Err(AmountOverflow));
    }

    #[test]
    fn refresh_reports_trend() {
        let mut converter = eur_nzd();

        let up = converter.refresh(ExchangeRate::new("EUR", "NZD", dec!(1.70)).unwrap());
        let same = converter.refresh(ExchangeRate::new("EUR", "NZD", dec!(1.70)).unwrap());
        let down = converter.refresh(ExchangeRate::new("EUR", "NZD", dec!(1.60)).unwrap());

        assert_eq!(up, RateTrend::Up);
        assert_eq!(same, RateTrend::Stable);
        assert_eq!(down, RateTrend::Down);
        assert_eq!(converter.rate().rate(), dec!(1.60));
    }
}
