//! Progressive income tax over a bracket table.
//!
//! Each bracket taxes only the slice of income that falls inside it:
//!
//! ```text
//! tax = Σ max(0, min(income, upper) - lower) × rate / 100
//! ```
//!
//! On top of income tax the calculator applies an optional flat levy
//! percentage (ACC levy, pension contributions, social charges) and an
//! optional flat deduction amount, then derives net income and the
//! effective rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use expat_core::calculations::{ProgressiveTaxCalculator, TaxCalculationInput};
//! use expat_core::{BracketTable, TaxBracket};
//!
//! let table = BracketTable::new(vec![
//!     TaxBracket::new(dec!(0), Some(dec!(14000)), dec!(10.5), "Low income"),
//!     TaxBracket::new(dec!(14000), Some(dec!(48000)), dec!(17.5), "Middle income"),
//!     TaxBracket::new(dec!(48000), Some(dec!(70000)), dec!(30), "Upper middle"),
//!     TaxBracket::new(dec!(70000), None, dec!(33), "High income"),
//! ])
//! .unwrap();
//!
//! let calculator = ProgressiveTaxCalculator::new(&table);
//! let result = calculator
//!     .calculate(&TaxCalculationInput::gross(dec!(80000)))
//!     .unwrap();
//!
//! assert_eq!(result.tax_amount, dec!(17320));
//! assert_eq!(result.net_income, dec!(62680));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::BracketTable;
use crate::calculations::common::{AmountOverflow, add, percent_of, ratio_percent};

/// Errors that can occur during a tax calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxCalculationError {
    /// Gross income below zero is outside the calculator's contract.
    #[error("gross income must not be negative, got {0}")]
    NegativeIncome(Decimal),

    #[error("flat deduction must not be negative, got {0}")]
    NegativeDeduction(Decimal),

    #[error("levy rate {0}% is outside 0-100")]
    LevyRateOutOfRange(Decimal),

    #[error(transparent)]
    Overflow(#[from] AmountOverflow),
}

/// Inputs for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxCalculationInput {
    /// Gross annual income in the table's currency.
    pub gross_income: Decimal,

    /// Flat levy percentage of gross income, charged on top of income tax.
    pub levy_rate: Decimal,

    /// Flat amount deducted from take-home pay.
    pub flat_deduction: Decimal,
}

impl TaxCalculationInput {
    /// Income tax only: no levy, no flat deduction.
    pub fn gross(gross_income: Decimal) -> Self {
        Self {
            gross_income,
            ..Default::default()
        }
    }
}

/// Tax charged inside a single bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub label: String,
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
}

/// Result of a calculation. Amounts are exact; round for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub gross_income: Decimal,

    /// Income tax from the bracket table.
    pub tax_amount: Decimal,

    /// Flat levy charged on gross income.
    pub levy_amount: Decimal,

    pub flat_deduction: Decimal,

    /// Tax + levy + flat deduction.
    pub total_deductions: Decimal,

    pub net_income: Decimal,

    /// Total deductions as a percentage of gross income; zero when income is zero.
    pub effective_rate: Decimal,

    /// Marginal rate of the bracket the last unit of income falls in.
    pub marginal_rate: Decimal,

    /// Brackets with a positive taxable slice, lowest first.
    pub breakdown: Vec<BracketTax>,
}

/// Calculator bound to one bracket table.
#[derive(Debug, Clone)]
pub struct ProgressiveTaxCalculator<'a> {
    table: &'a BracketTable,
}

impl<'a> ProgressiveTaxCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Runs the full calculation.
    ///
    /// # Errors
    ///
    /// Returns [`TaxCalculationError`] if the income or the flat deduction is
    /// negative, the levy rate is outside 0-100, or an amount is too large
    /// to represent.
    pub fn calculate(
        &self,
        input: &TaxCalculationInput,
    ) -> Result<TaxCalculationResult, TaxCalculationError> {
        self.validate(input)?;

        let income = input.gross_income;
        let breakdown = self.breakdown(income)?;
        let tax_amount = self.tax_amount(&breakdown)?;
        let levy_amount = percent_of(income, input.levy_rate)?;
        let total_deductions = add(add(tax_amount, levy_amount)?, input.flat_deduction)?;
        let net_income = income - total_deductions;
        let effective_rate = ratio_percent(total_deductions, income)?;

        trace!(%income, %tax_amount, %levy_amount, %effective_rate, "tax calculated");

        Ok(TaxCalculationResult {
            gross_income: income,
            tax_amount,
            levy_amount,
            flat_deduction: input.flat_deduction,
            total_deductions,
            net_income,
            effective_rate,
            marginal_rate: self.table.marginal_bracket(income).rate,
            breakdown,
        })
    }

    /// Income tax alone, without levies or deductions.
    pub fn tax_on(
        &self,
        income: Decimal,
    ) -> Result<Decimal, TaxCalculationError> {
        if income < Decimal::ZERO {
            return Err(TaxCalculationError::NegativeIncome(income));
        }
        Ok(self.tax_amount(&self.breakdown(income)?)?)
    }

    fn validate(
        &self,
        input: &TaxCalculationInput,
    ) -> Result<(), TaxCalculationError> {
        if input.gross_income < Decimal::ZERO {
            return Err(TaxCalculationError::NegativeIncome(input.gross_income));
        }
        if input.flat_deduction < Decimal::ZERO {
            return Err(TaxCalculationError::NegativeDeduction(input.flat_deduction));
        }
        if input.levy_rate < Decimal::ZERO || input.levy_rate > Decimal::ONE_HUNDRED {
            return Err(TaxCalculationError::LevyRateOutOfRange(input.levy_rate));
        }
        Ok(())
    }

    /// Per-bracket tax for every bracket the income reaches.
    fn breakdown(
        &self,
        income: Decimal,
    ) -> Result<Vec<BracketTax>, AmountOverflow> {
        self.table
            .brackets()
            .iter()
            .map(|bracket| (bracket, bracket.taxable_slice(income)))
            .filter(|(_, taxable_amount)| *taxable_amount > Decimal::ZERO)
            .map(|(bracket, taxable_amount)| {
                Ok(BracketTax {
                    label: bracket.label.clone(),
                    lower_bound: bracket.lower_bound,
                    upper_bound: bracket.upper_bound,
                    rate: bracket.rate,
                    taxable_amount,
                    tax_amount: percent_of(taxable_amount, bracket.rate)?,
                })
            })
            .collect()
    }

    fn tax_amount(
        &self,
        breakdown: &[BracketTax],
    ) -> Result<Decimal, AmountOverflow> {
        breakdown
            .iter()
            .try_fold(Decimal::ZERO, |total, b| add(total, b.tax_amount))
    }
}
