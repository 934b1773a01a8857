//! Calculators behind the destination dashboards.
//!
//! All of them are pure functions of their inputs: no I/O, no shared state.

pub mod common;
pub mod comparison;
pub mod currency;
pub mod progressive;

pub use comparison::{TaxComparison, compare};
pub use currency::{CurrencyConverter, Direction, RateTrend};
pub use progressive::{
    BracketTax, ProgressiveTaxCalculator, TaxCalculationError, TaxCalculationInput,
    TaxCalculationResult,
};
