//! Side-by-side tax burden between the home and destination countries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ExchangeRate;
use crate::calculations::common::{AmountOverflow, mul};
use crate::calculations::progressive::TaxCalculationResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComparison {
    /// Home total deductions converted into the destination currency.
    pub home_burden: Decimal,

    /// Destination total deductions, in the destination currency.
    pub destination_burden: Decimal,

    /// Absolute gap between the two burdens, in the destination currency.
    pub difference: Decimal,

    /// `difference / 12`.
    pub monthly_difference: Decimal,

    /// True when moving lowers the burden.
    pub is_saving: bool,

    /// Absolute gap between the effective rates, in percentage points.
    pub effective_rate_gap: Decimal,
}

/// Compares two results, converting the home side with `home_to_destination`
/// (`1 home currency = rate destination currency`).
pub fn compare(
    home: &TaxCalculationResult,
    destination: &TaxCalculationResult,
    home_to_destination: &ExchangeRate,
) -> Result<TaxComparison, AmountOverflow> {
    let home_burden = mul(home.total_deductions, home_to_destination.rate())?;
    let destination_burden = destination.total_deductions;
    let signed = home_burden - destination_burden;
    let difference = signed.abs();

    Ok(TaxComparison {
        home_burden,
        destination_burden,
        difference,
        monthly_difference: difference / Decimal::from(12),
        is_saving: signed > Decimal::ZERO,
        effective_rate_gap: (home.effective_rate - destination.effective_rate).abs(),
    })
}
