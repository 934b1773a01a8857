use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::BracketTable;
use crate::calculations::TaxCalculationInput;
use crate::calculations::common::{AmountOverflow, percent_of};

/// How the user intends to work in the destination country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkerType {
    #[default]
    Employee,
    Freelance,
    BusinessOwner,
}

impl WorkerType {
    pub fn all() -> &'static [WorkerType] {
        &[
            WorkerType::Employee,
            WorkerType::Freelance,
            WorkerType::BusinessOwner,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Freelance => "freelance",
            Self::BusinessOwner => "business-owner",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Freelance => "Freelance (contractor)",
            Self::BusinessOwner => "Business owner",
        }
    }
}

impl fmt::Display for WorkerType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "freelance" | "freelancer" | "contractor" => Ok(Self::Freelance),
            "business-owner" | "business_owner" | "owner" => Ok(Self::BusinessOwner),
            other => Err(format!("unknown worker type '{other}'")),
        }
    }
}

/// A flat percentage of gross income charged on top of income tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Levy {
    pub name: String,
    pub rate: Decimal,
    /// Worker types this levy applies to. Empty means every worker type.
    #[serde(default)]
    pub applies_to: Vec<WorkerType>,
}

impl Levy {
    pub fn universal(
        name: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            rate,
            applies_to: Vec::new(),
        }
    }

    pub fn for_workers(
        name: impl Into<String>,
        rate: Decimal,
        applies_to: &[WorkerType],
    ) -> Self {
        Self {
            name: name.into(),
            rate,
            applies_to: applies_to.to_vec(),
        }
    }

    pub fn applies(
        &self,
        worker_type: WorkerType,
    ) -> bool {
        self.applies_to.is_empty() || self.applies_to.contains(&worker_type)
    }
}

/// One levy applied to a gross income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyCharge {
    pub name: String,
    pub rate: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevyError {
    #[error("{country} has no levy named '{name}'")]
    UnknownLevy { country: String, name: String },

    #[error("levy rate must be between 0 and 100, got {0}")]
    RateOutOfRange(Decimal),
}

/// Everything needed to estimate take-home pay in one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSystem {
    pub country_code: String,
    pub country_name: String,
    pub currency: String,
    pub table: BracketTable,
    #[serde(default)]
    pub levies: Vec<Levy>,
}

impl TaxSystem {
    /// Levies charged to `worker_type`, in table order.
    pub fn levies_for(
        &self,
        worker_type: WorkerType,
    ) -> impl Iterator<Item = &Levy> {
        self.levies.iter().filter(move |l| l.applies(worker_type))
    }

    /// Sum of the levy rates charged to `worker_type`, in percent.
    pub fn levy_rate_for(
        &self,
        worker_type: WorkerType,
    ) -> Decimal {
        self.levies_for(worker_type).map(|l| l.rate).sum()
    }

    /// Each levy charged to `worker_type` on `gross_income`, unrounded.
    ///
    /// The amounts add up to the calculator's levy amount for the same input.
    pub fn levy_charges(
        &self,
        worker_type: WorkerType,
        gross_income: Decimal,
    ) -> Result<Vec<LevyCharge>, AmountOverflow> {
        self.levies_for(worker_type)
            .map(|levy| {
                Ok(LevyCharge {
                    name: levy.name.clone(),
                    rate: levy.rate,
                    amount: percent_of(gross_income, levy.rate)?,
                })
            })
            .collect()
    }

    /// Replaces the rate of the levy called `name` (case-insensitive).
    pub fn set_levy_rate(
        &mut self,
        name: &str,
        rate: Decimal,
    ) -> Result<(), LevyError> {
        if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
            return Err(LevyError::RateOutOfRange(rate));
        }

        let levy = self
            .levies
            .iter_mut()
            .find(|l| l.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| LevyError::UnknownLevy {
                country: self.country_name.clone(),
                name: name.trim().to_string(),
            })?;
        levy.rate = rate;
        Ok(())
    }

    /// Calculator input for `worker_type`, with that worker's levies applied.
    pub fn input_for(
        &self,
        worker_type: WorkerType,
        gross_income: Decimal,
        flat_deduction: Decimal,
    ) -> TaxCalculationInput {
        TaxCalculationInput {
            gross_income,
            levy_rate: self.levy_rate_for(worker_type),
            flat_deduction,
        }
    }
}
