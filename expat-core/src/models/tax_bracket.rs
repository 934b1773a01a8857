use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A contiguous income range taxed at a single marginal rate.
///
/// `rate` is a percentage (`10.5` means 10.5 %). An `upper_bound` of `None`
/// means the bracket is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub label: String,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
            label: label.into(),
        }
    }

    /// The part of `income` that falls inside this bracket.
    ///
    /// An unbounded bracket is capped at `income` itself.
    pub fn taxable_slice(
        &self,
        income: Decimal,
    ) -> Decimal {
        let upper = self.upper_bound.unwrap_or(income);
        (income.min(upper) - self.lower_bound).max(Decimal::ZERO)
    }
}

/// Reasons a bracket table is rejected at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("first bracket must start at 0, found {0}")]
    FirstBracketNotAtZero(Decimal),

    #[error("bracket {index} has lower bound {lower} not below upper bound {upper}")]
    InvertedBounds {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("bracket {index} starts at {found} but the previous bracket ends at {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd(usize),

    #[error("last bracket must be unbounded")]
    LastBracketBounded,

    #[error("bracket {index} has rate {rate}% outside 0-100")]
    RateOutOfRange { index: usize, rate: Decimal },
}

/// An ordered, validated list of [`TaxBracket`]s.
///
/// Every table covers `[0, ∞)` with no gaps or overlaps, so every
/// non-negative income falls in exactly one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates `brackets` and builds a table.
    ///
    /// # Errors
    ///
    /// Returns the first [`BracketTableError`] found while walking the
    /// brackets in order.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if first.lower_bound != Decimal::ZERO {
            return Err(BracketTableError::FirstBracketNotAtZero(first.lower_bound));
        }

        let last_index = brackets.len() - 1;
        let hundred = Decimal::ONE_HUNDRED;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > hundred {
                return Err(BracketTableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }

            match bracket.upper_bound {
                Some(upper) if upper <= bracket.lower_bound => {
                    return Err(BracketTableError::InvertedBounds {
                        index,
                        lower: bracket.lower_bound,
                        upper,
                    });
                }
                Some(_) if index == last_index => {
                    return Err(BracketTableError::LastBracketBounded);
                }
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedBeforeEnd(index));
                }
                _ => {}
            }

            if let Some(next) = brackets.get(index + 1) {
                // upper_bound is Some here: the None case returned above
                let expected = bracket.upper_bound.unwrap_or(bracket.lower_bound);
                if next.lower_bound != expected {
                    return Err(BracketTableError::NotContiguous {
                        index: index + 1,
                        expected,
                        found: next.lower_bound,
                    });
                }
            }
        }

        Ok(Self { brackets })
    }

    /// A single unbounded bracket at `rate` percent.
    pub fn flat(rate: Decimal) -> Result<Self, BracketTableError> {
        Self::new(vec![TaxBracket::new(Decimal::ZERO, None, rate, "Flat rate")])
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Highest marginal rate in the table.
    pub fn top_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// The bracket containing `income`.
    ///
    /// Bracket bounds are treated as `(lower, upper]`, so an income exactly
    /// on a boundary belongs to the lower bracket.
    pub fn marginal_bracket(
        &self,
        income: Decimal,
    ) -> &TaxBracket {
        self.brackets
            .iter()
            .find(|b| b.upper_bound.is_none_or(|upper| income <= upper))
            .unwrap_or_else(|| &self.brackets[self.brackets.len() - 1])
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}
