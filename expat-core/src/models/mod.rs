mod country;
mod exchange_rate;
mod selection;
mod tax_bracket;
mod tax_system;

pub use country::{CountriesPayload, CountryOption, normalize_code};
pub use exchange_rate::{ExchangeRate, ExchangeRateError};
pub use selection::{Action, FormSelection, SelectionError, SelectionField, Situation};
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_system::{Levy, LevyCharge, LevyError, TaxSystem, WorkerType};
