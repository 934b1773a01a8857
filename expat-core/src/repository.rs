use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CountryOption, ExchangeRate, TaxSystem};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("invalid record: {0}")]
    Invalid(String),
}

/// Reference data the dashboards read: tax systems, countries and exchange rates.
///
/// Country codes are matched case-insensitively; currency codes likewise.
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    // Tax systems
    async fn get_tax_system(&self, country_code: &str) -> Result<TaxSystem, RepositoryError>;
    async fn list_tax_systems(&self) -> Result<Vec<TaxSystem>, RepositoryError>;

    /// Inserts or replaces the tax system for `system.country_code`.
    async fn put_tax_system(&self, system: TaxSystem) -> Result<(), RepositoryError>;

    // Countries
    async fn list_countries(&self) -> Result<Vec<CountryOption>, RepositoryError>;

    /// Looks a country up by code or by name.
    async fn find_country(&self, key: &str) -> Result<CountryOption, RepositoryError>;

    /// Replaces the whole country list.
    async fn replace_countries(
        &self,
        countries: Vec<CountryOption>,
    ) -> Result<usize, RepositoryError>;

    // Exchange rates
    async fn get_exchange_rate(
        &self,
        base: &str,
        quote: &str,
    ) -> Result<ExchangeRate, RepositoryError>;

    async fn put_exchange_rate(&self, rate: ExchangeRate) -> Result<(), RepositoryError>;
}
