//! Country list in the shape served by the countries endpoint:
//!
//! ```json
//! { "countries": [ { "id": 1, "name": "New Zealand", "code": "nz", "emoji": "🇳🇿", "continent": "Oceania" } ] }
//! ```

use std::collections::HashSet;
use std::io::Read;

use expat_core::{CountriesPayload, CountryOption, ReferenceRepository, RepositoryError, normalize_code};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CountryCatalogError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("country with id {0} has an empty code")]
    MissingCode(i64),

    #[error("country code '{0}' appears more than once")]
    DuplicateCode(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub struct CountryCatalogLoader;

impl CountryCatalogLoader {
    /// Parses and checks a countries payload.
    ///
    /// Codes must be non-empty and unique (case-insensitively).
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CountryOption>, CountryCatalogError> {
        let payload: CountriesPayload = serde_json::from_reader(reader)?;
        let mut seen = HashSet::new();

        for country in &payload.countries {
            let code = normalize_code(&country.code);
            if code.is_empty() {
                return Err(CountryCatalogError::MissingCode(country.id));
            }
            if !seen.insert(code.clone()) {
                return Err(CountryCatalogError::DuplicateCode(code));
            }
        }

        Ok(payload.countries)
    }

    /// Replaces the repository's country list. Returns the number stored.
    pub async fn load<R: ReferenceRepository + ?Sized>(
        repo: &R,
        countries: Vec<CountryOption>,
    ) -> Result<usize, CountryCatalogError> {
        let count = repo.replace_countries(countries).await?;
        info!(countries = count, "country catalog loaded");
        Ok(count)
    }
}
