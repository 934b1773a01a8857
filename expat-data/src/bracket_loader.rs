use std::io::Read;

use expat_core::{
    BracketTable, BracketTableError, ReferenceRepository, RepositoryError, TaxBracket, TaxSystem,
    normalize_code,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid bracket table for '{country}': {source}")]
    InvalidTable {
        country: String,
        #[source]
        source: BracketTableError,
    },

    #[error("country '{country}' mixes currencies {first} and {second}")]
    InconsistentCurrency {
        country: String,
        first: String,
        second: String,
    },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the brackets CSV file.
///
/// - `country_code`: ISO code of the country the bracket belongs to
/// - `country_name`: display name
/// - `currency`: currency the bounds are expressed in
/// - `lower_bound`, `upper_bound`: the income range (`upper_bound` empty for unbounded)
/// - `rate`: marginal rate in percent (e.g. `17.5`)
/// - `label`: display label for the bracket
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub country_code: String,
    pub country_name: String,
    pub currency: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    #[serde(default)]
    pub label: String,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loads bracket tables from CSV into any [`ReferenceRepository`].
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records by country into validated [`TaxSystem`]s.
    ///
    /// Rows may appear in any order; each country's rows are sorted by
    /// lower bound before validation. Countries keep their first-seen order.
    pub fn build(records: &[BracketRecord]) -> Result<Vec<TaxSystem>, BracketLoaderError> {
        let mut groups: Vec<(String, Vec<&BracketRecord>)> = Vec::new();

        for record in records {
            let key = normalize_code(&record.country_code);
            match groups.iter_mut().find(|(code, _)| *code == key) {
                Some((_, rows)) => rows.push(record),
                None => groups.push((key, vec![record])),
            }
        }

        groups
            .into_iter()
            .map(|(country, mut rows)| {
                rows.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));

                let first = rows[0];
                let currency = first.currency.trim().to_ascii_uppercase();
                if let Some(other) = rows
                    .iter()
                    .find(|r| !r.currency.trim().eq_ignore_ascii_case(&currency))
                {
                    return Err(BracketLoaderError::InconsistentCurrency {
                        country,
                        first: currency,
                        second: other.currency.trim().to_ascii_uppercase(),
                    });
                }

                let brackets = rows
                    .iter()
                    .map(|r| TaxBracket::new(r.lower_bound, r.upper_bound, r.rate, r.label.trim()))
                    .collect();
                let table = BracketTable::new(brackets).map_err(|source| {
                    BracketLoaderError::InvalidTable {
                        country: country.clone(),
                        source,
                    }
                })?;

                Ok(TaxSystem {
                    country_name: first.country_name.trim().to_string(),
                    country_code: country,
                    currency,
                    table,
                    levies: Vec::new(),
                })
            })
            .collect()
    }

    /// Load bracket records into the repository.
    ///
    /// Every country in `records` has its table replaced wholesale, so
    /// running the same load twice yields the same state. Levies already
    /// stored for a country are kept.
    ///
    /// Returns the number of brackets stored.
    pub async fn load<R: ReferenceRepository + ?Sized>(
        repo: &R,
        records: &[BracketRecord],
    ) -> Result<usize, BracketLoaderError> {
        let mut inserted = 0;

        for mut system in Self::build(records)? {
            match repo.get_tax_system(&system.country_code).await {
                Ok(existing) => {
                    debug!(country = %system.country_code, "replacing existing bracket table");
                    system.levies = existing.levies;
                }
                Err(RepositoryError::NotFound(_)) => {}
                Err(other) => return Err(other.into()),
            }

            inserted += system.table.brackets().len();
            repo.put_tax_system(system).await?;
        }

        info!(brackets = inserted, "bracket tables loaded");
        Ok(inserted)
    }
}
