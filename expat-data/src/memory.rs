use std::collections::BTreeMap;

use async_trait::async_trait;
use expat_core::{
    CountryOption, ExchangeRate, ReferenceRepository, RepositoryError, TaxSystem, normalize_code,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::builtin;

#[derive(Debug, Default)]
struct State {
    tax_systems: BTreeMap<String, TaxSystem>,
    countries: Vec<CountryOption>,
    rates: Vec<ExchangeRate>,
}

impl State {
    /// Direct pair, or the inverse of the reverse pair.
    fn direct_rate(
        &self,
        base: &str,
        quote: &str,
    ) -> Option<ExchangeRate> {
        self.rates
            .iter()
            .find(|r| r.is_pair(base, quote))
            .cloned()
            .or_else(|| {
                self.rates
                    .iter()
                    .find(|r| r.is_pair(quote, base))
                    .map(ExchangeRate::inverse)
            })
    }

    /// `base -> pivot -> quote` through any currency both sides know.
    fn cross_rate(
        &self,
        base: &str,
        quote: &str,
    ) -> Option<ExchangeRate> {
        self.rates
            .iter()
            .flat_map(|r| [r.base(), r.quote()])
            .filter(|pivot| {
                !pivot.eq_ignore_ascii_case(base.trim()) && !pivot.eq_ignore_ascii_case(quote.trim())
            })
            .find_map(|pivot| {
                let base_to_pivot = self.direct_rate(base, pivot)?;
                let quote_to_pivot = self.direct_rate(quote, pivot)?;
                let rate = base_to_pivot.rate().checked_div(quote_to_pivot.rate())?;
                ExchangeRate::new(base, quote, rate).ok()
            })
    }
}

/// Process-local [`ReferenceRepository`].
///
/// State lives behind a `tokio` read-write lock, so one instance can be
/// shared between tasks.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<State>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with the built-in tables, countries and rates.
    pub fn seeded() -> Result<Self, RepositoryError> {
        let tax_systems = builtin::tax_systems()
            .map_err(|e| RepositoryError::Invalid(e.to_string()))?
            .into_iter()
            .map(|system| (normalize_code(&system.country_code), system))
            .collect();
        let rates =
            builtin::exchange_rates().map_err(|e| RepositoryError::Invalid(e.to_string()))?;

        Ok(Self {
            state: RwLock::new(State {
                tax_systems,
                countries: builtin::countries(),
                rates,
            }),
        })
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryRepository {
    async fn get_tax_system(&self, country_code: &str) -> Result<TaxSystem, RepositoryError> {
        let key = normalize_code(country_code);
        self.state
            .read()
            .await
            .tax_systems
            .get(&key)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("tax system for '{key}'")))
    }

    async fn list_tax_systems(&self) -> Result<Vec<TaxSystem>, RepositoryError> {
        Ok(self.state.read().await.tax_systems.values().cloned().collect())
    }

    async fn put_tax_system(&self, system: TaxSystem) -> Result<(), RepositoryError> {
        let key = normalize_code(&system.country_code);
        if key.is_empty() {
            return Err(RepositoryError::Invalid(
                "tax system has an empty country code".to_string(),
            ));
        }
        debug!(country = %key, brackets = system.table.brackets().len(), "storing tax system");
        self.state.write().await.tax_systems.insert(key, system);
        Ok(())
    }

    async fn list_countries(&self) -> Result<Vec<CountryOption>, RepositoryError> {
        Ok(self.state.read().await.countries.clone())
    }

    async fn find_country(&self, key: &str) -> Result<CountryOption, RepositoryError> {
        self.state
            .read()
            .await
            .countries
            .iter()
            .find(|c| c.matches_key(key))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("country '{}'", key.trim())))
    }

    async fn replace_countries(
        &self,
        countries: Vec<CountryOption>,
    ) -> Result<usize, RepositoryError> {
        let count = countries.len();
        self.state.write().await.countries = countries;
        Ok(count)
    }

    async fn get_exchange_rate(
        &self,
        base: &str,
        quote: &str,
    ) -> Result<ExchangeRate, RepositoryError> {
        if base.trim().eq_ignore_ascii_case(quote.trim()) {
            return ExchangeRate::identity(base).map_err(|e| RepositoryError::Invalid(e.to_string()));
        }

        let state = self.state.read().await;
        state
            .direct_rate(base, quote)
            .or_else(|| state.cross_rate(base, quote))
            .ok_or_else(|| {
                RepositoryError::NotFound(format!(
                    "exchange rate {}->{}",
                    base.trim().to_ascii_uppercase(),
                    quote.trim().to_ascii_uppercase()
                ))
            })
    }

    async fn put_exchange_rate(&self, rate: ExchangeRate) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        // keep one entry per unordered pair so lookups stay unambiguous
        state.rates.retain(|r| {
            !r.is_pair(rate.base(), rate.quote()) && !r.is_pair(rate.quote(), rate.base())
        });
        state.rates.push(rate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[tokio::test]
    async fn seeded_repository_has_builtin_data() {
        let repo = InMemoryRepository::seeded().unwrap();

        assert_eq!(repo.list_tax_systems().await.unwrap().len(), 2);
        assert_eq!(repo.list_countries().await.unwrap().len(), 26);
        assert_eq!(repo.get_tax_system("NZ").await.unwrap().currency, "NZD");
    }

    #[tokio::test]
    async fn missing_tax_system_is_not_found() {
        let repo = InMemoryRepository::new();

        let result = repo.get_tax_system("jp").await;

        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_country_by_name_or_code() {
        let repo = InMemoryRepository::seeded().unwrap();

        assert_eq!(repo.find_country("nz").await.unwrap().name, "New Zealand");
        assert_eq!(repo.find_country("portugal").await.unwrap().code, "pt");
        assert!(repo.find_country("atlantis").await.is_err());
    }

    #[tokio::test]
    async fn exchange_rate_direct_inverse_and_identity() {
        let repo = InMemoryRepository::seeded().unwrap();

        let direct = repo.get_exchange_rate("eur", "nzd").await.unwrap();
        let inverse = repo.get_exchange_rate("NZD", "AUD").await.unwrap();
        let identity = repo.get_exchange_rate("EUR", "eur").await.unwrap();

        assert_eq!(direct.rate(), dec!(1.65));
        assert_eq!(inverse.base(), "NZD");
        assert!((inverse.rate() * dec!(1.08) - dec!(1)).abs() < dec!(0.0000001));
        assert_eq!(identity.rate(), dec!(1));
    }

    #[tokio::test]
    async fn exchange_rate_crosses_through_shared_currency() {
        let repo = InMemoryRepository::new();
        repo.put_exchange_rate(ExchangeRate::new("EUR", "NZD", dec!(1.65)).unwrap())
            .await
            .unwrap();
        repo.put_exchange_rate(ExchangeRate::new("GBP", "NZD", dec!(1.98)).unwrap())
            .await
            .unwrap();

        let cross = repo.get_exchange_rate("GBP", "EUR").await.unwrap();

        // 1 GBP = 1.98 NZD = 1.98 / 1.65 EUR
        assert_eq!(cross.rate(), dec!(1.2));
    }

    #[tokio::test]
    async fn unknown_exchange_rate_is_not_found() {
        let repo = InMemoryRepository::seeded().unwrap();

        let result = repo.get_exchange_rate("EUR", "JPY").await;

        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn put_exchange_rate_replaces_both_directions() {
        let repo = InMemoryRepository::seeded().unwrap();

        repo.put_exchange_rate(ExchangeRate::new("NZD", "EUR", dec!(0.5)).unwrap())
            .await
            .unwrap();

        let rate = repo.get_exchange_rate("EUR", "NZD").await.unwrap();
        assert_eq!(rate.rate(), dec!(2));
    }

    #[tokio::test]
    async fn put_tax_system_rejects_empty_code() {
        let repo = InMemoryRepository::new();
        let mut system = builtin::france().unwrap();
        system.country_code = "  ".to_string();

        let result = repo.put_tax_system(system).await;

        assert!(matches!(result, Err(RepositoryError::Invalid(_))));
    }
}
