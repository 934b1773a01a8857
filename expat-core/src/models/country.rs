use serde::{Deserialize, Serialize};

/// A selectable country, as served by the countries endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryOption {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub emoji: String,
    pub continent: String,
}

impl CountryOption {
    /// Case-insensitive match on either the country code or its name.
    pub fn matches_key(
        &self,
        key: &str,
    ) -> bool {
        let key = key.trim();
        self.code.eq_ignore_ascii_case(key) || self.name.eq_ignore_ascii_case(key)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}

/// Envelope of the countries endpoint: `{ "countries": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountriesPayload {
    pub countries: Vec<CountryOption>,
}

/// Lowercase key used for country codes across repositories.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}
