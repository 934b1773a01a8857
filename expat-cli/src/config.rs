//! Settings file (`expat.toml`).
//!
//! ```toml
//! log_level = "debug"
//! log_file = "expat.log"
//! brackets = "data/brackets.csv"
//! countries = "data/countries.json"
//! default_origin = "fr"
//! default_destination = "nz"
//!
//! [[exchange_rates]]
//! base = "EUR"
//! quote = "NZD"
//! rate = "1.71"
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::{
    fs,
    path::{Path, PathBuf},
};

use expat_core::ExchangeRate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "expat.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub log_level: String,
    pub log_file: Option<PathBuf>,

    /// Bracket CSV loaded over the built-in tables.
    pub brackets: Option<PathBuf>,

    /// Countries JSON replacing the built-in list.
    pub countries: Option<PathBuf>,

    /// Fallback for `--from` / `--current`.
    pub default_origin: Option<String>,

    /// Fallback for `--to` / `--target`.
    pub default_destination: Option<String>,

    /// Rates stored on top of the built-in ones.
    pub exchange_rates: Vec<ExchangeRate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_file: None,
            brackets: None,
            countries: None,
            default_origin: None,
            default_destination: None,
            exchange_rates: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path`, which must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Loads an explicit config file, or [`DEFAULT_CONFIG_FILE`] from `dir`
    /// when it exists, or the defaults.
    pub fn load(
        explicit: Option<&Path>,
        dir: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::from_file(&fallback)
        } else {
            debug!(path = %fallback.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides. `None` keeps the file value.
    pub fn apply_overrides(
        &mut self,
        log_level: Option<&str>,
        brackets: Option<&Path>,
        countries: Option<&Path>,
    ) {
        if let Some(level) = log_level {
            self.log_level = level.to_string();
        }
        if let Some(path) = brackets {
            self.brackets = Some(path.to_path_buf());
        }
        if let Some(path) = countries {
            self.countries = Some(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_toml_str("", Path::new("expat.toml")).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn parses_every_key() {
        let text = r#"
            log_level = "debug"
            log_file = "expat.log"
            brackets = "brackets.csv"
            countries = "countries.json"
            default_origin = "fr"
            default_destination = "nz"

            [[exchange_rates]]
            base = "eur"
            quote = "nzd"
            rate = "1.71"
        "#;

        let settings = Settings::from_toml_str(text, Path::new("expat.toml")).unwrap();

        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.brackets, Some(PathBuf::from("brackets.csv")));
        assert_eq!(settings.default_destination.as_deref(), Some("nz"));
        assert_eq!(
            settings.exchange_rates,
            vec![ExchangeRate::new("EUR", "NZD", dec!(1.71)).unwrap()]
        );
    }

    #[test]
    fn rejects_non_positive_rate() {
        let text = r#"
            [[exchange_rates]]
            base = "EUR"
            quote = "NZD"
            rate = "0"
        "#;

        let result = Settings::from_toml_str(text, Path::new("expat.toml"));

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = Settings::from_toml_str("colour = \"blue\"", Path::new("expat.toml"));

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn load_falls_back_to_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();

        let settings = Settings::load(None, dir.path()).unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_reads_file_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "default_origin = \"fr\"").unwrap();

        let settings = Settings::load(None, dir.path()).unwrap();

        assert_eq!(settings.default_origin.as_deref(), Some("fr"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let result = Settings::load(Some(&path), dir.path());

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut settings = Settings {
            log_level: "info".to_string(),
            brackets: Some(PathBuf::from("old.csv")),
            ..Default::default()
        };

        settings.apply_overrides(Some("trace"), Some(Path::new("new.csv")), None);

        assert_eq!(settings.log_level, "trace");
        assert_eq!(settings.brackets, Some(PathBuf::from("new.csv")));
        assert_eq!(settings.countries, None);
    }
}
