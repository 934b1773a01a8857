//! Reference data for the relocation estimator: built-in tables, loaders
//! for bracket CSVs and country payloads, and an in-memory repository.

pub mod bracket_loader;
pub mod builtin;
pub mod country_catalog;
pub mod memory;

pub use bracket_loader::{BracketLoader, BracketLoaderError, BracketRecord};
pub use country_catalog::{CountryCatalogError, CountryCatalogLoader};
pub use memory::InMemoryRepository;
