pub mod calculations;
pub mod models;
pub mod repository;
pub mod search;
pub mod utils;

pub use models::*;
pub use repository::{ReferenceRepository, RepositoryError};
