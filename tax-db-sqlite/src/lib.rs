//! SQLite backend for the deduction-bound configuration store.

mod decimal;
pub mod factory;
pub mod repository;

pub use factory::{SqliteRepositoryFactory, seeds_dir};
pub use repository::SqliteRepository;
