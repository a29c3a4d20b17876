pub mod calculations;
pub mod db;
pub mod models;
pub mod service;

pub use calculations::TaxError;
pub use db::repository::{RepositoryError, TaxRepository};
pub use models::*;
pub use service::TaxService;
