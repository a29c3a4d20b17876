use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{BoundName, DeductionBound};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for the deduction bounds the calculator reads on every request.
///
/// Writes are last-write-wins; implementations give no ordering guarantee
/// between concurrent writers.
#[async_trait]
pub trait TaxRepository: Send + Sync {
    /// Every stored bound. The caller checks that all required names exist.
    async fn list_bounds(&self) -> Result<Vec<DeductionBound>, RepositoryError>;

    /// Insert or replace a single bound.
    async fn set_bound(
        &self,
        name: BoundName,
        amount: Decimal,
    ) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Exhaustive over every variant.
    fn kind(err: &RepositoryError) -> &'static str {
        match err {
            RepositoryError::Database(_) => "database",
            RepositoryError::Connection(_) => "connection",
            RepositoryError::Configuration(_) => "configuration",
        }
    }

    #[test]
    fn every_variant_renders_its_detail() {
        let errors = [
            RepositoryError::Database("disk I/O error".to_string()),
            RepositoryError::Connection("store offline".to_string()),
            RepositoryError::Configuration("unknown backend 'pg'".to_string()),
        ];

        let rendered: Vec<(String, &str)> = errors
            .iter()
            .map(|err| (err.to_string(), kind(err)))
            .collect();

        assert_eq!(
            rendered,
            vec![
                ("Database error: disk I/O error".to_string(), "database"),
                ("Connection error: store offline".to_string(), "connection"),
                (
                    "Configuration error: unknown backend 'pg'".to_string(),
                    "configuration"
                ),
            ]
        );
    }
}
