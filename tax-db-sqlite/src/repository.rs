use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tax_core::{BoundName, DeductionBound, RepositoryError, TaxRepository};
use tracing::{debug, warn};

use crate::decimal::{decimal_to_text, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connect to `database_url`, creating the database file if needed.
    ///
    /// Accepts bare paths (`taxes.db`), sqlx URLs (`sqlite:taxes.db`) and
    /// `:memory:`. In-memory databases are limited to a single connection so
    /// every query sees the same data.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(file = %path.display(), "seed file applied");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// `None` for rows whose name is not a known bound.
fn row_to_bound(row: &sqlx::sqlite::SqliteRow) -> Result<Option<DeductionBound>, RepositoryError> {
    let name: String = row
        .try_get("name")
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

    let Some(bound_name) = BoundName::parse(&name) else {
        warn!(name = %name, "ignoring unknown deduction bound");
        return Ok(None);
    };

    Ok(Some(DeductionBound {
        name: bound_name,
        amount: get_decimal(row, "amount")?,
    }))
}

#[async_trait]
impl TaxRepository for SqliteRepository {
    async fn list_bounds(&self) -> Result<Vec<DeductionBound>, RepositoryError> {
        let rows = sqlx::query("SELECT name, amount FROM allowance_config ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let mut bounds = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(bound) = row_to_bound(row)? {
                bounds.push(bound);
            }
        }
        Ok(bounds)
    }

    async fn set_bound(
        &self,
        name: BoundName,
        amount: Decimal,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO allowance_config (name, amount, updated_at)
             VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(name) DO UPDATE
             SET amount = excluded.amount, updated_at = excluded.updated_at",
        )
        .bind(name.as_str())
        .bind(decimal_to_text(amount))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}
