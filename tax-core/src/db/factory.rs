//! Choosing and opening the deduction-bound store at startup.
//!
//! Each storage crate registers one [`RepositoryFactory`]. The binary reads
//! `DATABASE_BACKEND` and `DATABASE_URL` into a [`DbConfig`] and asks the
//! [`RepositoryRegistry`] for a ready store, already migrated and holding
//! every default bound.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::repository::{RepositoryError, TaxRepository};

/// Where the deduction bounds live.
///
/// | backend  | connection_string                 |
/// |----------|-----------------------------------|
/// | `sqlite` | `taxes.db`, `sqlite://…`, `:memory:` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Backend name; matched against registered factories ignoring case.
    pub backend: String,
    /// Passed to the factory as is.
    pub connection_string: String,
}

impl DbConfig {
    pub fn new(
        backend: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            connection_string: connection_string.into(),
        }
    }

    fn backend_key(&self) -> String {
        self.backend.trim().to_ascii_lowercase()
    }
}

/// A throwaway in-memory SQLite store.
impl Default for DbConfig {
    fn default() -> Self {
        Self::new("sqlite", ":memory:")
    }
}

/// Opens the bound store for one backend.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase name the backend is selected by.
    fn backend_name(&self) -> &'static str;

    /// Returns a store whose `list_bounds` yields every [`BoundName`].
    /// Schema setup and default bounds are the factory's job.
    ///
    /// [`BoundName`]: crate::models::BoundName
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Arc<dyn TaxRepository>, RepositoryError>;
}

/// Bound-store factories by backend name.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`; a later registration under the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the bound store named by `config.backend`.
    ///
    /// Fails with [`RepositoryError::Configuration`] for a backend nobody
    /// registered; factory errors come back unchanged.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Arc<dyn TaxRepository>, RepositoryError> {
        let key = config.backend_key();
        let Some(factory) = self.factories.get(key.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            )));
        };

        debug!(backend = %key, "opening deduction bound store");
        factory.create(config).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{BoundName, DeductionBound};

    /// Read-only store holding a single personal default.
    struct FixedBounds(Decimal);

    #[async_trait]
    impl TaxRepository for FixedBounds {
        async fn list_bounds(&self) -> Result<Vec<DeductionBound>, RepositoryError> {
            Ok(vec![DeductionBound {
                name: BoundName::PersonalDefault,
                amount: self.0,
            }])
        }

        async fn set_bound(
            &self,
            _name: BoundName,
            _amount: Decimal,
        ) -> Result<(), RepositoryError> {
            Err(RepositoryError::Database("read-only".to_string()))
        }
    }

    type Opened = Arc<Mutex<Vec<(&'static str, String)>>>;

    /// Records every connection string it is asked to open.
    struct RecordingFactory {
        name: &'static str,
        personal_default: Decimal,
        opened: Opened,
    }

    #[async_trait]
    impl RepositoryFactory for RecordingFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(
            &self,
            config: &DbConfig,
        ) -> Result<Arc<dyn TaxRepository>, RepositoryError> {
            self.opened
                .lock()
                .unwrap()
                .push((self.name, config.connection_string.clone()));
            Ok(Arc::new(FixedBounds(self.personal_default)))
        }
    }

    struct UnreachableFactory;

    #[async_trait]
    impl RepositoryFactory for UnreachableFactory {
        fn backend_name(&self) -> &'static str {
            "remote"
        }

        async fn create(
            &self,
            config: &DbConfig,
        ) -> Result<Arc<dyn TaxRepository>, RepositoryError> {
            Err(RepositoryError::Connection(format!(
                "{} refused the connection",
                config.connection_string
            )))
        }
    }

    fn registry_with(backends: &[(&'static str, Decimal)]) -> (RepositoryRegistry, Opened) {
        let opened = Opened::default();
        let mut registry = RepositoryRegistry::new();
        for &(name, personal_default) in backends {
            registry.register(Box::new(RecordingFactory {
                name,
                personal_default,
                opened: opened.clone(),
            }));
        }
        (registry, opened)
    }

    async fn personal_default_of(store: &dyn TaxRepository) -> Decimal {
        store.list_bounds().await.unwrap()[0].amount
    }

    // =========================================================================
    // DbConfig
    // =========================================================================

    #[test]
    fn default_config_is_in_memory_sqlite() {
        assert_eq!(DbConfig::default(), DbConfig::new("sqlite", ":memory:"));
    }

    #[test]
    fn backend_key_is_trimmed_and_lowercased() {
        assert_eq!(DbConfig::new(" SQLite ", "taxes.db").backend_key(), "sqlite");
    }

    // =========================================================================
    // registration
    // =========================================================================

    #[test]
    fn backends_are_listed_in_name_order() {
        let (registry, _) = registry_with(&[("sqlite", dec!(0)), ("postgres", dec!(0))]);

        assert_eq!(registry.available_backends(), vec!["postgres", "sqlite"]);
        assert!(RepositoryRegistry::new().available_backends().is_empty());
    }

    #[tokio::test]
    async fn later_registration_replaces_earlier() {
        let (registry, _) = registry_with(&[("sqlite", dec!(60000)), ("sqlite", dec!(70000))]);

        let store = registry.create(&DbConfig::default()).await.unwrap();

        assert_eq!(registry.available_backends(), vec!["sqlite"]);
        assert_eq!(personal_default_of(store.as_ref()).await, dec!(70000));
    }

    // =========================================================================
    // create
    // =========================================================================

    #[tokio::test]
    async fn connection_string_reaches_only_the_selected_backend() {
        for (backend, url) in [("sqlite", "taxes.db"), ("postgres", "postgres://db/tax")] {
            let (registry, opened) =
                registry_with(&[("sqlite", dec!(60000)), ("postgres", dec!(50000))]);

            registry.create(&DbConfig::new(backend, url)).await.unwrap();

            assert_eq!(*opened.lock().unwrap(), vec![(backend, url.to_string())]);
        }
    }

    #[tokio::test]
    async fn backend_lookup_ignores_case() {
        let (registry, opened) = registry_with(&[("sqlite", dec!(60000))]);

        let store = registry
            .create(&DbConfig::new("SQLITE", "taxes.db"))
            .await
            .unwrap();

        assert_eq!(personal_default_of(store.as_ref()).await, dec!(60000));
        assert_eq!(opened.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_backend_lists_what_is_registered() {
        let (registry, opened) = registry_with(&[("sqlite", dec!(60000))]);

        let result = registry.create(&DbConfig::new("mysql", "tax")).await;

        assert_eq!(
            result.err(),
            Some(RepositoryError::Configuration(
                "unknown backend 'mysql'; available: [\"sqlite\"]".to_string()
            ))
        );
        assert!(opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn factory_failure_is_returned_unchanged() {
        let mut registry = RepositoryRegistry::new();
        registry.register(Box::new(UnreachableFactory));

        let result = registry.create(&DbConfig::new("remote", "db:5432")).await;

        assert_eq!(
            result.err(),
            Some(RepositoryError::Connection(
                "db:5432 refused the connection".to_string()
            ))
        );
    }
}
