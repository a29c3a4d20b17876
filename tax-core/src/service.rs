//! Glue between the configuration store and the calculator.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::calculations::{AllowanceResolver, TaxError};
use crate::db::TaxRepository;
use crate::models::{BoundName, ConfigurationBounds, TaxCalculation, TaxRequest};

/// Lowest and highest base personal deduction an admin may configure.
pub const PERSONAL_DEDUCTION_RANGE: (Decimal, Decimal) = (
    Decimal::from_parts(10_000, 0, 0, false, 0),
    Decimal::from_parts(100_000, 0, 0, false, 0),
);

/// Lowest and highest k-receipt ceiling an admin may configure.
pub const K_RECEIPT_DEDUCTION_RANGE: (Decimal, Decimal) = (
    Decimal::ZERO,
    Decimal::from_parts(100_000, 0, 0, false, 0),
);

/// Reads bounds from a [`TaxRepository`] for every calculation and writes
/// them on behalf of admin requests.
///
/// Cloning is cheap; clones share the same repository.
#[derive(Clone)]
pub struct TaxService {
    repository: Arc<dyn TaxRepository>,
    resolver: AllowanceResolver,
}

impl TaxService {
    pub fn new(
        repository: Arc<dyn TaxRepository>,
        resolver: AllowanceResolver,
    ) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    pub fn resolver(&self) -> &AllowanceResolver {
        &self.resolver
    }

    /// Current bounds, with every required name present.
    ///
    /// # Errors
    ///
    /// [`TaxError::ConfigurationUnavailable`] when the store fails or a bound
    /// is missing. Defaults are never substituted.
    pub async fn bounds(&self) -> Result<ConfigurationBounds, TaxError> {
        let rows = self.repository.list_bounds().await.map_err(|e| {
            warn!(error = %e, "failed to read deduction bounds");
            TaxError::ConfigurationUnavailable(e.to_string())
        })?;

        ConfigurationBounds::from_bounds(rows).map_err(|missing| {
            warn!(bound = %missing, "deduction bound is not configured");
            TaxError::ConfigurationUnavailable(format!("bound '{missing}' is not configured"))
        })
    }

    /// Fetches the bounds and runs the calculation.
    pub async fn calculate_tax(
        &self,
        request: &TaxRequest,
    ) -> Result<TaxCalculation, TaxError> {
        let bounds = self.bounds().await?;
        self.resolver.calculate(request, &bounds)
    }

    /// Sets the base personal deduction applied to every calculation.
    ///
    /// Accepts 10,000 to 100,000 inclusive and returns the stored amount.
    pub async fn set_personal_deduction(
        &self,
        amount: Decimal,
    ) -> Result<Decimal, TaxError> {
        self.set_bound_in_range(BoundName::PersonalDefault, amount, PERSONAL_DEDUCTION_RANGE)
            .await
    }

    /// Sets the ceiling for `k-receipt-admin` claims.
    ///
    /// Accepts 0 to 100,000 inclusive and returns the stored amount.
    pub async fn set_k_receipt_deduction(
        &self,
        amount: Decimal,
    ) -> Result<Decimal, TaxError> {
        self.set_bound_in_range(BoundName::KReceiptMax, amount, K_RECEIPT_DEDUCTION_RANGE)
            .await
    }

    async fn set_bound_in_range(
        &self,
        name: BoundName,
        amount: Decimal,
        (min, max): (Decimal, Decimal),
    ) -> Result<Decimal, TaxError> {
        if amount < min || amount > max {
            return Err(TaxError::InvalidDeductionAmount {
                name,
                amount,
                min,
                max,
            });
        }

        self.repository
            .set_bound(name, amount)
            .await
            .map_err(|source| TaxError::PersistenceFailure { name, source })?;

        info!(bound = %name, %amount, "deduction bound updated");
        Ok(amount)
    }
}
