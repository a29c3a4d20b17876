use rust_decimal::Decimal;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::BoundName;

/// Why a calculation or an admin update was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// Bounds could not be read, or a required bound is missing.
    #[error("tax configuration unavailable: {0}")]
    ConfigurationUnavailable(String),

    #[error("invalid {allowance_type} allowance: {reason}")]
    InvalidAllowance {
        allowance_type: String,
        reason: String,
    },

    #[error("withholding {withholding} must be between 0 and total income {total_income}")]
    InvalidWithholding {
        withholding: Decimal,
        total_income: Decimal,
    },

    #[error("{name} amount {amount} must be between {min} and {max}")]
    InvalidDeductionAmount {
        name: BoundName,
        amount: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("failed to persist {name}: {source}")]
    PersistenceFailure {
        name: BoundName,
        #[source]
        source: RepositoryError,
    },
}

impl TaxError {
    /// `true` when the caller's input was at fault rather than the
    /// infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAllowance { .. }
                | Self::InvalidWithholding { .. }
                | Self::InvalidDeductionAmount { .. }
        )
    }
}
