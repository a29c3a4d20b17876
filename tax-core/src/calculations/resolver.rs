//! Allowance validation and the full tax pipeline.
//!
//! # Pipeline
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Resolve each allowance claim in request order (reject, clamp or substitute) |
//! | 2    | Check `0 <= withholding <= total income` |
//! | 3    | Taxable income = total income - deductions - personal default (may be negative) |
//! | 4    | Split the tax across the bands ([`compute_brackets`]) |
//! | 5    | Subtract withholding from the total and from every band row ([`apply_withholding`]) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::AllowanceResolver;
//! use tax_core::{Allowance, AllowanceType, ConfigurationBounds, TaxRequest};
//!
//! let bounds = ConfigurationBounds {
//!     personal_default: dec!(60000),
//!     personal_max: dec!(100000),
//!     donation_max: dec!(100000),
//!     k_receipt_default: dec!(50000),
//!     k_receipt_max: dec!(100000),
//! };
//! let request = TaxRequest {
//!     total_income: dec!(500000),
//!     withholding: dec!(25000),
//!     allowances: vec![Allowance::new(AllowanceType::Donation, dec!(0))],
//! };
//!
//! let result = AllowanceResolver::default().calculate(&request, &bounds).unwrap();
//!
//! assert_eq!(result.total_tax, dec!(4000));
//! assert_eq!(result.brackets[1].tax, dec!(4000));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::brackets::{BracketBreakdown, compute_brackets};
use crate::calculations::common::{max, min};
use crate::calculations::error::TaxError;
use crate::models::{
    Allowance, AllowanceType, ConfigurationBounds, TaxBracket, TaxCalculation, TaxRequest,
    UnknownAllowancePolicy,
};

/// Smallest accepted `personal` claim.
pub const PERSONAL_ALLOWANCE_MIN: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Turns a [`TaxRequest`] and the current bounds into a [`TaxCalculation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllowanceResolver {
    unknown_allowance_policy: UnknownAllowancePolicy,
}

impl AllowanceResolver {
    pub fn new(unknown_allowance_policy: UnknownAllowancePolicy) -> Self {
        Self {
            unknown_allowance_policy,
        }
    }

    pub fn unknown_allowance_policy(&self) -> UnknownAllowancePolicy {
        self.unknown_allowance_policy
    }

    /// Runs the whole pipeline.
    ///
    /// # Errors
    ///
    /// * [`TaxError::InvalidAllowance`] for the first claim (in request order)
    ///   that is negative, a `personal` claim outside
    ///   `10,000..=personal_max`, or an unknown tag under
    ///   [`UnknownAllowancePolicy::Reject`].
    /// * [`TaxError::InvalidWithholding`] when withholding is negative or
    ///   exceeds total income.
    pub fn calculate(
        &self,
        request: &TaxRequest,
        bounds: &ConfigurationBounds,
    ) -> Result<TaxCalculation, TaxError> {
        let total_deductions = self.total_deductions(&request.allowances, bounds)?;

        validate_withholding(request.total_income, request.withholding)?;

        let taxable_income = taxable_income(
            request.total_income,
            total_deductions,
            bounds.personal_default,
        )?;
        let breakdown = compute_brackets(taxable_income);
        let calculation = apply_withholding(breakdown, request.withholding);

        debug!(
            %taxable_income,
            %total_deductions,
            total_tax = %calculation.total_tax,
            "tax calculated"
        );
        Ok(calculation)
    }

    /// Sum of every resolved claim.
    fn total_deductions(
        &self,
        allowances: &[Allowance],
        bounds: &ConfigurationBounds,
    ) -> Result<Decimal, TaxError> {
        allowances.iter().try_fold(Decimal::ZERO, |total, allowance| {
            let claim = self.resolve_claim(allowance, bounds)?;
            total
                .checked_add(claim)
                .ok_or_else(|| deductions_overflow(total, claim))
        })
    }

    /// The amount a single claim actually contributes.
    fn resolve_claim(
        &self,
        allowance: &Allowance,
        bounds: &ConfigurationBounds,
    ) -> Result<Decimal, TaxError> {
        let amount = allowance.amount;
        if amount < Decimal::ZERO {
            return Err(invalid_allowance(
                &allowance.allowance_type,
                format!("amount {amount} cannot be negative"),
            ));
        }

        match &allowance.allowance_type {
            AllowanceType::Personal => {
                if amount < PERSONAL_ALLOWANCE_MIN || amount > bounds.personal_max {
                    return Err(invalid_allowance(
                        &allowance.allowance_type,
                        format!(
                            "amount {amount} must be between {PERSONAL_ALLOWANCE_MIN} and {}",
                            bounds.personal_max
                        ),
                    ));
                }
                Ok(amount)
            }
            AllowanceType::Donation => Ok(min(amount, bounds.donation_max)),
            AllowanceType::KReceipt => {
                if amount > Decimal::ZERO {
                    Ok(bounds.k_receipt_default)
                } else {
                    Ok(amount)
                }
            }
            AllowanceType::KReceiptAdmin => Ok(min(amount, bounds.k_receipt_max)),
            AllowanceType::Unknown(_) => match self.unknown_allowance_policy {
                UnknownAllowancePolicy::PassThrough => Ok(amount),
                UnknownAllowancePolicy::Reject => Err(invalid_allowance(
                    &allowance.allowance_type,
                    "unrecognised allowance type".to_string(),
                )),
            },
        }
    }
}

fn invalid_allowance(
    allowance_type: &AllowanceType,
    reason: String,
) -> TaxError {
    debug!(%allowance_type, %reason, "allowance rejected");
    TaxError::InvalidAllowance {
        allowance_type: allowance_type.to_string(),
        reason,
    }
}

/// Withholding must lie in `0..=total_income`.
fn validate_withholding(
    total_income: Decimal,
    withholding: Decimal,
) -> Result<(), TaxError> {
    if withholding < Decimal::ZERO || withholding > total_income {
        debug!(%withholding, %total_income, "withholding rejected");
        return Err(TaxError::InvalidWithholding {
            withholding,
            total_income,
        });
    }
    Ok(())
}

/// Income less claims and the personal default. May go negative.
fn taxable_income(
    total_income: Decimal,
    total_deductions: Decimal,
    personal_default: Decimal,
) -> Result<Decimal, TaxError> {
    total_income
        .checked_sub(total_deductions)
        .and_then(|remaining| remaining.checked_sub(personal_default))
        .ok_or_else(|| deductions_overflow(total_income, total_deductions))
}

fn deductions_overflow(
    left: Decimal,
    right: Decimal,
) -> TaxError {
    debug!(%left, %right, "deduction arithmetic overflowed");
    TaxError::InvalidAllowance {
        allowance_type: "deductions".to_string(),
        reason: "deductions overflow".to_string(),
    }
}

/// Subtracts withholding from the raw breakdown.
///
/// The total is reduced once and may go negative. Every band row is reduced
/// by the full withholding and floored at zero on its own, so the rows no
/// longer add up to the total once more than one band carries tax.
pub fn apply_withholding(
    breakdown: BracketBreakdown,
    withholding: Decimal,
) -> TaxCalculation {
    TaxCalculation {
        total_tax: breakdown.total_tax - withholding,
        brackets: breakdown.brackets.map(|bracket| TaxBracket {
            level: bracket.level,
            tax: max(bracket.tax - withholding, Decimal::ZERO),
        }),
    }
}
