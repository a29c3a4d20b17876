use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax contributed by one income band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub level: String,
    pub tax: Decimal,
}

/// Outcome of a full calculation, after withholding.
///
/// `total_tax` may be negative (a refund). It is not guaranteed to equal the
/// sum of `brackets`, because each row is adjusted for withholding and
/// floored at zero on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub total_tax: Decimal,
    pub brackets: [TaxBracket; 5],
}
