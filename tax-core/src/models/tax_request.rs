use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Allowance;

/// Input for one tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRequest {
    /// Gross annual income.
    pub total_income: Decimal,

    /// Tax already withheld at source.
    #[serde(rename = "wht")]
    pub withholding: Decimal,

    #[serde(default)]
    pub allowances: Vec<Allowance>,
}
