//! JSON shape of a computed batch, shared by `tax-batch` and the HTTP upload
//! endpoint.

use std::fmt;

use rust_decimal::Decimal;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use tax_core::calculations::common::round_one_decimal;

use crate::loader::TaxDetail;

/// `{"taxes": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub taxes: Vec<TaxDetailReport>,
}

/// One record, amounts rounded to one decimal digit.
///
/// `taxRefund` is omitted when there is nothing to refund.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDetailReport {
    pub total_income: Money,
    pub tax: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_refund: Option<Money>,
}

impl From<&TaxDetail> for TaxDetailReport {
    fn from(detail: &TaxDetail) -> Self {
        let tax_refund = (detail.tax_refund > Decimal::ZERO).then(|| money(detail.tax_refund));
        Self {
            total_income: money(detail.total_income),
            tax: money(detail.tax),
            tax_refund,
        }
    }
}

impl BatchReport {
    pub fn from_details(details: &[TaxDetail]) -> Self {
        Self {
            taxes: details.iter().map(TaxDetailReport::from).collect(),
        }
    }
}

/// An amount on the wire: a plain JSON number with exactly one decimal digit.
///
/// Written from the decimal text rather than through `f64`, so large amounts
/// keep every digit and never switch to exponent form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money(Decimal);

impl Money {
    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        RawValue::from_string(self.to_string())
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// Rounds half away from zero to one decimal digit.
pub fn money(value: Decimal) -> Money {
    Money(round_one_decimal(value))
}
