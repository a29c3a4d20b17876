//! Wire shapes that are not core models. Amounts leave the service as JSON
//! numbers with one decimal digit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::TaxCalculation;
use tax_data::{Money, money};

/// `{"tax": 4000.0, "taxLevel": [{"level": "0-150,000", "tax": 0.0}, ...]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxResponse {
    pub tax: Money,
    #[serde(rename = "taxLevel")]
    pub tax_level: Vec<TaxLevelResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxLevelResponse {
    pub level: String,
    pub tax: Money,
}

impl From<&TaxCalculation> for TaxResponse {
    fn from(calculation: &TaxCalculation) -> Self {
        Self {
            tax: money(calculation.total_tax),
            tax_level: calculation
                .brackets
                .iter()
                .map(|bracket| TaxLevelResponse {
                    level: bracket.level.clone(),
                    tax: money(bracket.tax),
                })
                .collect(),
        }
    }
}

/// Body of both admin endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminRequest {
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDeductionResponse {
    pub personal_deduction: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KReceiptResponse {
    pub k_receipt: Money,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::calculations::{apply_withholding, compute_brackets};

    use super::*;

    #[test]
    fn tax_response_renders_one_decimal_numbers() {
        let calculation = apply_withholding(compute_brackets(dec!(440000)), dec!(25000));

        let json = serde_json::to_string(&TaxResponse::from(&calculation)).unwrap();

        assert_eq!(
            json,
            r#"{"tax":4000.0,"taxLevel":[{"level":"0-150,000","tax":0.0},{"level":"150,001-500,000","tax":4000.0},{"level":"500,001-1,000,000","tax":0.0},{"level":"1,000,001-2,000,000","tax":0.0},{"level":"2,000,001 ขึ้นไป","tax":0.0}]}"#
        );
    }

    #[test]
    fn tax_response_keeps_negative_total() {
        let calculation = apply_withholding(compute_brackets(dec!(440000)), dec!(30000));

        let response = TaxResponse::from(&calculation);

        assert_eq!(response.tax, money(dec!(-1000)));
    }

    #[test]
    fn admin_request_accepts_numbers_and_strings() {
        let number: AdminRequest = serde_json::from_str(r#"{"amount": 70000.0}"#).unwrap();
        let integer: AdminRequest = serde_json::from_str(r#"{"amount": 70000}"#).unwrap();
        let text: AdminRequest = serde_json::from_str(r#"{"amount": "70000"}"#).unwrap();
        let fraction: AdminRequest = serde_json::from_str(r#"{"amount": "12500.50"}"#).unwrap();

        assert_eq!(number.amount, dec!(70000));
        assert_eq!(integer.amount, dec!(70000));
        assert_eq!(text.amount, dec!(70000));
        assert_eq!(fraction.amount, dec!(12500.50));
    }

    #[test]
    fn admin_request_rejects_non_numeric_strings() {
        let result = serde_json::from_str::<AdminRequest>(r#"{"amount": "seventy"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn admin_responses_use_camel_case() {
        let personal = serde_json::to_string(&PersonalDeductionResponse {
            personal_deduction: money(dec!(70000)),
        })
        .unwrap();
        let k_receipt = serde_json::to_string(&KReceiptResponse {
            k_receipt: money(dec!(0)),
        }).unwrap();

        assert_eq!(personal, r#"{"personalDeduction":70000.0}"#);
        assert_eq!(k_receipt, r#"{"kReceipt":0.0}"#);
    }
}
