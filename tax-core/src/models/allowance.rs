use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of deduction claimed with a tax request.
///
/// The wire format is a plain string tag. Tags outside the recognised set are
/// kept as [`AllowanceType::Unknown`] so the resolver can decide what to do
/// with them (see [`UnknownAllowancePolicy`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AllowanceType {
    Personal,
    Donation,
    KReceipt,
    KReceiptAdmin,
    Unknown(String),
}

impl AllowanceType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Personal => "personal",
            Self::Donation => "donation",
            Self::KReceipt => "k-receipt",
            Self::KReceiptAdmin => "k-receipt-admin",
            Self::Unknown(tag) => tag,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "personal" => Self::Personal,
            "donation" => Self::Donation,
            "k-receipt" => Self::KReceipt,
            "k-receipt-admin" => Self::KReceiptAdmin,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for AllowanceType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<AllowanceType> for String {
    fn from(allowance_type: AllowanceType) -> Self {
        match allowance_type {
            AllowanceType::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AllowanceType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single deduction claim: `{"allowanceType": "donation", "amount": 200000.0}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allowance {
    pub allowance_type: AllowanceType,
    pub amount: Decimal,
}

impl Allowance {
    pub fn new(
        allowance_type: AllowanceType,
        amount: Decimal,
    ) -> Self {
        Self {
            allowance_type,
            amount,
        }
    }
}

/// What the resolver does with a claim whose tag it does not recognise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownAllowancePolicy {
    /// Add the claimed amount to the deductions unmodified.
    #[default]
    PassThrough,
    /// Fail the request with `InvalidAllowance`.
    Reject,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_recognises_known_tags() {
        assert_eq!(AllowanceType::parse("personal"), AllowanceType::Personal);
        assert_eq!(AllowanceType::parse("donation"), AllowanceType::Donation);
        assert_eq!(AllowanceType::parse("k-receipt"), AllowanceType::KReceipt);
        assert_eq!(
            AllowanceType::parse("k-receipt-admin"),
            AllowanceType::KReceiptAdmin
        );
    }

    #[test]
    fn parse_keeps_unknown_tag_verbatim() {
        assert_eq!(
            AllowanceType::parse("Donation"),
            AllowanceType::Unknown("Donation".to_string())
        );
    }

    #[test]
    fn string_conversion_preserves_unknown_tag() {
        let tag: String = AllowanceType::Unknown("gym".to_string()).into();

        assert_eq!(tag, "gym");
    }

    #[test]
    fn known_type_converts_to_its_tag() {
        let tag: String = AllowanceType::KReceiptAdmin.into();

        assert_eq!(tag, "k-receipt-admin");
    }
}
