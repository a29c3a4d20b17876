use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Key of one configurable deduction bound in the configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundName {
    PersonalDefault,
    PersonalMax,
    DonationMax,
    KReceiptDefault,
    KReceiptMax,
}

impl BoundName {
    pub const ALL: [BoundName; 5] = [
        Self::PersonalDefault,
        Self::PersonalMax,
        Self::DonationMax,
        Self::KReceiptDefault,
        Self::KReceiptMax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonalDefault => "personal_default",
            Self::PersonalMax => "personal_max",
            Self::DonationMax => "donation_max",
            Self::KReceiptDefault => "k_receipt_default",
            Self::KReceiptMax => "k_receipt_max",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == s)
    }
}

impl fmt::Display for BoundName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(name, amount)` row as held by the configuration store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBound {
    pub name: BoundName,
    pub amount: Decimal,
}

/// The complete set of bounds the resolver needs for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationBounds {
    /// Base personal deduction applied to every calculation.
    pub personal_default: Decimal,
    /// Upper limit of a `personal` claim. The lower limit is fixed at 10,000.
    pub personal_max: Decimal,
    pub donation_max: Decimal,
    /// Amount a positive `k-receipt` claim is replaced with.
    pub k_receipt_default: Decimal,
    /// Upper limit of a `k-receipt-admin` claim.
    pub k_receipt_max: Decimal,
}

impl ConfigurationBounds {
    /// Assemble bounds from store rows, checking each key is present.
    ///
    /// When a name appears more than once the last row wins.
    ///
    /// # Errors
    ///
    /// Returns the first [`BoundName`] (in [`BoundName::ALL`] order) that has
    /// no row.
    pub fn from_bounds<I>(rows: I) -> Result<Self, BoundName>
    where
        I: IntoIterator<Item = DeductionBound>,
    {
        let amounts: HashMap<BoundName, Decimal> = rows
            .into_iter()
            .map(|row| (row.name, row.amount))
            .collect();
        let get = |name: BoundName| amounts.get(&name).copied().ok_or(name);

        Ok(Self {
            personal_default: get(BoundName::PersonalDefault)?,
            personal_max: get(BoundName::PersonalMax)?,
            donation_max: get(BoundName::DonationMax)?,
            k_receipt_default: get(BoundName::KReceiptDefault)?,
            k_receipt_max: get(BoundName::KReceiptMax)?,
        })
    }

    /// Copy of these bounds with a different base personal deduction.
    pub fn with_personal_default(
        &self,
        personal_default: Decimal,
    ) -> Self {
        Self {
            personal_default,
            ..self.clone()
        }
    }
}
