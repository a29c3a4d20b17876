//! Progressive personal income tax bands.
//!
//! | Band                  | Floor     | Ceiling   | Rate |
//! |-----------------------|-----------|-----------|------|
//! | 0-150,000             | 0         | 150,000   | 0%   |
//! | 150,001-500,000       | 150,000   | 500,000   | 10%  |
//! | 500,001-1,000,000     | 500,000   | 1,000,000 | 15%  |
//! | 1,000,001-2,000,000   | 1,000,000 | 2,000,000 | 20%  |
//! | 2,000,001 and above   | 2,000,000 | –         | 35%  |
//!
//! Each band taxes only the part of the income that falls inside it.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::compute_brackets;
//!
//! let breakdown = compute_brackets(dec!(440000));
//!
//! assert_eq!(breakdown.total_tax, dec!(29000));
//! assert_eq!(breakdown.brackets[1].tax, dec!(29000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::TaxBracket;
use crate::calculations::common::min;

/// One marginal band of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBand {
    pub level: &'static str,
    pub floor: Decimal,
    /// `None` for the open-ended top band.
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBand {
    /// Tax on the slice of `income` between this band's floor and ceiling.
    pub fn tax_for(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= self.floor {
            return Decimal::ZERO;
        }
        let top = self.ceiling.map_or(income, |ceiling| min(income, ceiling));
        (top - self.floor) * self.rate
    }
}

/// The five bands, lowest first.
pub fn tax_bands() -> [TaxBand; 5] {
    [
        TaxBand {
            level: "0-150,000",
            floor: Decimal::ZERO,
            ceiling: Some(Decimal::from(150_000)),
            rate: Decimal::ZERO,
        },
        TaxBand {
            level: "150,001-500,000",
            floor: Decimal::from(150_000),
            ceiling: Some(Decimal::from(500_000)),
            rate: Decimal::new(10, 2),
        },
        TaxBand {
            level: "500,001-1,000,000",
            floor: Decimal::from(500_000),
            ceiling: Some(Decimal::from(1_000_000)),
            rate: Decimal::new(15, 2),
        },
        TaxBand {
            level: "1,000,001-2,000,000",
            floor: Decimal::from(1_000_000),
            ceiling: Some(Decimal::from(2_000_000)),
            rate: Decimal::new(20, 2),
        },
        TaxBand {
            level: "2,000,001 ขึ้นไป",
            floor: Decimal::from(2_000_000),
            ceiling: None,
            rate: Decimal::new(35, 2),
        },
    ]
}

/// Raw tax for a taxable income, before withholding.
///
/// `total_tax` is always the sum of the five `brackets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketBreakdown {
    pub total_tax: Decimal,
    pub brackets: [TaxBracket; 5],
}

/// Splits the tax on `taxable_income` across the bands.
///
/// Zero or negative income yields zero everywhere. Nothing is rounded.
pub fn compute_brackets(taxable_income: Decimal) -> BracketBreakdown {
    let brackets = tax_bands().map(|band| TaxBracket {
        level: band.level.to_string(),
        tax: band.tax_for(taxable_income),
    });
    let total_tax = brackets.iter().map(|bracket| bracket.tax).sum();

    BracketBreakdown {
        total_tax,
        brackets,
    }
}
