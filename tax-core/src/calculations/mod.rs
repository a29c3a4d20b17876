//! Tax calculation: the progressive band schedule and the allowance resolver
//! that feeds it.

pub mod brackets;
pub mod common;
pub mod error;
pub mod resolver;

pub use brackets::{BracketBreakdown, TaxBand, compute_brackets, tax_bands};
pub use error::TaxError;
pub use resolver::{AllowanceResolver, PERSONAL_ALLOWANCE_MIN, apply_withholding};
