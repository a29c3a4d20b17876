mod allowance;
mod bounds;
mod tax_bracket;
mod tax_request;

pub use allowance::{Allowance, AllowanceType, UnknownAllowancePolicy};
pub use bounds::{BoundName, ConfigurationBounds, DeductionBound};
pub use tax_bracket::{TaxBracket, TaxCalculation};
pub use tax_request::TaxRequest;
