//! Bulk tax calculation: CSV parsing, per-record refund handling and the
//! JSON report.

pub mod loader;
pub mod report;

pub use loader::{BATCH_PERSONAL_DEDUCTION, BatchError, TaxDetail, TaxRecord, TaxRecordLoader};
pub use report::{BatchReport, Money, TaxDetailReport, money};
