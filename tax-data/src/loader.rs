//! Bulk tax calculation from CSV.
//!
//! ## CSV Format
//!
//! | Column        | Type    | Notes                          |
//! |---------------|---------|--------------------------------|
//! | `totalIncome` | decimal | Gross annual income            |
//! | `wht`         | decimal | Tax withheld at source         |
//! | `donation`    | decimal | Donation claim, `0` for none   |
//!
//! ```csv
//! totalIncome,wht,donation
//! 500000,0,0
//! 600000,40000,20000
//! ```
//!
//! Every record is computed as a single `donation` claim plus a fixed
//! personal deduction of [`BATCH_PERSONAL_DEDUCTION`]; the configured
//! personal default does not apply here. No other allowance types exist in
//! this path.

use std::io::Read;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::calculations::{AllowanceResolver, TaxError};
use tax_core::{Allowance, AllowanceType, ConfigurationBounds, TaxRequest, TaxService};
use thiserror::Error;
use tracing::debug;

/// Personal deduction applied to every CSV record.
pub const BATCH_PERSONAL_DEDUCTION: Decimal = Decimal::from_parts(60_000, 0, 0, false, 0);

/// Errors that can occur while reading or computing a batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    /// `row` is 1-based, the header row not counted.
    #[error("row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: TaxError,
    },

    #[error(transparent)]
    Tax(#[from] TaxError),
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        BatchError::CsvParse(err.to_string())
    }
}

/// One CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRecord {
    #[serde(rename = "totalIncome")]
    pub total_income: Decimal,
    #[serde(rename = "wht")]
    pub withholding: Decimal,
    pub donation: Decimal,
}

impl TaxRecord {
    /// The calculator request this record stands for.
    pub fn to_request(&self) -> TaxRequest {
        TaxRequest {
            total_income: self.total_income,
            withholding: self.withholding,
            allowances: vec![Allowance::new(AllowanceType::Donation, self.donation)],
        }
    }
}

/// Net result for one record. `tax` and `tax_refund` are never negative and
/// at most one of them is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDetail {
    pub total_income: Decimal,
    pub tax: Decimal,
    pub tax_refund: Decimal,
}

impl TaxDetail {
    /// Splits a net amount (tax minus withholding) into tax due or refund.
    fn from_net_tax(
        total_income: Decimal,
        net_tax: Decimal,
    ) -> Self {
        if net_tax < Decimal::ZERO {
            Self {
                total_income,
                tax: Decimal::ZERO,
                tax_refund: -net_tax,
            }
        } else {
            Self {
                total_income,
                tax: net_tax,
                tax_refund: Decimal::ZERO,
            }
        }
    }
}

/// Parses tax records and runs them through the calculator.
pub struct TaxRecordLoader;

impl TaxRecordLoader {
    /// Parse records from a CSV reader. Values may be padded with spaces;
    /// every row must have exactly the header's columns.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxRecord>, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.deserialize() {
            let record: TaxRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Compute every record against `bounds`, in file order.
    ///
    /// Stops at the first record the calculator refuses.
    pub fn calculate(
        records: &[TaxRecord],
        bounds: &ConfigurationBounds,
        resolver: &AllowanceResolver,
    ) -> Result<Vec<TaxDetail>, BatchError> {
        let bounds = bounds.with_personal_default(BATCH_PERSONAL_DEDUCTION);

        records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let calculation = resolver
                    .calculate(&record.to_request(), &bounds)
                    .map_err(|source| BatchError::InvalidRecord {
                        row: idx + 1,
                        source,
                    })?;
                Ok(TaxDetail::from_net_tax(
                    record.total_income,
                    calculation.total_tax,
                ))
            })
            .collect()
    }

    /// Fetch the current bounds from `service` and compute every record.
    pub async fn calculate_with_service(
        service: &TaxService,
        records: &[TaxRecord],
    ) -> Result<Vec<TaxDetail>, BatchError> {
        let bounds = service.bounds().await?;
        let details = Self::calculate(records, &bounds, service.resolver())?;
        debug!(records = details.len(), "batch calculated");
        Ok(details)
    }
}
