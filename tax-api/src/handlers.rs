use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use tax_core::TaxRequest;
use tax_data::{BatchReport, TaxRecordLoader, money};
use tracing::{debug, info};

use crate::dto::{AdminRequest, KReceiptResponse, PersonalDeductionResponse, TaxResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the CSV upload.
pub const TAXES_FIELD: &str = "taxes";

pub const GREETING: &str = "Hello, Tax Service!";

pub async fn greeting() -> &'static str {
    GREETING
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn calculate_tax(
    State(state): State<AppState>,
    payload: Result<Json<TaxRequest>, JsonRejection>,
) -> Result<Json<TaxResponse>, ApiError> {
    let Json(request) = payload?;

    let calculation = state.service.calculate_tax(&request).await?;

    Ok(Json(TaxResponse::from(&calculation)))
}

pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BatchReport>, ApiError> {
    let csv = read_taxes_field(multipart?).await?;

    let records = TaxRecordLoader::parse(&csv[..])?;
    let details = TaxRecordLoader::calculate_with_service(&state.service, &records).await?;

    info!(records = details.len(), "csv upload calculated");
    Ok(Json(BatchReport::from_details(&details)))
}

/// Contents of the first `taxes` field; other fields are skipped.
async fn read_taxes_field(mut multipart: Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(TAXES_FIELD) {
            return Ok(field.bytes().await?);
        }
        debug!(field = ?field.name(), "skipping multipart field");
    }
    Err(ApiError::BadRequest(format!(
        "no file uploaded in field '{TAXES_FIELD}'"
    )))
}

pub async fn set_personal_deduction(
    State(state): State<AppState>,
    payload: Result<Json<AdminRequest>, JsonRejection>,
) -> Result<Json<PersonalDeductionResponse>, ApiError> {
    let Json(request) = payload?;

    let stored = state.service.set_personal_deduction(request.amount).await?;

    Ok(Json(PersonalDeductionResponse {
        personal_deduction: money(stored),
    }))
}

pub async fn set_k_receipt_deduction(
    State(state): State<AppState>,
    payload: Result<Json<AdminRequest>, JsonRejection>,
) -> Result<Json<KReceiptResponse>, ApiError> {
    let Json(request) = payload?;

    let stored = state.service.set_k_receipt_deduction(request.amount).await?;

    Ok(Json(KReceiptResponse {
        k_receipt: money(stored),
    }))
}
