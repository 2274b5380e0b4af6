//! Document tool handlers
//!
//! Stateless endpoints backing the CPF/CNPJ form fields: both accept partial
//! input and never fail on malformed documents.

use axum::Json;
use validator::Validate;

use domain_client::normalize_digits;

use crate::dto::documents::*;
use crate::error::ApiError;

/// Checks a document and returns its canonical and display forms
pub async fn validate_document(
    Json(request): Json<DocumentRequest>,
) -> Result<Json<ValidateDocumentResponse>, ApiError> {
    request.validate()?;
    let kind = request.resolved_kind();

    Ok(Json(ValidateDocumentResponse {
        kind,
        valid: kind.is_valid(&request.value),
        digits: normalize_digits(&request.value),
        formatted: kind.format(&request.value),
    }))
}

/// Applies the display mask to partial input
pub async fn format_document(
    Json(request): Json<DocumentRequest>,
) -> Result<Json<FormatDocumentResponse>, ApiError> {
    request.validate()?;
    let kind = request.resolved_kind();

    Ok(Json(FormatDocumentResponse {
        kind,
        formatted: kind.format(&request.value),
    }))
}
