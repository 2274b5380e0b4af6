//! API error handling
//!
//! Domain errors map onto status codes as follows:
//!
//! | Error                                  | Status |
//! |----------------------------------------|--------|
//! | step validation, bad contact, bad body | 422    |
//! | wrong step, submission in flight       | 409    |
//! | unknown session or contact             | 404    |
//! | create/update rejected by the backend  | 502    |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_client::{ClientError, FieldError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    /// The client backend rejected or failed the call
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details,
        }
    }

    fn field(field: &str, message: &str) -> FieldError {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                Some(details).filter(|d| !d.is_empty()),
            ),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "submission_failed", msg, None),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg, None),
            ApiError::Internal(msg) => {
                error!(message = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        let message = err.to_string();
        match err {
            ClientError::ValidationFailed(details) => ApiError::validation("Validation failed", details),
            ClientError::IncompleteAddress { missing } => {
                let details = missing
                    .iter()
                    .map(|field| ApiError::field(field, "Required when an address is given"))
                    .collect();
                ApiError::validation(message, details)
            }
            ClientError::InvalidContact(reason) => {
                ApiError::validation(message, vec![ApiError::field("value", &reason)])
            }
            ClientError::InvalidDocument { .. } | ClientError::UnknownDocumentKind(_) => {
                ApiError::validation(message, Vec::new())
            }
            ClientError::ContactNotFound(_) => ApiError::NotFound(message),
            ClientError::WrongStep { .. } | ClientError::SubmissionInFlight => ApiError::Conflict(message),
            ClientError::Submission(submission) => ApiError::Upstream(submission.message),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match &err {
            PortError::NotFound { .. } => ApiError::NotFound(err.user_message()),
            PortError::Rejected { .. } => ApiError::validation(err.user_message(), Vec::new()),
            PortError::Conflict { message } => ApiError::Conflict(message.clone()),
            _ if err.is_transient() => ApiError::Unavailable(err.user_message()),
            _ => ApiError::Upstream(err.user_message()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::validation("Invalid request body", details)
    }
}
