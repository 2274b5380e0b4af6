//! Client domain errors
//!
//! This module defines the error types of the client domain: local
//! validation failures that block a wizard step, misuse of the wizard
//! (acting on the wrong step, submitting twice), and the submission error
//! reported after the remote create/update call fails.

use thiserror::Error;

use core_kernel::PortError;

use crate::document::DocumentKind;
use crate::validation::FieldError;
use crate::wizard::WizardStep;

/// Errors that can occur in the client domain
#[derive(Debug, Error)]
pub enum ClientError {
    /// A tax document failed the length or check-digit test
    #[error("Invalid {kind}: {value}")]
    InvalidDocument { kind: DocumentKind, value: String },

    /// The digit count matches neither a CPF nor a CNPJ
    #[error("Not a CPF or CNPJ: {0}")]
    UnknownDocumentKind(String),

    /// One or more fields failed validation
    #[error("Validation failed: {}", join_fields(.0))]
    ValidationFailed(Vec<FieldError>),

    /// Some but not all address fields were filled
    #[error("Address is incomplete, missing: {}", .missing.join(", "))]
    IncompleteAddress { missing: Vec<String> },

    /// A contact value does not match its kind
    #[error("Invalid contact: {0}")]
    InvalidContact(String),

    /// No contact at the given position
    #[error("Contact not found at position {0}")]
    ContactNotFound(usize),

    /// The operation belongs to another wizard step
    #[error("Operation requires step {expected:?}, session is at {actual:?}")]
    WrongStep { expected: WizardStep, actual: WizardStep },

    /// A submission for this session is still pending
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// The remote create/update call failed
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl ClientError {
    /// Creates an InvalidContact error with a message
    pub fn invalid_contact(message: impl Into<String>) -> Self {
        ClientError::InvalidContact(message.into())
    }

    /// Returns true for failures detected locally, before any network call
    pub fn is_local(&self) -> bool {
        !matches!(self, ClientError::Submission(_))
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A failed submission, carrying the message shown to the user
///
/// The session that produced it is left untouched so the user can retry.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SubmissionError {
    /// Human-readable message for the notification
    pub message: String,
    /// Whether retrying may succeed without changing the data
    pub transient: bool,
    #[source]
    pub source: PortError,
}

impl From<PortError> for SubmissionError {
    fn from(source: PortError) -> Self {
        Self {
            message: source.user_message(),
            transient: source.is_transient(),
            source,
        }
    }
}
