//! Document tool DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_client::{normalize_digits, DocumentKind};

#[derive(Debug, Deserialize, Validate)]
pub struct DocumentRequest {
    /// Checked as this kind; inferred from the digit count when omitted
    #[serde(default)]
    pub kind: Option<DocumentKind>,
    #[validate(length(max = 64, message = "Document input is too long"))]
    pub value: String,
}

impl DocumentRequest {
    /// The requested kind, or a guess from the digits typed so far
    ///
    /// More than eleven digits can only be a CNPJ; anything shorter is
    /// treated as a CPF in progress.
    pub fn resolved_kind(&self) -> DocumentKind {
        self.kind
            .or_else(|| DocumentKind::infer(&self.value))
            .unwrap_or_else(|| {
                if normalize_digits(&self.value).len() > DocumentKind::Cpf.digit_count() {
                    DocumentKind::Cnpj
                } else {
                    DocumentKind::Cpf
                }
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateDocumentResponse {
    pub kind: DocumentKind,
    pub valid: bool,
    pub digits: String,
    pub formatted: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormatDocumentResponse {
    pub kind: DocumentKind,
    pub formatted: String,
}
