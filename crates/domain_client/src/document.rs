//! Brazilian tax documents (CPF and CNPJ)
//!
//! Individuals are identified by an 11-digit CPF and companies by a 14-digit
//! CNPJ. Both end in two modulo-11 check digits computed over the preceding
//! digits. The canonical form is digits only; the display form is punctuated
//! (`XXX.XXX.XXX-XX` and `XX.XXX.XXX/XXXX-XX`).
//!
//! The free functions in this module never fail: validators return `false`
//! and formatters return a best-effort string for partial input, so they can
//! run on every keystroke of a form field. [`TaxDocument::parse`] is the
//! strict entry point for callers that need a typed error.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ClientError;
use crate::mask::apply_mask;

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;
const CPF_MASK: &str = "###.###.###-##";
const CNPJ_MASK: &str = "##.###.###/####-##";

/// Which tax document a value is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Individual taxpayer registry, 11 digits
    Cpf,
    /// Company taxpayer registry, 14 digits
    Cnpj,
}

impl DocumentKind {
    /// Number of digits in a complete document
    pub fn digit_count(&self) -> usize {
        match self {
            DocumentKind::Cpf => CPF_LEN,
            DocumentKind::Cnpj => CNPJ_LEN,
        }
    }

    /// Short uppercase label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Cpf => "CPF",
            DocumentKind::Cnpj => "CNPJ",
        }
    }

    /// Guesses the kind from the digit count of the input
    pub fn infer(input: &str) -> Option<Self> {
        match normalize_digits(input).len() {
            CPF_LEN => Some(DocumentKind::Cpf),
            CNPJ_LEN => Some(DocumentKind::Cnpj),
            _ => None,
        }
    }

    pub fn is_valid(&self, input: &str) -> bool {
        match self {
            DocumentKind::Cpf => is_valid_cpf(input),
            DocumentKind::Cnpj => is_valid_cnpj(input),
        }
    }

    pub fn format(&self, input: &str) -> String {
        match self {
            DocumentKind::Cpf => format_cpf(input),
            DocumentKind::Cnpj => format_cnpj(input),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Strips every character that is not an ASCII digit
pub fn normalize_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Checks an individual taxpayer number (CPF)
pub fn is_valid_cpf(input: &str) -> bool {
    let digits = match digit_values(input, CPF_LEN) {
        Some(digits) => digits,
        None => return false,
    };

    cpf_check_digit(&digits[..9]) == digits[9] && cpf_check_digit(&digits[..10]) == digits[10]
}

/// Checks a company taxpayer number (CNPJ)
pub fn is_valid_cnpj(input: &str) -> bool {
    let digits = match digit_values(input, CNPJ_LEN) {
        Some(digits) => digits,
        None => return false,
    };

    cnpj_check_digit(&digits[..12]) == digits[12] && cnpj_check_digit(&digits[..13]) == digits[13]
}

/// Formats as `XXX.XXX.XXX-XX`, partially for short input
pub fn format_cpf(input: &str) -> String {
    apply_mask(input, CPF_MASK)
}

/// Formats as `XX.XXX.XXX/XXXX-XX`, partially for short input
pub fn format_cnpj(input: &str) -> String {
    apply_mask(input, CNPJ_MASK)
}

/// Normalized digit values, or `None` for a wrong length or a repeated digit
fn digit_values(input: &str, expected_len: usize) -> Option<Vec<u32>> {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != expected_len {
        return None;
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return None;
    }
    Some(digits)
}

/// Weights run from `len + 1` down to 2; a remainder of 10 maps to 0
fn cpf_check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    match (sum * 10) % 11 {
        10 | 11 => 0,
        remainder => remainder,
    }
}

/// Weights cycle 2..=9 starting from the rightmost digit
fn cnpj_check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .rev()
        .zip((2..=9).cycle())
        .map(|(d, weight)| d * weight)
        .sum();

    match sum % 11 {
        remainder if remainder < 2 => 0,
        remainder => 11 - remainder,
    }
}

/// A tax document known to be well-formed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxDocument {
    kind: DocumentKind,
    digits: String,
}

impl TaxDocument {
    /// Parses input of the given kind, rejecting anything that fails the check digits
    pub fn parse(kind: DocumentKind, input: &str) -> Result<Self, ClientError> {
        if !kind.is_valid(input) {
            return Err(ClientError::InvalidDocument {
                kind,
                value: input.to_string(),
            });
        }
        Ok(Self {
            kind,
            digits: normalize_digits(input),
        })
    }

    /// Parses input whose kind is inferred from its digit count
    pub fn parse_any(input: &str) -> Result<Self, ClientError> {
        let kind = DocumentKind::infer(input)
            .ok_or_else(|| ClientError::UnknownDocumentKind(input.to_string()))?;
        Self::parse(kind, input)
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Canonical digits-only form
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Punctuated display form
    pub fn display(&self) -> String {
        self.kind.format(&self.digits)
    }
}

impl fmt::Display for TaxDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
