//! Client validation rules
//!
//! Each wizard step validates its own slice of the client locally, before
//! anything is sent over the network.
//!
//! # Validation Rules
//!
//! ## Basic data (step 1)
//! - Full name is required
//! - Tax document must be a valid CPF for individuals, CNPJ for companies
//! - Registry id (RG or state registration) is required
//! - Birthdate, when given, cannot be in the future
//!
//! Addresses (step 2) are checked by [`crate::AddressDraft::to_address`] and
//! contacts (step 3) by [`crate::Contact::new`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::{BasicData, PersonType};
use crate::error::ClientError;

/// A validation failure tied to a form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Result of validating a step
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Whether the data is valid
    pub is_valid: bool,
    /// Field errors, in form order
    pub errors: Vec<FieldError>,
    /// Non-blocking remarks
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
        self.is_valid = false;
    }

    /// Adds a warning to the result
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merges another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// First error message for a field, if any
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Converts into a `Result`, dropping warnings
    pub fn into_result(self) -> Result<(), ClientError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ClientError::ValidationFailed(self.errors))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for the data collected by the registration wizard
pub struct ClientValidator;

impl ClientValidator {
    /// Validates step 1 for the selected person type
    ///
    /// `today` is the reference date for the birthdate check.
    pub fn validate_basic_data(person_type: PersonType, data: &BasicData, today: NaiveDate) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if data.full_name.trim().is_empty() {
            result.add_error("fullName", "Full name is required");
        }

        let kind = person_type.document_kind();
        if data.tax_document.trim().is_empty() {
            result.add_error("taxDocument", format!("{} is required", kind));
        } else if !kind.is_valid(&data.tax_document) {
            result.add_error("taxDocument", format!("Invalid {}", kind));
        }

        if data.registry_id.trim().is_empty() {
            result.add_error("registryId", format!("{} is required", person_type.registry_label()));
        }

        if let Some(birthdate) = data.birthdate {
            if birthdate > today {
                result.add_error("birthdate", "Birthdate cannot be in the future");
            }
            if person_type == PersonType::Company {
                result.add_warning("Birthdate is not used for companies");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn individual() -> BasicData {
        BasicData {
            full_name: "Maria da Silva".to_string(),
            tax_document: "111.444.777-35".to_string(),
            registry_id: "12.345.678-9".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 12),
            fantasy_name: None,
        }
    }

    #[test]
    fn test_valid_individual() {
        let result = ClientValidator::validate_basic_data(PersonType::Individual, &individual(), today());
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_cpf_rejected_for_company() {
        let result = ClientValidator::validate_basic_data(PersonType::Company, &individual(), today());
        assert!(!result.is_valid);
        assert_eq!(result.error_for("taxDocument"), Some("Invalid CNPJ"));
    }

    #[test]
    fn test_missing_fields_reported_separately() {
        let result = ClientValidator::validate_basic_data(PersonType::Individual, &BasicData::default(), today());
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.error_for("taxDocument"), Some("CPF is required"));
    }

    #[test]
    fn test_future_birthdate() {
        let mut data = individual();
        data.birthdate = NaiveDate::from_ymd_opt(2030, 1, 1);
        let result = ClientValidator::validate_basic_data(PersonType::Individual, &data, today());
        assert!(result.error_for("birthdate").is_some());
    }

    #[test]
    fn test_merge_propagates_failure() {
        let mut result = ValidationResult::ok();
        let mut other = ValidationResult::ok();
        other.add_error("value", "Invalid email");
        result.merge(other);
        assert!(!result.is_valid);
        assert!(result.into_result().is_err());
    }
}
