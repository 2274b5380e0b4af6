//! Contact entries (email addresses and phone numbers)

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::document::normalize_digits;
use crate::error::ClientError;
use crate::mask::format_phone;

/// Minimum digits in a phone number: area code plus nine-digit mobile
pub const MIN_PHONE_DIGITS: usize = 11;

/// Contact kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Email,
    Phone,
}

/// A single validated contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub kind: ContactKind,
    pub value: String,
}

impl Contact {
    /// Creates a contact, checking the value against its kind
    pub fn new(kind: ContactKind, value: impl Into<String>) -> Result<Self, ClientError> {
        let value = value.into().trim().to_string();
        match kind {
            ContactKind::Email if !is_valid_email(&value) => {
                Err(ClientError::invalid_contact(format!("'{}' is not a valid email", value)))
            }
            ContactKind::Phone if !is_valid_phone(&value) => Err(ClientError::invalid_contact(format!(
                "'{}' must have at least {} digits",
                value, MIN_PHONE_DIGITS
            ))),
            _ => Ok(Self { kind, value }),
        }
    }

    pub fn email(value: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(ContactKind::Email, value)
    }

    pub fn phone(value: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(ContactKind::Phone, value)
    }

    /// Value formatted for display
    pub fn display(&self) -> String {
        match self.kind {
            ContactKind::Email => self.value.clone(),
            ContactKind::Phone => format_phone(&self.value),
        }
    }
}

/// Standard `local@domain` shape check
pub fn is_valid_email(value: &str) -> bool {
    value.validate_email()
}

pub fn is_valid_phone(value: &str) -> bool {
    normalize_digits(value).len() >= MIN_PHONE_DIGITS
}
