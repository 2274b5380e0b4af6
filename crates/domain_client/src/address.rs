//! Address types
//!
//! The address step is optional. An [`AddressDraft`] holds whatever the user
//! typed; converting it yields no address when every field is blank, a full
//! [`Address`] when every field is filled, and an error otherwise.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::mask::format_zip_code;

/// A complete postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Address {
    /// Formats address for display
    pub fn format(&self) -> String {
        [
            format!("{}, {}", self.street, self.number),
            self.neighborhood.clone(),
            format!("{} - {}", self.city, self.state),
            format!("{} {}", format_zip_code(&self.zip_code), self.country),
        ]
        .join("\n")
    }
}

/// Address fields as typed in the form, possibly blank
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressDraft {
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl AddressDraft {
    /// Field names paired with their current values, in form order
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("street", &self.street),
            ("number", &self.number),
            ("neighborhood", &self.neighborhood),
            ("zipCode", &self.zip_code),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
        ]
    }

    /// True when every field is blank
    pub fn is_blank(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.trim().is_empty())
    }

    /// Names of blank fields
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Converts to an address, applying the all-or-nothing rule
    pub fn to_address(&self) -> Result<Option<Address>, ClientError> {
        if self.is_blank() {
            return Ok(None);
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ClientError::IncompleteAddress {
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        Ok(Some(Address {
            street: self.street.trim().to_string(),
            number: self.number.trim().to_string(),
            neighborhood: self.neighborhood.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
        }))
    }
}

impl From<&Address> for AddressDraft {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            number: address.number.clone(),
            neighborhood: address.neighborhood.clone(),
            zip_code: address.zip_code.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            country: address.country.clone(),
        }
    }
}
