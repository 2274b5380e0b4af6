//! Client records and the payload sent to the persistence API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::ClientId;

use crate::address::Address;
use crate::contact::Contact;
use crate::document::DocumentKind;

/// Whether the client is a natural person or a company
///
/// Serialized with the API's codes: `"pf"` (pessoa física) and `"pj"`
/// (pessoa jurídica).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonType {
    #[default]
    #[serde(rename = "pf")]
    Individual,
    #[serde(rename = "pj")]
    Company,
}

impl PersonType {
    /// The tax document a client of this type must present
    pub fn document_kind(&self) -> DocumentKind {
        match self {
            PersonType::Individual => DocumentKind::Cpf,
            PersonType::Company => DocumentKind::Cnpj,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PersonType::Individual => "pf",
            PersonType::Company => "pj",
        }
    }

    /// Label for the registry id field (RG or state registration)
    pub fn registry_label(&self) -> &'static str {
        match self {
            PersonType::Individual => "RG",
            PersonType::Company => "State registration",
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonType::Individual => f.write_str("Individual"),
            PersonType::Company => f.write_str("Company"),
        }
    }
}

impl FromStr for PersonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pf" | "individual" => Ok(PersonType::Individual),
            "pj" | "company" => Ok(PersonType::Company),
            other => Err(format!("Unknown person type: {}", other)),
        }
    }
}

/// Identification data collected in the first wizard step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicData {
    /// Full legal name (or corporate name for companies)
    pub full_name: String,
    /// CPF or CNPJ, as typed
    pub tax_document: String,
    /// RG for individuals, state registration for companies
    pub registry_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fantasy_name: Option<String>,
}

impl BasicData {
    /// True when nothing has been entered yet
    pub fn is_empty(&self) -> bool {
        self.full_name.trim().is_empty()
            && self.tax_document.trim().is_empty()
            && self.registry_id.trim().is_empty()
            && self.birthdate.is_none()
            && self.fantasy_name.as_deref().map_or(true, |n| n.trim().is_empty())
    }
}

/// Body of the create and update calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    pub person_type: PersonType,
    pub data: BasicData,
    /// `null` when the client has no address on file
    pub address: Option<Address>,
    pub contacts: Vec<Contact>,
}

/// A client as stored by the persistence API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: ClientId,
    pub person_type: PersonType,
    pub data: BasicData,
    pub address: Option<Address>,
    pub contacts: Vec<Contact>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientRecord {
    /// Creates a record from a payload under a new identifier
    pub fn from_payload(id: ClientId, payload: ClientPayload) -> Self {
        let now = Utc::now();
        Self {
            id,
            person_type: payload.person_type,
            data: payload.data,
            address: payload.address,
            contacts: payload.contacts,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the stored data with an update payload
    pub fn apply(&mut self, payload: ClientPayload) {
        self.person_type = payload.person_type;
        self.data = payload.data;
        self.address = payload.address;
        self.contacts = payload.contacts;
        self.updated_at = Utc::now();
    }

    /// Name shown in listings: the fantasy name when a company has one
    pub fn display_name(&self) -> &str {
        match (&self.person_type, self.data.fantasy_name.as_deref()) {
            (PersonType::Company, Some(name)) if !name.trim().is_empty() => name,
            _ => &self.data.full_name,
        }
    }

    /// Console location of this record's detail screen
    pub fn location(&self) -> String {
        format!("/clients/{}", self.id.path_segment())
    }
}
