//! Wizard DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_client::{
    Address, AddressDraft, BasicData, ClientRegistrationSession, Contact, ContactKind, PersonType,
    WizardMode, WizardStep,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWizardRequest {
    /// Edit this client instead of creating a new one
    #[serde(default)]
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonTypeRequest {
    pub person_type: PersonType,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicDataRequest {
    #[validate(length(max = 160))]
    pub full_name: String,
    #[validate(length(max = 32))]
    pub tax_document: String,
    #[validate(length(max = 32))]
    pub registry_id: String,
    pub birthdate: Option<NaiveDate>,
    #[validate(length(max = 160))]
    pub fantasy_name: Option<String>,
}

impl From<BasicDataRequest> for BasicData {
    fn from(request: BasicDataRequest) -> Self {
        BasicData {
            full_name: request.full_name,
            tax_document: request.tax_document,
            registry_id: request.registry_id,
            birthdate: request.birthdate,
            fantasy_name: request.fantasy_name.filter(|name| !name.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddContactRequest {
    pub kind: ContactKind,
    #[validate(length(min = 1, max = 254, message = "Contact value is required"))]
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub kind: ContactKind,
    pub value: String,
    pub display: String,
}

impl From<&Contact> for ContactView {
    fn from(contact: &Contact) -> Self {
        Self {
            kind: contact.kind,
            value: contact.value.clone(),
            display: contact.display(),
        }
    }
}

/// Snapshot of a wizard session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub mode: WizardMode,
    pub step: WizardStep,
    pub step_number: u8,
    pub step_title: &'static str,
    pub person_type: PersonType,
    pub basic_data: BasicData,
    pub formatted_document: String,
    pub address_draft: AddressDraft,
    pub address: Option<Address>,
    pub contacts: Vec<ContactView>,
    pub submitting: bool,
}

impl From<&ClientRegistrationSession> for SessionResponse {
    fn from(session: &ClientRegistrationSession) -> Self {
        let step = session.step();
        Self {
            id: *session.id().as_uuid(),
            mode: session.mode(),
            step,
            step_number: step.number(),
            step_title: step.title(),
            person_type: session.person_type(),
            basic_data: session.basic_data().clone(),
            formatted_document: session.formatted_document(),
            address_draft: session.address_draft().clone(),
            address: session.address().cloned(),
            contacts: session.contacts().iter().map(ContactView::from).collect(),
            submitting: session.is_submitting(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub redirect_to: String,
}
