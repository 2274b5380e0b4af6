//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::ClientId;
use domain_client::{
    Address, AddressDraft, BasicData, ClientPayload, ClientRecord, ClientRegistrationSession,
    Contact, PersonType, WizardEvent, WizardStep,
};

use crate::fixtures::ClientFixtures;

/// Builder for step 1 data
pub struct BasicDataBuilder {
    data: BasicData,
}

impl Default for BasicDataBuilder {
    fn default() -> Self {
        Self::individual()
    }
}

impl BasicDataBuilder {
    /// Starts from a valid individual
    pub fn individual() -> Self {
        Self { data: ClientFixtures::individual() }
    }

    /// Starts from a valid company
    pub fn company() -> Self {
        Self { data: ClientFixtures::company() }
    }

    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.data.full_name = name.into();
        self
    }

    pub fn with_tax_document(mut self, document: impl Into<String>) -> Self {
        self.data.tax_document = document.into();
        self
    }

    pub fn with_registry_id(mut self, registry_id: impl Into<String>) -> Self {
        self.data.registry_id = registry_id.into();
        self
    }

    pub fn with_birthdate(mut self, birthdate: Option<NaiveDate>) -> Self {
        self.data.birthdate = birthdate;
        self
    }

    pub fn with_fantasy_name(mut self, name: impl Into<String>) -> Self {
        self.data.fantasy_name = Some(name.into());
        self
    }

    pub fn build(self) -> BasicData {
        self.data
    }
}

/// Builder for address form input
pub struct AddressDraftBuilder {
    draft: AddressDraft,
}

impl Default for AddressDraftBuilder {
    fn default() -> Self {
        Self::complete()
    }
}

impl AddressDraftBuilder {
    /// Starts with every field filled
    pub fn complete() -> Self {
        Self { draft: ClientFixtures::address_draft() }
    }

    /// Starts with every field blank
    pub fn blank() -> Self {
        Self { draft: AddressDraft::default() }
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.draft.street = street.into();
        self
    }

    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.draft.zip_code = zip_code.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.draft.city = city.into();
        self
    }

    /// Blanks the named field
    pub fn without(mut self, field: &str) -> Self {
        let target = match field {
            "street" => &mut self.draft.street,
            "number" => &mut self.draft.number,
            "neighborhood" => &mut self.draft.neighborhood,
            "zipCode" => &mut self.draft.zip_code,
            "city" => &mut self.draft.city,
            "state" => &mut self.draft.state,
            "country" => &mut self.draft.country,
            other => panic!("unknown address field: {}", other),
        };
        target.clear();
        self
    }

    pub fn build(self) -> AddressDraft {
        self.draft
    }
}

/// Builder for stored client records
pub struct ClientRecordBuilder {
    id: ClientId,
    person_type: PersonType,
    data: BasicData,
    address: Option<Address>,
    contacts: Vec<Contact>,
}

impl Default for ClientRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRecordBuilder {
    /// An individual with an address and one email
    pub fn new() -> Self {
        Self {
            id: ClientId::new_v7(),
            person_type: PersonType::Individual,
            data: ClientFixtures::individual(),
            address: Some(ClientFixtures::address()),
            contacts: vec![ClientFixtures::email()],
        }
    }

    pub fn with_id(mut self, id: ClientId) -> Self {
        self.id = id;
        self
    }

    /// Switches to a company with matching basic data
    pub fn company(mut self) -> Self {
        self.person_type = PersonType::Company;
        self.data = ClientFixtures::company();
        self
    }

    pub fn with_data(mut self, data: BasicData) -> Self {
        self.data = data;
        self
    }

    pub fn without_address(mut self) -> Self {
        self.address = None;
        self
    }

    pub fn with_contacts(mut self, contacts: Vec<Contact>) -> Self {
        self.contacts = contacts;
        self
    }

    pub fn payload(&self) -> ClientPayload {
        ClientPayload {
            person_type: self.person_type,
            data: self.data.clone(),
            address: self.address.clone(),
            contacts: self.contacts.clone(),
        }
    }

    pub fn build(self) -> ClientRecord {
        let payload = self.payload();
        ClientRecord::from_payload(self.id, payload)
    }
}

/// Drives a create session with valid data up to `step`
///
/// Panics if any step along the way fails to validate.
pub fn session_at(step: WizardStep) -> ClientRegistrationSession {
    let mut session = ClientRegistrationSession::new();
    session.set_basic_data(ClientFixtures::individual()).unwrap();

    while session.step() < step {
        match session.step() {
            WizardStep::Address => session.set_address(ClientFixtures::address_draft()).unwrap(),
            WizardStep::Contacts => {
                let email = ClientFixtures::email();
                session.add_contact(email.kind, &email.value).unwrap();
            }
            WizardStep::Basic | WizardStep::Summary => {}
        }
        session
            .transition_on(WizardEvent::Advance, ClientFixtures::today())
            .unwrap();
    }

    session
}
