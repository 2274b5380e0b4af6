//! Client registration wizard
//!
//! A registration (or edit) runs through four steps in a fixed order:
//!
//! ```text
//!  Basic ──advance──▶ Address ──advance──▶ Contacts ──advance──▶ Summary ──submit──▶ (reset)
//!    ◀──retreat───────   ◀──retreat────────   ◀──retreat─────────
//! ```
//!
//! Each step owns a slice of the session: basic data and person type in
//! `Basic`, the address draft in `Address`, the contact list in `Contacts`.
//! That slice can only be edited while its step is active, and `advance`
//! only leaves a step once the step's local validation passes. `Summary` is
//! read-only; its only exits are `retreat` and `submit`.
//!
//! Advancing from `Summary` and retreating from `Basic` are no-ops.
//!
//! # Submission
//!
//! Submitting builds a [`ClientPayload`] and calls create or update on the
//! [`ClientPort`] depending on the session mode. On success the session is
//! reset and the caller receives the location of the saved record. On failure
//! the session is left exactly as it was, still on `Summary`, so the user can
//! retry. While a submission is pending, every transition and a second submit
//! are refused.
//!
//! Callers that keep sessions behind a lock can use [`begin_submit`] and
//! [`finish_submit`] around [`send_payload`] to avoid holding the lock across
//! the network call.
//!
//! [`begin_submit`]: ClientRegistrationSession::begin_submit
//! [`finish_submit`]: ClientRegistrationSession::finish_submit

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use core_kernel::{ClientId, OperationMetadata, PortError, SessionId};

use crate::address::{Address, AddressDraft};
use crate::client::{BasicData, ClientPayload, ClientRecord, PersonType};
use crate::contact::{Contact, ContactKind};
use crate::error::{ClientError, SubmissionError};
use crate::ports::ClientPort;
use crate::validation::ClientValidator;

/// Location the console returns to after cancelling
pub const CLIENT_LIST_LOCATION: &str = "/clients";

/// Wizard steps, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Basic = 1,
    Address = 2,
    Contacts = 3,
    Summary = 4,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// The following step, or `None` from `Summary`
    pub fn next(&self) -> Option<Self> {
        match self {
            WizardStep::Basic => Some(WizardStep::Address),
            WizardStep::Address => Some(WizardStep::Contacts),
            WizardStep::Contacts => Some(WizardStep::Summary),
            WizardStep::Summary => None,
        }
    }

    /// The preceding step, or `None` from `Basic`
    pub fn previous(&self) -> Option<Self> {
        match self {
            WizardStep::Basic => None,
            WizardStep::Address => Some(WizardStep::Basic),
            WizardStep::Contacts => Some(WizardStep::Address),
            WizardStep::Summary => Some(WizardStep::Contacts),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Basic => "Basic data",
            WizardStep::Address => "Address",
            WizardStep::Contacts => "Contacts",
            WizardStep::Summary => "Summary",
        }
    }
}

/// Whether the session creates a client or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "clientId", rename_all = "snake_case")]
pub enum WizardMode {
    Create,
    Edit(ClientId),
}

/// Navigation events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardEvent {
    Advance,
    Retreat,
}

/// Outcome of a successful submission
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub record: ClientRecord,
    /// Location of the saved record's screen
    pub redirect_to: String,
}

/// State of one run of the registration wizard
#[derive(Debug, Clone)]
pub struct ClientRegistrationSession {
    id: SessionId,
    mode: WizardMode,
    step: WizardStep,
    person_type: PersonType,
    basic: BasicData,
    address_draft: AddressDraft,
    address: Option<Address>,
    contacts: Vec<Contact>,
    submitting: bool,
    attempts: u64,
}

impl Default for ClientRegistrationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRegistrationSession {
    /// Starts a session that creates a new client
    pub fn new() -> Self {
        Self::blank(SessionId::new_v7())
    }

    fn blank(id: SessionId) -> Self {
        Self {
            id,
            mode: WizardMode::Create,
            step: WizardStep::Basic,
            person_type: PersonType::default(),
            basic: BasicData::default(),
            address_draft: AddressDraft::default(),
            address: None,
            contacts: Vec::new(),
            submitting: false,
            attempts: 0,
        }
    }

    /// Starts a session editing `record`, with every step pre-filled
    pub fn edit(record: &ClientRecord) -> Self {
        let mut session = Self::blank(SessionId::new_v7());
        session.mode = WizardMode::Edit(record.id);
        session.person_type = record.person_type;
        session.basic = record.data.clone();
        session.address_draft = record.address.as_ref().map(AddressDraft::from).unwrap_or_default();
        session.address = record.address.clone();
        session.contacts = record.contacts.clone();
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn person_type(&self) -> PersonType {
        self.person_type
    }

    pub fn basic_data(&self) -> &BasicData {
        &self.basic
    }

    pub fn address_draft(&self) -> &AddressDraft {
        &self.address_draft
    }

    /// The address accepted when leaving the address step
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Number of the latest submission started on this session
    pub fn submission_attempt(&self) -> u64 {
        self.attempts
    }

    /// Tax document formatted for the selected person type
    pub fn formatted_document(&self) -> String {
        self.person_type.document_kind().format(&self.basic.tax_document)
    }

    // ========================================================================
    // Step data
    // ========================================================================

    /// Selects individual or company
    ///
    /// Fields already entered are kept as they are, even when they no longer
    /// fit the new type; validation on advance catches the mismatch.
    pub fn select_person_type(&mut self, person_type: PersonType) -> Result<(), ClientError> {
        self.require_step(WizardStep::Basic)?;
        self.person_type = person_type;
        Ok(())
    }

    /// Replaces the basic data
    pub fn set_basic_data(&mut self, data: BasicData) -> Result<(), ClientError> {
        self.require_step(WizardStep::Basic)?;
        self.basic = data;
        Ok(())
    }

    /// Replaces the address draft
    pub fn set_address(&mut self, draft: AddressDraft) -> Result<(), ClientError> {
        self.require_step(WizardStep::Address)?;
        self.address_draft = draft;
        Ok(())
    }

    /// Blanks every address field
    pub fn clear_address(&mut self) -> Result<(), ClientError> {
        self.set_address(AddressDraft::default())
    }

    /// Appends a contact after validating it
    pub fn add_contact(&mut self, kind: ContactKind, value: &str) -> Result<&Contact, ClientError> {
        self.require_step(WizardStep::Contacts)?;
        let contact = Contact::new(kind, value)?;
        self.contacts.push(contact);
        Ok(&self.contacts[self.contacts.len() - 1])
    }

    /// Removes the contact at `index`, keeping the order of the others
    pub fn remove_contact(&mut self, index: usize) -> Result<Contact, ClientError> {
        self.require_step(WizardStep::Contacts)?;
        if index >= self.contacts.len() {
            return Err(ClientError::ContactNotFound(index));
        }
        Ok(self.contacts.remove(index))
    }

    fn require_step(&self, expected: WizardStep) -> Result<(), ClientError> {
        if self.submitting {
            return Err(ClientError::SubmissionInFlight);
        }
        if self.step != expected {
            return Err(ClientError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Applies a navigation event and returns the resulting step
    ///
    /// A failed validation leaves the session unchanged.
    pub fn transition(&mut self, event: WizardEvent) -> Result<WizardStep, ClientError> {
        self.transition_on(event, Utc::now().date_naive())
    }

    /// Like [`transition`](Self::transition) with an explicit date for the birthdate check
    pub fn transition_on(&mut self, event: WizardEvent, today: NaiveDate) -> Result<WizardStep, ClientError> {
        if self.submitting {
            return Err(ClientError::SubmissionInFlight);
        }

        let from = self.step;
        let to = match (from, event) {
            (WizardStep::Summary, WizardEvent::Advance) => WizardStep::Summary,
            (WizardStep::Basic, WizardEvent::Retreat) => WizardStep::Basic,
            (step, WizardEvent::Advance) => {
                self.leave_step(step, today)?;
                step.next().unwrap_or(step)
            }
            (step, WizardEvent::Retreat) => step.previous().unwrap_or(step),
        };

        if to != from {
            debug!(session_id = %self.id, from = from.number(), to = to.number(), "Wizard step changed");
        }
        self.step = to;
        Ok(to)
    }

    /// Moves to the next step if the current one validates
    pub fn advance(&mut self) -> Result<WizardStep, ClientError> {
        self.transition(WizardEvent::Advance)
    }

    /// Moves to the previous step
    pub fn retreat(&mut self) -> Result<WizardStep, ClientError> {
        self.transition(WizardEvent::Retreat)
    }

    fn leave_step(&mut self, step: WizardStep, today: NaiveDate) -> Result<(), ClientError> {
        match step {
            WizardStep::Basic => {
                ClientValidator::validate_basic_data(self.person_type, &self.basic, today).into_result()
            }
            WizardStep::Address => {
                self.address = self.address_draft.to_address()?;
                Ok(())
            }
            WizardStep::Contacts | WizardStep::Summary => Ok(()),
        }
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Builds the payload from the accumulated data
    pub fn payload(&self) -> ClientPayload {
        ClientPayload {
            person_type: self.person_type,
            data: self.basic.clone(),
            address: self.address.clone(),
            contacts: self.contacts.clone(),
        }
    }

    /// Marks the session as submitting and returns the payload to send
    ///
    /// Fails unless the session is on `Summary` with no submission pending.
    pub fn begin_submit(&mut self) -> Result<ClientPayload, ClientError> {
        self.require_step(WizardStep::Summary)?;
        self.submitting = true;
        self.attempts += 1;
        info!(session_id = %self.id, mode = ?self.mode, attempt = self.attempts, "Submitting client");
        Ok(self.payload())
    }

    /// Records the outcome of the call started by [`begin_submit`](Self::begin_submit)
    ///
    /// Success resets the session; failure keeps every field and the step.
    pub fn finish_submit(
        &mut self,
        outcome: Result<ClientRecord, PortError>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.submitting = false;
        match outcome {
            Ok(record) => {
                info!(session_id = %self.id, client_id = %record.id, "Client saved");
                self.reset();
                Ok(SubmissionReceipt {
                    redirect_to: record.location(),
                    record,
                })
            }
            Err(error) => {
                warn!(session_id = %self.id, error = %error, "Client submission failed");
                Err(SubmissionError::from(error))
            }
        }
    }

    /// Drops a pending submission whose outcome will never arrive
    ///
    /// Only `attempt` is released, so a late call for an older attempt
    /// cannot unlock a newer one. Every field and the step are kept.
    /// Returns whether the session was released.
    pub fn abandon_submit(&mut self, attempt: u64) -> bool {
        if !self.submitting || self.attempts != attempt {
            return false;
        }
        self.submitting = false;
        warn!(session_id = %self.id, attempt, "Submission abandoned before completion");
        true
    }

    /// Submits the session through `port`
    ///
    /// Dropping the returned future before it completes leaves the session
    /// on `Summary` with the submission released, ready for a retry.
    pub async fn submit(&mut self, port: &dyn ClientPort) -> Result<SubmissionReceipt, ClientError> {
        let payload = self.begin_submit()?;
        let metadata = OperationMetadata::for_session(self.id);
        let mode = self.mode;
        let pending = PendingSubmit {
            attempt: self.attempts,
            session: self,
        };
        let outcome = send_payload(port, mode, payload, Some(metadata)).await;
        Ok(pending.session.finish_submit(outcome)?)
    }

    /// Returns the session to a blank create session, keeping its id
    /// and its submission count
    pub fn reset(&mut self) {
        let attempts = self.attempts;
        *self = Self::blank(self.id);
        self.attempts = attempts;
    }

    /// Abandons the run and returns where the console should go next
    pub fn cancel(&mut self) -> Result<&'static str, ClientError> {
        if self.submitting {
            return Err(ClientError::SubmissionInFlight);
        }
        debug!(session_id = %self.id, "Wizard cancelled");
        self.reset();
        Ok(CLIENT_LIST_LOCATION)
    }
}

/// Releases the session if a submission future is dropped mid-call
struct PendingSubmit<'a> {
    session: &'a mut ClientRegistrationSession,
    attempt: u64,
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        // no-op once finish_submit has run
        self.session.abandon_submit(self.attempt);
    }
}

/// Calls create or update on `port` according to `mode`
pub async fn send_payload(
    port: &dyn ClientPort,
    mode: WizardMode,
    payload: ClientPayload,
    metadata: Option<OperationMetadata>,
) -> Result<ClientRecord, PortError> {
    match mode {
        WizardMode::Create => port.create_client(payload, metadata).await,
        WizardMode::Edit(id) => port.update_client(id, payload, metadata).await,
    }
}
