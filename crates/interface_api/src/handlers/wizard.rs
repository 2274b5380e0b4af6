//! Wizard handlers
//!
//! Every mutating endpoint returns the session snapshot after the change so
//! the console can re-render the current step from one response.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{ClientId, SessionId};
use domain_client::{ClientRegistrationSession, SubmissionReceipt, WizardEvent};

use crate::dto::wizard::*;
use crate::{AppState, error::ApiError};

type SessionResult = Result<Json<SessionResponse>, ApiError>;

fn snapshot(session: &ClientRegistrationSession) -> Json<SessionResponse> {
    Json(SessionResponse::from(session))
}

/// Starts a create session, or an edit session when a client id is given
pub async fn start_wizard(
    State(state): State<AppState>,
    request: Option<Json<StartWizardRequest>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let session = match request.client_id {
        Some(client_id) => {
            let record = state.port.get_client(ClientId::from_uuid(client_id), None).await?;
            ClientRegistrationSession::edit(&record)
        }
        None => ClientRegistrationSession::new(),
    };

    let session = state.sessions.insert(session).await;
    Ok((StatusCode::CREATED, snapshot(&session)))
}

/// Gets a session snapshot
pub async fn get_wizard(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResult {
    let session = state.sessions.get(SessionId::from_uuid(id)).await?;
    Ok(snapshot(&session))
}

/// Selects individual or company on step 1
pub async fn select_person_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PersonTypeRequest>,
) -> SessionResult {
    let (_, session) = state
        .sessions
        .update(SessionId::from_uuid(id), |s| s.select_person_type(request.person_type))
        .await?;
    Ok(snapshot(&session))
}

/// Replaces the basic data on step 1
pub async fn set_basic_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BasicDataRequest>,
) -> SessionResult {
    request.validate()?;
    let (_, session) = state
        .sessions
        .update(SessionId::from_uuid(id), |s| s.set_basic_data(request.into()))
        .await?;
    Ok(snapshot(&session))
}

/// Replaces the address draft on step 2
pub async fn set_address(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<domain_client::AddressDraft>,
) -> SessionResult {
    let (_, session) = state
        .sessions
        .update(SessionId::from_uuid(id), |s| s.set_address(draft))
        .await?;
    Ok(snapshot(&session))
}

/// Appends a contact on step 3
pub async fn add_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddContactRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    request.validate()?;
    let (_, session) = state
        .sessions
        .update(SessionId::from_uuid(id), |s| {
            s.add_contact(request.kind, &request.value).map(|_| ())
        })
        .await?;
    Ok((StatusCode::CREATED, snapshot(&session)))
}

/// Removes the contact at `index` on step 3
pub async fn remove_contact(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> SessionResult {
    let (_, session) = state
        .sessions
        .update(SessionId::from_uuid(id), |s| s.remove_contact(index))
        .await?;
    Ok(snapshot(&session))
}

/// Moves to the next step if the current one validates
pub async fn advance(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResult {
    navigate(state, id, WizardEvent::Advance).await
}

/// Moves to the previous step
pub async fn retreat(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResult {
    navigate(state, id, WizardEvent::Retreat).await
}

async fn navigate(state: AppState, id: Uuid, event: WizardEvent) -> SessionResult {
    let (_, session) = state
        .sessions
        .update(SessionId::from_uuid(id), |s| s.transition(event))
        .await?;
    Ok(snapshot(&session))
}

/// Submits the session from the summary step
///
/// On success the session is closed and the response carries the saved
/// record and where to navigate; on failure the session is left as is.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionReceipt>, ApiError> {
    let receipt = state
        .sessions
        .submit(SessionId::from_uuid(id), state.port.as_ref())
        .await?;
    info!(client_id = %receipt.record.id, redirect_to = %receipt.redirect_to, "Wizard submitted");
    Ok(Json(receipt))
}

/// Abandons the session
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelResponse>, ApiError> {
    let id = SessionId::from_uuid(id);
    let (location, _) = state.sessions.update(id, |s| s.cancel()).await?;
    state.sessions.remove(id).await;

    Ok(Json(CancelResponse {
        redirect_to: location.to_string(),
    }))
}
