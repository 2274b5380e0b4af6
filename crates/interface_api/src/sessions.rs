//! Server-side wizard sessions
//!
//! Each wizard run lives under its own [`SessionId`]. Handlers borrow a
//! session only for the duration of a synchronous closure, so the store
//! lock is never held across an await point. Submission goes through
//! [`SessionStore::submit`], which releases the lock while the client port
//! call is pending.
//!
//! A session leaves the store when it is cancelled, when its submission
//! succeeds, or when nothing has touched it for the configured idle time
//! (see [`SessionStore::spawn_sweeper`]).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use core_kernel::{OperationMetadata, SessionId};
use domain_client::{send_payload, ClientError, ClientPort, ClientRegistrationSession, SubmissionReceipt};

use crate::error::ApiError;

const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Entry {
    session: ClientRegistrationSession,
    touched: Instant,
}

impl Entry {
    fn new(session: ClientRegistrationSession) -> Self {
        Self {
            session,
            touched: Instant::now(),
        }
    }
}

type Sessions = Arc<RwLock<HashMap<SessionId, Entry>>>;

/// Wizard sessions keyed by id
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Sessions,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new session and returns a snapshot of it
    pub async fn insert(&self, session: ClientRegistrationSession) -> ClientRegistrationSession {
        debug!(session_id = %session.id(), "Wizard session started");
        self.sessions
            .write()
            .await
            .insert(session.id(), Entry::new(session.clone()));
        session
    }

    /// Snapshot of a session
    pub async fn get(&self, id: SessionId) -> Result<ClientRegistrationSession, ApiError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|entry| entry.session.clone())
            .ok_or_else(|| Self::missing(id))
    }

    /// Runs `f` against a session and returns its result with a snapshot
    pub async fn update<T, F>(&self, id: SessionId, f: F) -> Result<(T, ClientRegistrationSession), ApiError>
    where
        F: FnOnce(&mut ClientRegistrationSession) -> Result<T, ClientError>,
    {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| Self::missing(id))?;
        entry.touched = Instant::now();
        let value = f(&mut entry.session)?;
        Ok((value, entry.session.clone()))
    }

    /// Removes a session, returning it if it existed
    pub async fn remove(&self, id: SessionId) -> Option<ClientRegistrationSession> {
        self.sessions.write().await.remove(&id).map(|entry| entry.session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Submits a session through `port`
    ///
    /// The session is marked in flight under the lock, the port is called
    /// with the lock released, and the outcome is recorded under the lock
    /// again. A concurrent submit for the same session sees the in-flight
    /// flag and is refused. A successful submission closes the session; a
    /// failed one leaves it on the summary step for a retry. If this future
    /// is dropped before the port answers, the submission is released so the
    /// session can be retried.
    pub async fn submit(&self, id: SessionId, port: &dyn ClientPort) -> Result<SubmissionReceipt, ApiError> {
        let ((payload, mode, attempt), _) = self
            .update(id, |session| {
                let payload = session.begin_submit()?;
                Ok((payload, session.mode(), session.submission_attempt()))
            })
            .await?;

        let mut pending = PendingSubmit {
            sessions: self.sessions.clone(),
            id,
            attempt,
            armed: true,
        };

        let metadata = OperationMetadata::for_session(id);
        let outcome = send_payload(port, mode, payload, Some(metadata)).await;

        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| Self::missing(id))?;
        pending.armed = false;
        let receipt = entry
            .session
            .finish_submit(outcome)
            .map_err(|e| ApiError::from(ClientError::from(e)))?;

        sessions.remove(&id);
        debug!(session_id = %id, "Wizard session closed after submit");
        Ok(receipt)
    }

    /// Drops sessions untouched for at least `max_idle`
    ///
    /// Sessions with a submission in flight are kept. Returns how many
    /// sessions were dropped.
    pub async fn expire_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.session.is_submitting() || entry.touched.elapsed() < max_idle);

        let expired = before - sessions.len();
        if expired > 0 {
            info!(expired, remaining = sessions.len(), "Expired idle wizard sessions");
        }
        expired
    }

    /// Runs [`expire_idle`](Self::expire_idle) periodically in the background
    pub fn spawn_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = (max_idle / 4).max(MIN_SWEEP_PERIOD);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                store.expire_idle(max_idle).await;
            }
        })
    }

    fn missing(id: SessionId) -> ApiError {
        ApiError::NotFound(format!("Wizard session not found: {}", id))
    }
}

/// Releases a submission whose request went away before the port answered
struct PendingSubmit {
    sessions: Sessions,
    id: SessionId,
    attempt: u64,
    armed: bool,
}

impl Drop for PendingSubmit {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let (id, attempt) = (self.id, self.attempt);

        if let Ok(mut sessions) = self.sessions.try_write() {
            release(&mut sessions, id, attempt);
            return;
        }

        // lock is busy; finish the release once it frees up
        let sessions = self.sessions.clone();
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                release(&mut *sessions.write().await, id, attempt);
            });
        }
    }
}

fn release(sessions: &mut HashMap<SessionId, Entry>, id: SessionId, attempt: u64) {
    if let Some(entry) = sessions.get_mut(&id) {
        entry.session.abandon_submit(attempt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_client::{InMemoryClientPort, WizardEvent, WizardStep};
    use test_utils::{session_at, StalledClientPort};

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new();
        let result = store.get(SessionId::new_v7()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_submit_outside_summary_never_calls_port() {
        let store = SessionStore::new();
        let session = store.insert(ClientRegistrationSession::new()).await;
        let id = session.id();

        let (step, _) = store
            .update(id, |s| s.transition(WizardEvent::Retreat))
            .await
            .unwrap();
        assert_eq!(step, WizardStep::Basic);

        let port = InMemoryClientPort::new();
        let result = store.submit(id, &port).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(port.write_calls(), 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_successful_submit_closes_session() {
        let store = SessionStore::new();
        let id = store.insert(session_at(WizardStep::Summary)).await.id();

        let port = InMemoryClientPort::new();
        let receipt = store.submit(id, &port).await.unwrap();

        assert!(receipt.redirect_to.starts_with("/clients/"));
        assert!(store.is_empty().await);
        assert!(matches!(store.get(id).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_session() {
        let store = SessionStore::new();
        let id = store.insert(session_at(WizardStep::Summary)).await.id();

        let port = InMemoryClientPort::new();
        port.fail_next(core_kernel::PortError::upstream(503, None)).await;
        assert!(matches!(store.submit(id, &port).await, Err(ApiError::Upstream(_))));

        let session = store.get(id).await.unwrap();
        assert_eq!(session.step(), WizardStep::Summary);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_dropped_submit_is_released() {
        let store = SessionStore::new();
        let id = store.insert(session_at(WizardStep::Summary)).await.id();

        let timed_out = tokio::time::timeout(Duration::from_millis(50), store.submit(id, &StalledClientPort)).await;
        assert!(timed_out.is_err());

        let session = store.get(id).await.unwrap();
        assert!(!session.is_submitting());
        assert_eq!(session.step(), WizardStep::Summary);

        let (step, _) = store.update(id, |s| s.retreat()).await.unwrap();
        assert_eq!(step, WizardStep::Contacts);
        store.update(id, |s| s.advance()).await.unwrap();

        let port = InMemoryClientPort::new();
        let receipt = store.submit(id, &port).await.unwrap();
        assert_eq!(receipt.record.data.full_name, "Maria da Silva");
        assert_eq!(port.write_calls(), 1);
    }

    #[tokio::test]
    async fn test_dropped_submit_allows_cancel() {
        let store = SessionStore::new();
        let id = store.insert(session_at(WizardStep::Summary)).await.id();

        let _ = tokio::time::timeout(Duration::from_millis(20), store.submit(id, &StalledClientPort)).await;

        let (location, _) = store.update(id, |s| s.cancel()).await.unwrap();
        assert_eq!(location, "/clients");
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::new();
        store.insert(ClientRegistrationSession::new()).await;
        store.insert(ClientRegistrationSession::new()).await;

        assert_eq!(store.expire_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(store.expire_idle(Duration::ZERO).await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_in_flight_sessions_survive_expiry() {
        let store = SessionStore::new();
        let id = store.insert(session_at(WizardStep::Summary)).await.id();
        store.update(id, |s| s.begin_submit().map(|_| ())).await.unwrap();

        assert_eq!(store.expire_idle(Duration::ZERO).await, 0);
        assert_eq!(store.len().await, 1);
    }
}
