//! Port plumbing shared by every adapter
//!
//! Domain crates declare their port traits on top of [`DomainPort`] and
//! [`HealthCheckable`]. Every adapter reports failures as [`PortError`], so
//! the wizard and the HTTP layer handle an in-memory store and the remote
//! REST API the same way.
//!
//! ```text
//!   wizard / handlers
//!          │
//!          ▼
//!     ClientPort ──────────────┐
//!      │                       │
//!   InMemoryClientPort   RemoteClientApi ──► REST API
//! ```
//!
//! # Remote error bodies
//!
//! The REST API reports failures as `{ "message": "..." }` or
//! `{ "message": ["...", "..."] }`. [`ErrorEnvelope`] decodes both and
//! [`PortError::from_status`] keeps the first message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::identifiers::SessionId;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Shown when the backend could not be reached at all
pub const UNREACHABLE_MESSAGE: &str = "Could not reach the server, please try again";

/// Failure of a port call
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{}", not_found_text(.resource, .id))]
    NotFound {
        resource: String,
        id: String,
        /// The backend's own wording, shown as is when present
        message: Option<String>,
    },

    /// The backend refused the payload (400 or 422)
    #[error("Rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// No response was received
    #[error("Unreachable: {message}")]
    Unreachable {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("No response within {after_ms}ms")]
    TimedOut { after_ms: u64 },

    /// The backend answered with a 5xx status
    #[error("Upstream failure with status {status}")]
    Upstream { status: u16, message: Option<String> },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl PortError {
    pub fn not_found(resource: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
            message: None,
        }
    }

    /// A payload refused as unprocessable (422)
    pub fn rejected(message: impl Into<String>) -> Self {
        PortError::Rejected {
            status: 422,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        PortError::Unreachable {
            message: message.into(),
            source: None,
        }
    }

    /// A 5xx answer, optionally with the server's message
    pub fn upstream(status: u16, message: Option<String>) -> Self {
        PortError::Upstream { status, message }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Maps a non-success HTTP answer from the REST API
    ///
    /// The body is decoded as an [`ErrorEnvelope`] when possible; its
    /// message is kept verbatim for every status.
    pub fn from_status(status: u16, body: &str) -> Self {
        let envelope_message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.first_message().map(str::to_string));
        let message = || {
            envelope_message
                .clone()
                .unwrap_or_else(|| format!("Request failed with status {}", status))
        };

        match status {
            400 | 422 => PortError::Rejected { status, message: message() },
            401 | 403 => PortError::Unauthorized { message: message() },
            404 => PortError::NotFound {
                resource: "Resource".to_string(),
                id: String::new(),
                message: envelope_message.clone(),
            },
            409 => PortError::Conflict { message: message() },
            500..=599 => PortError::Upstream {
                status,
                message: Some(message()),
            },
            _ => PortError::Internal {
                message: message(),
                source: None,
            },
        }
    }

    /// Text for the console's error notification
    pub fn user_message(&self) -> String {
        match self {
            PortError::NotFound { message: Some(message), .. } => message.clone(),
            PortError::NotFound { resource, id, .. } => not_found_text(resource, id),
            PortError::Rejected { message, .. }
            | PortError::Conflict { message }
            | PortError::Unauthorized { message }
            | PortError::Internal { message, .. } => message.clone(),
            PortError::Unreachable { .. } | PortError::TimedOut { .. } => UNREACHABLE_MESSAGE.to_string(),
            PortError::Upstream { status, message } => message
                .clone()
                .unwrap_or_else(|| format!("Server error ({})", status)),
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Unreachable { .. } | PortError::TimedOut { .. } | PortError::Upstream { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

fn not_found_text(resource: &str, id: &str) -> String {
    if id.is_empty() {
        format!("{} not found", resource)
    } else {
        format!("{} not found: {}", resource, id)
    }
}

/// The `message` field of a remote error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeMessage {
    One(String),
    Many(Vec<String>),
}

/// Error body returned by the REST API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: EnvelopeMessage,
}

impl ErrorEnvelope {
    /// The message, or the first element of a list
    pub fn first_message(&self) -> Option<&str> {
        match &self.message {
            EnvelopeMessage::One(message) => Some(message.as_str()),
            EnvelopeMessage::Many(messages) => messages.first().map(String::as_str),
        }
    }
}

/// Bound shared by all port traits
pub trait DomainPort: Send + Sync + 'static {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    /// Answering, but not as expected
    Degraded,
    Unhealthy,
    Unknown,
}

impl AdapterHealth {
    /// Whether the service can take traffic with this adapter
    pub fn is_ready(&self) -> bool {
        matches!(self, AdapterHealth::Healthy | AdapterHealth::Degraded)
    }
}

/// Outcome of probing one adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub adapter: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    pub detail: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn new(adapter: impl Into<String>, status: AdapterHealth) -> Self {
        Self {
            adapter: adapter.into(),
            status,
            latency_ms: 0,
            detail: None,
            checked_at: Utc::now(),
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthReport;
}

/// Request-scoped data forwarded to the backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationMetadata {
    /// Sent as `x-correlation-id`
    pub correlation_id: Option<String>,
    pub initiated_by: Option<String>,
}

impl OperationMetadata {
    pub fn with_correlation_id(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
            ..Default::default()
        }
    }

    /// Correlates backend calls with the wizard session that made them
    pub fn for_session(session: SessionId) -> Self {
        Self::with_correlation_id(session.to_string())
    }

    pub fn initiated_by(mut self, actor: impl Into<String>) -> Self {
        self.initiated_by = Some(actor.into());
        self
    }
}
