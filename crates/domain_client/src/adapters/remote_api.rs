//! Remote API Adapter
//!
//! Implements `ClientPort` over the console's REST API:
//!
//! | Operation       | Request                      |
//! |-----------------|------------------------------|
//! | `create_client` | `POST {base}/clients`        |
//! | `update_client` | `PUT {base}/clients/{id}`    |
//! | `get_client`    | `GET {base}/clients/{id}`    |
//! | health check    | `GET {base}/health`          |
//!
//! # Error Handling
//!
//! Non-success responses are decoded as `{ "message": string | string[] }`
//! envelopes and mapped with `PortError::from_status`:
//! - 400/422 -> `PortError::Rejected`
//! - 401/403 -> `PortError::Unauthorized`
//! - 404 -> `PortError::NotFound`
//! - 409 -> `PortError::Conflict`
//! - 5xx -> `PortError::Upstream`
//! - Timeouts -> `PortError::TimedOut`
//! - Connection failures -> `PortError::Unreachable`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use core_kernel::{
    ClientId, PortError, DomainPort, OperationMetadata,
    HealthCheckable, HealthReport, AdapterHealth,
};

use crate::client::{ClientPayload, ClientRecord};
use crate::ports::ClientPort;

const CORRELATION_HEADER: &str = "x-correlation-id";

/// Configuration for the remote API adapter
#[derive(Debug, Clone)]
pub struct RemoteApiConfig {
    /// Base URL of the API (e.g., "https://api.example.com/v1")
    pub base_url: String,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RemoteApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// Client persistence over HTTP
#[derive(Debug, Clone)]
pub struct RemoteClientApi {
    config: RemoteApiConfig,
    client: Client,
}

impl RemoteClientApi {
    /// Creates a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` if the HTTP client cannot be built.
    pub fn new(config: RemoteApiConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortError::Internal {
                message: "Failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { config, client })
    }

    /// Returns the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder, metadata: Option<&OperationMetadata>) -> RequestBuilder {
        let request = match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        match metadata.and_then(|m| m.correlation_id.as_deref()) {
            Some(correlation_id) => request.header(CORRELATION_HEADER, correlation_id),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, operation: &str, request: RequestBuilder) -> Result<T, PortError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;
        Self::decode(operation, response).await
    }

    async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T, PortError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| PortError::Unreachable {
            message: format!("Failed to read response body for {}", operation),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            warn!(operation, status = status.as_u16(), "Remote API call failed");
            return Err(PortError::from_status(status.as_u16(), &body));
        }

        debug!(operation, status = status.as_u16(), "Remote API call succeeded");
        serde_json::from_str(&body).map_err(|e| PortError::Internal {
            message: format!("Unexpected response body for {}", operation),
            source: Some(Box::new(e)),
        })
    }

    fn transport_error(&self, operation: &str, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            warn!(operation, timeout_secs = self.config.timeout_secs, "Remote API call timed out");
            PortError::TimedOut {
                after_ms: self.config.timeout_secs * 1000,
            }
        } else {
            PortError::Unreachable {
                message: format!("{} failed to reach {}", operation, self.config.base_url),
                source: Some(Box::new(error)),
            }
        }
    }
}

impl DomainPort for RemoteClientApi {}

#[async_trait]
impl HealthCheckable for RemoteClientApi {
    async fn health_check(&self) -> HealthReport {
        let start = Instant::now();
        let result = self.client.get(self.url("health")).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let report = HealthReport::new("remote-client-api", AdapterHealth::Healthy).with_latency(latency_ms);
        match result {
            Ok(response) if response.status().is_success() => report,
            Ok(response) => HealthReport {
                status: AdapterHealth::Degraded,
                ..report.with_detail(format!("Health endpoint returned {}", response.status()))
            },
            Err(e) => HealthReport {
                status: AdapterHealth::Unhealthy,
                ..report.with_detail(e.to_string())
            },
        }
    }
}

#[async_trait]
impl ClientPort for RemoteClientApi {
    async fn create_client(
        &self,
        payload: ClientPayload,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClientRecord, PortError> {
        let request = self.client.post(self.url("clients")).json(&payload);
        let request = self.authorize(request, metadata.as_ref());
        self.send("create_client", request).await
    }

    async fn update_client(
        &self,
        id: ClientId,
        payload: ClientPayload,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClientRecord, PortError> {
        let request = self
            .client
            .put(self.url(&format!("clients/{}", id.path_segment())))
            .json(&payload);
        let request = self.authorize(request, metadata.as_ref());
        self.send("update_client", request).await
    }

    async fn get_client(
        &self,
        id: ClientId,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClientRecord, PortError> {
        let request = self.client.get(self.url(&format!("clients/{}", id.path_segment())));
        let request = self.authorize(request, metadata.as_ref());
        self.send("get_client", request).await
    }
}
