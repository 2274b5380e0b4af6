//! API configuration
//!
//! Loaded from `API_`-prefixed environment variables; any field left unset
//! keeps its default, which runs the server against the in-memory store.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use core_kernel::CoreError;
use domain_client::{ClientPort, InMemoryClientPort, RemoteApiConfig, RemoteClientApi};

/// Where client records are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientSource {
    /// In-process store, lost on restart
    #[default]
    Memory,
    /// The console's REST API at `remote_base_url`
    Remote,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Client persistence backend
    pub client_source: ClientSource,
    /// Base URL of the client API when `client_source` is remote
    pub remote_base_url: Option<String>,
    /// Bearer token for the client API
    pub remote_token: Option<String>,
    /// Request timeout for the client API in seconds
    pub remote_timeout_secs: u64,
    /// Wizard sessions untouched for this long are dropped
    pub session_idle_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            client_source: ClientSource::Memory,
            remote_base_url: None,
            remote_token: None,
            remote_timeout_secs: 30,
            session_idle_secs: 1800,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// Settings for the remote adapter, if a base URL is configured
    pub fn remote_api(&self) -> Option<RemoteApiConfig> {
        let base_url = self.remote_base_url.as_deref()?.trim();
        if base_url.is_empty() {
            return None;
        }
        Some(RemoteApiConfig {
            base_url: base_url.to_string(),
            token: self.remote_token.clone().filter(|t| !t.trim().is_empty()),
            timeout_secs: self.remote_timeout_secs,
        })
    }

    /// Builds the client port selected by `client_source`
    pub fn client_port(&self) -> Result<Arc<dyn ClientPort>, CoreError> {
        match self.client_source {
            ClientSource::Memory => Ok(Arc::new(InMemoryClientPort::new())),
            ClientSource::Remote => {
                let remote = self
                    .remote_api()
                    .ok_or_else(|| CoreError::missing_setting("API_REMOTE_BASE_URL"))?;
                let adapter = RemoteClientApi::new(remote)
                    .map_err(|e| CoreError::adapter("remote-client-api", e))?;
                Ok(Arc::new(adapter))
            }
        }
    }
}
