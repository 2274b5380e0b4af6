//! Startup and kernel-level failures
//!
//! Request-time failures travel as [`PortError`] or as the domain's own
//! error types. `CoreError` covers what goes wrong before a request is
//! served: bad settings, adapters that cannot be built, and value types
//! rejected while loading configuration.

use thiserror::Error;

use crate::money::MoneyError;
use crate::ports::PortError;
use crate::temporal::TemporalError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// A required setting is absent or blank
    #[error("Missing setting {key}")]
    MissingSetting { key: String },

    /// A setting is present but unusable
    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    /// An adapter could not be constructed
    #[error("Adapter {adapter} unavailable: {source}")]
    Adapter {
        adapter: &'static str,
        #[source]
        source: PortError,
    },
}

impl CoreError {
    pub fn missing_setting(key: impl Into<String>) -> Self {
        CoreError::MissingSetting { key: key.into() }
    }

    pub fn invalid_setting(key: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn adapter(adapter: &'static str, source: PortError) -> Self {
        CoreError::Adapter { adapter, source }
    }

    /// Setting key involved, for settings errors
    pub fn setting_key(&self) -> Option<&str> {
        match self {
            CoreError::MissingSetting { key } | CoreError::InvalidSetting { key, .. } => Some(key),
            _ => None,
        }
    }
}
