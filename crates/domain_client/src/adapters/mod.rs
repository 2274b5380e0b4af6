//! External Adapters for the Client Domain
//!
//! This module provides adapter implementations that connect the client
//! domain to external systems of record. They implement the `ClientPort`
//! trait, so the wizard can run against the remote API or the in-memory
//! store without changes.
//!
//! # Available Adapters
//!
//! - **RemoteClientApi**: Calls the console's REST API
//! - **InMemoryClientPort**: In-process store (re-exported from the ports module)

pub mod remote_api;

pub use remote_api::{RemoteClientApi, RemoteApiConfig};
