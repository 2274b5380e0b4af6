//! HTTP API Layer
//!
//! This crate provides the REST API for the client console using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Document tools, wizard sessions, health checks
//! - **Sessions**: Server-side store of wizard runs, one per `SessionId`
//! - **Middleware**: Request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{router, AppState};
//!
//! let port = config.client_port()?;
//! let state = AppState::new(config.clone(), port);
//! state.sessions.spawn_sweeper(config.session_idle());
//! axum::serve(listener, router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod sessions;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put, delete},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_client::ClientPort;

use crate::config::ApiConfig;
use crate::middleware::request_log_middleware;
use crate::handlers::{documents, health, wizard};
use crate::sessions::SessionStore;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub port: Arc<dyn ClientPort>,
    pub sessions: SessionStore,
}

impl AppState {
    /// State with a fresh session store
    ///
    /// `port` is where wizard submissions are persisted.
    pub fn new(config: ApiConfig, port: Arc<dyn ClientPort>) -> Self {
        Self {
            config,
            port,
            sessions: SessionStore::new(),
        }
    }
}

/// Builds the router with a fresh session store
pub fn create_router(config: ApiConfig, port: Arc<dyn ClientPort>) -> Router {
    router(AppState::new(config, port))
}

/// Builds the router over existing state
///
/// Health checks live at the root; everything else is under `/api/v1` and
/// goes through the request log.
pub fn router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let document_routes = Router::new()
        .route("/validate", post(documents::validate_document))
        .route("/format", post(documents::format_document));

    let wizard_routes = Router::new()
        .route("/", post(wizard::start_wizard))
        .route("/:id", get(wizard::get_wizard).delete(wizard::cancel))
        .route("/:id/person-type", put(wizard::select_person_type))
        .route("/:id/basic", put(wizard::set_basic_data))
        .route("/:id/address", put(wizard::set_address))
        .route("/:id/contacts", post(wizard::add_contact))
        .route("/:id/contacts/:index", delete(wizard::remove_contact))
        .route("/:id/advance", post(wizard::advance))
        .route("/:id/retreat", post(wizard::retreat))
        .route("/:id/submit", post(wizard::submit));

    let api_routes = Router::new()
        .nest("/documents", document_routes)
        .nest("/wizard", wizard_routes)
        .layer(axum_middleware::from_fn(request_log_middleware));

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
