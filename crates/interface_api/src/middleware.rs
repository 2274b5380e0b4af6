//! API middleware

use axum::{body::Body, extract::OriginalUri, http::Request, middleware::Next, response::Response};
use chrono::Utc;
use tracing::{info, warn};

const WIZARD_PREFIX: &str = "/api/v1/wizard/";

/// Logs every request with its status and latency
///
/// Wizard calls also carry the session id from the path, so one
/// registration can be followed across its steps. 5xx answers log at warn.
pub async fn request_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    // nested routers see a stripped uri
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let session = wizard_session(&path).unwrap_or("-").to_string();
    let started = Utc::now();

    let response = next.run(request).await;

    let elapsed_ms = (Utc::now() - started).num_milliseconds();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(%method, %path, session_id = %session, status, elapsed_ms, "Request failed");
    } else {
        info!(%method, %path, session_id = %session, status, elapsed_ms, "Request handled");
    }

    response
}

/// Session segment of a `/api/v1/wizard/{id}/...` path
fn wizard_session(path: &str) -> Option<&str> {
    path.strip_prefix(WIZARD_PREFIX)?
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
