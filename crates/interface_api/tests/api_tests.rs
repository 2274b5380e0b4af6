//! HTTP tests for the client console API
//!
//! Drives the router in process with `oneshot`, backed by the in-memory
//! client store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use core_kernel::PortError;
use domain_client::InMemoryClientPort;
use interface_api::{config::ApiConfig, create_router};
use test_utils::{ClientFixtures, ClientRecordBuilder, DocumentFixtures};

fn app_with(port: Arc<InMemoryClientPort>) -> Router {
    create_router(ApiConfig::default(), port)
}

fn app() -> Router {
    app_with(Arc::new(InMemoryClientPort::new()))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn start(app: &Router) -> String {
    let (status, body) = call(app, Method::POST, "/api/v1/wizard", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn individual_json() -> Value {
    serde_json::to_value(ClientFixtures::individual()).unwrap()
}

async fn walk_to_summary(app: &Router, id: &str) {
    let base = format!("/api/v1/wizard/{}", id);
    let (status, _) = call(app, Method::PUT, &format!("{}/basic", base), Some(individual_json())).await;
    assert_eq!(status, StatusCode::OK);
    for _ in 0..3 {
        let (status, _) = call(app, Method::POST, &format!("{}/advance", base), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_checks_client_store() {
        let (status, body) = call(&app(), Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["client_store"]["adapter"], "memory-client-port");
        assert_eq!(body["open_sessions"], 0);
    }

    #[tokio::test]
    async fn test_readiness_counts_open_sessions() {
        let app = app();
        start(&app).await;
        let (_, body) = call(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(body["open_sessions"], 1);
    }
}

mod documents {
    use super::*;

    #[tokio::test]
    async fn test_validate_infers_cpf() {
        let (status, body) = call(
            &app(),
            Method::POST,
            "/api/v1/documents/validate",
            Some(json!({ "value": DocumentFixtures::valid_cpf() })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "cpf");
        assert_eq!(body["valid"], true);
        assert_eq!(body["digits"], DocumentFixtures::valid_cpf());
        assert_eq!(body["formatted"], DocumentFixtures::formatted_cpf());
    }

    #[tokio::test]
    async fn test_validate_with_explicit_kind() {
        let (_, body) = call(
            &app(),
            Method::POST,
            "/api/v1/documents/validate",
            Some(json!({ "kind": "cnpj", "value": DocumentFixtures::valid_cpf() })),
        )
        .await;

        assert_eq!(body["kind"], "cnpj");
        assert_eq!(body["valid"], false);
    }

    #[tokio::test]
    async fn test_invalid_cnpj_is_not_an_error() {
        let (status, body) = call(
            &app(),
            Method::POST,
            "/api/v1/documents/validate",
            Some(json!({ "value": DocumentFixtures::invalid_cnpj() })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "cnpj");
        assert_eq!(body["valid"], false);
    }

    #[tokio::test]
    async fn test_format_partial_input() {
        let (status, body) = call(
            &app(),
            Method::POST,
            "/api/v1/documents/format",
            Some(json!({ "value": "1122233300" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "cpf");
        assert_eq!(body["formatted"], "112.223.330-0");

        let (_, body) = call(
            &app(),
            Method::POST,
            "/api/v1/documents/format",
            Some(json!({ "value": "112223330001" })),
        )
        .await;
        assert_eq!(body["kind"], "cnpj");
        assert_eq!(body["formatted"], "11.222.333/0001");
    }

    #[tokio::test]
    async fn test_oversized_input_rejected() {
        let (status, body) = call(
            &app(),
            Method::POST,
            "/api/v1/documents/validate",
            Some(json!({ "value": "1".repeat(100) })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"][0]["field"], "value");
    }
}

mod wizard_flow {
    use super::*;

    #[tokio::test]
    async fn test_new_session_snapshot() {
        let app = app();
        let id = start(&app).await;

        let (status, body) = call(&app, Method::GET, &format!("/api/v1/wizard/{}", id), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "create");
        assert_eq!(body["step"], "basic");
        assert_eq!(body["stepNumber"], 1);
        assert_eq!(body["personType"], "pf");
        assert_eq!(body["submitting"], false);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let uri = format!("/api/v1/wizard/{}", uuid::Uuid::nil());
        let (status, body) = call(&app(), Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_invalid_document_blocks_advance() {
        let app = app();
        let id = start(&app).await;
        let mut data = individual_json();
        data["taxDocument"] = json!(DocumentFixtures::invalid_cpf());

        call(&app, Method::PUT, &format!("/api/v1/wizard/{}/basic", id), Some(data)).await;
        let (status, body) = call(&app, Method::POST, &format!("/api/v1/wizard/{}/advance", id), None).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"][0]["field"], "taxDocument");

        let (_, snapshot) = call(&app, Method::GET, &format!("/api/v1/wizard/{}", id), None).await;
        assert_eq!(snapshot["step"], "basic");
    }

    #[tokio::test]
    async fn test_partial_address_rejected() {
        let app = app();
        let id = start(&app).await;
        let base = format!("/api/v1/wizard/{}", id);
        call(&app, Method::PUT, &format!("{}/basic", base), Some(individual_json())).await;
        call(&app, Method::POST, &format!("{}/advance", base), None).await;

        let (status, _) = call(&app, Method::PUT, &format!("{}/address", base), Some(json!({ "city": "Recife" }))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&app, Method::POST, &format!("{}/advance", base), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_contacts_add_and_remove() {
        let app = app();
        let id = start(&app).await;
        let base = format!("/api/v1/wizard/{}", id);
        call(&app, Method::PUT, &format!("{}/basic", base), Some(individual_json())).await;
        call(&app, Method::POST, &format!("{}/advance", base), None).await;
        call(&app, Method::POST, &format!("{}/advance", base), None).await;

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("{}/contacts", base),
            Some(json!({ "kind": "phone", "value": "11987654321" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["contacts"][0]["display"], "(11) 98765-4321");

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("{}/contacts", base),
            Some(json!({ "kind": "email", "value": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"][0]["field"], "value");

        let (status, body) = call(&app, Method::DELETE, &format!("{}/contacts/0", base), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["contacts"].as_array().unwrap().is_empty());

        let (status, _) = call(&app, Method::DELETE, &format!("{}/contacts/5", base), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_step_is_conflict() {
        let app = app();
        let id = start(&app).await;

        let (status, body) = call(&app, Method::POST, &format!("/api/v1/wizard/{}/submit", id), None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }

    #[tokio::test]
    async fn test_submit_creates_client_and_closes_session() {
        let port = Arc::new(InMemoryClientPort::new());
        let app = app_with(port.clone());
        let id = start(&app).await;
        walk_to_summary(&app, &id).await;

        let (status, body) = call(&app, Method::POST, &format!("/api/v1/wizard/{}/submit", id), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["data"]["fullName"], "Maria da Silva");
        assert!(body["record"]["address"].is_null());
        let redirect = body["redirectTo"].as_str().unwrap();
        assert!(redirect.starts_with("/clients/"));
        assert_eq!(port.len().await, 1);

        let (status, _) = call(&app, Method::GET, &format!("/api/v1/wizard/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, Method::POST, &format!("/api/v1/wizard/{}/submit", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(port.write_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_submit_is_bad_gateway_and_keeps_session() {
        let port = Arc::new(InMemoryClientPort::new());
        port.fail_next(PortError::upstream(503, Some("Try again later".to_string())))
            .await;
        let app = app_with(port.clone());
        let id = start(&app).await;
        walk_to_summary(&app, &id).await;

        let (status, body) = call(&app, Method::POST, &format!("/api/v1/wizard/{}/submit", id), None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Try again later");

        let (_, snapshot) = call(&app, Method::GET, &format!("/api/v1/wizard/{}", id), None).await;
        assert_eq!(snapshot["step"], "summary");
        assert_eq!(snapshot["submitting"], false);
        assert_eq!(snapshot["basicData"]["fullName"], "Maria da Silva");

        let (status, _) = call(&app, Method::POST, &format!("/api/v1/wizard/{}/submit", id), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cancel_removes_session() {
        let app = app();
        let id = start(&app).await;

        let (status, body) = call(&app, Method::DELETE, &format!("/api/v1/wizard/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redirectTo"], "/clients");

        let (status, _) = call(&app, Method::GET, &format!("/api/v1/wizard/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod edit_flow {
    use super::*;

    #[tokio::test]
    async fn test_edit_session_prefilled() {
        let record = ClientRecordBuilder::new().company().build();
        let port = Arc::new(InMemoryClientPort::with_clients(vec![record.clone()]).await);
        let app = app_with(port);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/wizard",
            Some(json!({ "clientId": record.id.as_uuid() })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["mode"], "edit");
        assert_eq!(body["clientId"], record.id.as_uuid().to_string());
        assert_eq!(body["personType"], "pj");
        assert_eq!(body["formattedDocument"], DocumentFixtures::formatted_cnpj());
    }

    #[tokio::test]
    async fn test_edit_unknown_client_is_404() {
        let (status, _) = call(
            &app(),
            Method::POST,
            "/api/v1/wizard",
            Some(json!({ "clientId": uuid::Uuid::nil() })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
