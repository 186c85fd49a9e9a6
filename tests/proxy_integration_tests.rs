//! # Proxy Integration Tests
//!
//! End-to-end tests for the forwarding path: route matching, path
//! templating, query passthrough, header propagation, and the error
//! envelopes minted when a backend is unknown or unreachable.

use atlas_gateway::middleware::Claims;
use atlas_gateway::{build_app, AppState, GatewayConfig};
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JWT_SECRET: &str = "integration-secret";

fn test_config(services: &[(&str, &str)]) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.jwt_secret = JWT_SECRET.to_string();
    config.services = services
        .iter()
        .map(|(name, url)| (name.to_string(), url.to_string()))
        .collect();
    config
}

async fn test_server(config: GatewayConfig) -> TestServer {
    let state = AppState::from_config(config).await.unwrap();
    TestServer::new(build_app(&state).unwrap()).unwrap()
}

fn bearer_token() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = Claims {
        user_id: "user-123".to_string(),
        username: Some("analyst".to_string()),
        roles: vec!["analyst".to_string()],
        exp: now + 3600,
        iat: Some(now),
        token_type: Some("access".to_string()),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_get_substitutes_path_params_and_forwards_query() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/risks/42"))
        .and(query_param("window", "30d"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"risk_id": "42", "score": 0.71}))
                .insert_header("x-backend", "risk-core"),
        )
        .expect(1)
        .mount(&backend)
        .await;

    let server = test_server(test_config(&[("risk-assessment", &backend.uri())])).await;
    let response = server
        .get("/api/v1/risks/42?window=30d")
        .add_header(
            axum::http::header::AUTHORIZATION,
            bearer_token().parse().unwrap(),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-backend"), "risk-core");
    let body: Value = response.json();
    assert_eq!(body["risk_id"], "42");
}

#[tokio::test]
async fn test_post_forwards_body_verbatim() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/scenarios"))
        .and(body_json(json!({"name": "border-closure", "horizon_days": 90})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "scn-7"})))
        .expect(1)
        .mount(&backend)
        .await;

    let server = test_server(test_config(&[("scenario-simulation", &backend.uri())])).await;
    let response = server
        .post("/api/v1/scenarios")
        .add_header(
            axum::http::header::AUTHORIZATION,
            bearer_token().parse().unwrap(),
        )
        .json(&json!({"name": "border-closure", "horizon_days": 90}))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["id"], "scn-7");
}

#[tokio::test]
async fn test_backend_error_status_passes_through() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/briefings"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"error": "upstream db"})))
        .mount(&backend)
        .await;

    let server = test_server(test_config(&[("intelligence-service", &backend.uri())])).await;
    let response = server
        .get("/api/v1/briefings")
        .add_header(
            axum::http::header::AUTHORIZATION,
            bearer_token().parse().unwrap(),
        )
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "upstream db");
}

#[tokio::test]
async fn test_unknown_service_yields_404_envelope() {
    // Route table knows /risks/:id but the registry has no entry for its
    // service, so resolution fails at request time
    let server = test_server(test_config(&[("iam", "http://iam-service:8081")])).await;
    let response = server
        .get("/api/v1/risks/42")
        .add_header(
            axum::http::header::AUTHORIZATION,
            bearer_token().parse().unwrap(),
        )
        .await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Service not found");
    assert_eq!(body["service"], "risk-assessment");
}

#[tokio::test]
async fn test_unreachable_backend_yields_503_envelope() {
    // Nothing listens on this port
    let server = test_server(test_config(&[("risk-assessment", "http://127.0.0.1:9")])).await;
    let response = server
        .get("/api/v1/risks/42")
        .add_header(
            axum::http::header::AUTHORIZATION,
            bearer_token().parse().unwrap(),
        )
        .await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "Service unavailable");
    assert_eq!(body["service"], "risk-assessment");
    assert!(body["details"].as_str().is_some());
}

#[tokio::test]
async fn test_request_id_propagates_upstream() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/risks/trends"))
        .and(header("x-request-id", "trace-me-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trends": []})))
        .expect(1)
        .mount(&backend)
        .await;

    let server = test_server(test_config(&[("risk-assessment", &backend.uri())])).await;
    let response = server
        .get("/api/v1/risks/trends")
        .add_header(
            axum::http::header::AUTHORIZATION,
            bearer_token().parse().unwrap(),
        )
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            "trace-me-7".parse().unwrap(),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), "trace-me-7");
}

#[tokio::test]
async fn test_auth_endpoints_proxy_to_iam_without_token() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"access_token": "t", "token_type": "Bearer"}})),
        )
        .expect(1)
        .mount(&backend)
        .await;

    let server = test_server(test_config(&[("iam", &backend.uri())])).await;
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({"username": "analyst", "password": "pw"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["token_type"], "Bearer");
}
