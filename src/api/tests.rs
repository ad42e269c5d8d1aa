//! 网关行为测试：走脚本化传输，断言真实发出的 URL、头与请求体。

use std::sync::Arc;

use serde_json::json;

use crate::api::ApiGateway;
use crate::api::transport::{HttpMethod, ScriptedHttpClient};
use crate::config::AppConfig;
use crate::error::ApiErrorKind;
use crate::protocol::{Ack, Capacity, ProfileUpdate, RegisterRequest, ServiceCreate};
use crate::token::{MemoryTokenStore, SharedTokenStore};

fn scripted(token: Option<&str>) -> (ApiGateway, Arc<ScriptedHttpClient>) {
    let config = AppConfig::from_values("http://localhost:8000", "");
    let client = Arc::new(ScriptedHttpClient::new());
    let tokens: SharedTokenStore = match token {
        Some(t) => Arc::new(MemoryTokenStore::with_token(t)),
        None => Arc::new(MemoryTokenStore::new()),
    };
    let gateway = ApiGateway::new(&config, client.clone(), tokens);
    (gateway, client)
}

#[test]
fn url_joins_with_exactly_one_slash() {
    let (gateway, _) = scripted(None);
    assert_eq!(
        gateway.url("/hospital/me"),
        "http://localhost:8000/api/v1/hospital/me"
    );
    assert_eq!(
        gateway.url("hospital/me"),
        "http://localhost:8000/api/v1/hospital/me"
    );
}

#[tokio::test]
async fn bearer_header_added_when_token_present() {
    let (gateway, client) = scripted(Some("secret-token"));
    client.mock_response(
        "http://localhost:8000/api/v1/hospital/me",
        200,
        json!({"id": 1, "name": "CHY", "email": "contact@chy.cm"}),
    );

    let profile = gateway.hospital().me().await.unwrap();
    assert_eq!(profile.name, "CHY");

    let requests = client.recorded();
    assert_eq!(requests.len(), 1);
    let (url, method, headers, _) = &requests[0];
    assert_eq!(url, "http://localhost:8000/api/v1/hospital/me");
    assert_eq!(method, "Get");
    assert_eq!(
        headers.get("Authorization").map(String::as_str),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn no_bearer_header_without_token() {
    let (gateway, client) = scripted(None);
    client.mock_response(
        "http://localhost:8000/api/v1/hospital/dashboard",
        200,
        json!({"available_beds": 10}),
    );

    let stats = gateway.hospital().dashboard().await.unwrap();
    assert_eq!(stats.available_beds, 10);

    let requests = client.recorded();
    assert!(!requests[0].2.contains_key("Authorization"));
}

#[tokio::test]
async fn caller_header_wins_over_bearer() {
    let (gateway, client) = scripted(Some("stored-token"));
    client.mock_response(
        "http://localhost:8000/api/v1/hospital/me",
        200,
        json!({"id": 1, "name": "CHY", "email": "contact@chy.cm"}),
    );

    // Explicit caller header must survive the default bearer injection.
    let req = gateway
        .request(HttpMethod::Get, "/hospital/me")
        .with_header("Authorization", "Bearer caller-token");
    let _profile: crate::protocol::HospitalProfile = gateway.send(req).await.unwrap();

    let requests = client.recorded();
    assert_eq!(
        requests[0].2.get("Authorization").map(String::as_str),
        Some("Bearer caller-token")
    );
}

#[tokio::test]
async fn login_sends_form_body_without_bearer() {
    // Even with a stale token around, the login request itself stays anonymous.
    let (gateway, client) = scripted(Some("stale-token"));
    client.mock_response(
        "http://localhost:8000/api/v1/auth/login",
        200,
        json!({"access_token": "fresh", "token_type": "bearer"}),
    );

    let token = gateway
        .auth()
        .login("contact@chy.cm", "pass word+1")
        .await
        .unwrap();
    assert_eq!(token.access_token, "fresh");

    let requests = client.recorded();
    let (url, method, headers, body) = &requests[0];
    assert_eq!(url, "http://localhost:8000/api/v1/auth/login");
    assert_eq!(method, "Post");
    assert_eq!(
        headers.get("Content-Type").map(String::as_str),
        Some("application/x-www-form-urlencoded")
    );
    assert!(!headers.contains_key("Authorization"));
    assert_eq!(
        body.as_deref(),
        Some("username=contact%40chy.cm&password=pass+word%2B1")
    );
}

#[tokio::test]
async fn login_error_surfaces_detail_field() {
    let (gateway, client) = scripted(None);
    client.mock_response(
        "http://localhost:8000/api/v1/auth/login",
        401,
        json!({"detail": "Identifiants invalides"}),
    );

    let err = gateway
        .auth()
        .login("contact@chy.cm", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Api);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Identifiants invalides");
}

#[tokio::test]
async fn unmatched_url_maps_to_api_error() {
    let (gateway, _) = scripted(None);
    let err = gateway.services().list().await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Api);
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn capacity_validation_rejects_before_send() {
    let (gateway, client) = scripted(Some("token"));
    let capacity = Capacity {
        beds: 10,
        occupied_beds: 11,
        ..Capacity::default()
    };

    let err = gateway.capacity().update(&capacity).await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Validation);
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn register_validation_rejects_before_send() {
    let (gateway, client) = scripted(None);
    let form = RegisterRequest::new("CHY", "contact@chy.cm", "12345");

    let err = gateway.auth().register(&form).await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Validation);
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn service_update_puts_to_item_path() {
    let (gateway, client) = scripted(Some("token"));
    client.mock_response(
        "http://localhost:8000/api/v1/services/7",
        200,
        json!({"id": 7, "hospital_id": 1, "name": "Cardiologie", "doctors": 4}),
    );

    let body = ServiceCreate {
        name: "Cardiologie".to_string(),
        description: None,
    };
    let service = gateway.services().update(7, &body).await.unwrap();
    assert_eq!(service.id, 7);
    assert_eq!(service.doctors, 4);

    let requests = client.recorded();
    let (url, method, _, _) = &requests[0];
    assert_eq!(url, "http://localhost:8000/api/v1/services/7");
    assert_eq!(method, "Put");
}

#[tokio::test]
async fn profile_update_serializes_only_set_fields() {
    let (gateway, client) = scripted(Some("token"));
    client.mock_response(
        "http://localhost:8000/api/v1/hospital/me",
        200,
        json!({"id": 1, "name": "Nouveau nom", "email": "contact@chy.cm"}),
    );

    let update = ProfileUpdate {
        name: Some("Nouveau nom".to_string()),
        ..ProfileUpdate::default()
    };
    let profile = gateway.hospital().update_me(&update).await.unwrap();
    assert_eq!(profile.name, "Nouveau nom");

    let requests = client.recorded();
    let (_, method, headers, body) = &requests[0];
    assert_eq!(method, "Put");
    assert_eq!(
        headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(body.as_deref(), Some(r#"{"name":"Nouveau nom"}"#));
}

// =========================================================
// 固定数据传输接到网关上的端到端行为
// =========================================================

fn fixture_gateway() -> ApiGateway {
    let config = AppConfig::from_values("http://localhost:8000", "true");
    ApiGateway::new(
        &config,
        Arc::new(crate::api::mock::FixtureHttpClient::new()),
        Arc::new(MemoryTokenStore::new()),
    )
}

#[tokio::test]
async fn fixture_gateway_serves_typed_dashboard() {
    let gateway = fixture_gateway();
    let stats = gateway.hospital().dashboard().await.unwrap();
    assert_eq!(stats.available_beds, 45);
    assert_eq!(stats.occupancy_rate, 68.0);
}

#[tokio::test]
async fn fixture_gateway_accepts_login() {
    let gateway = fixture_gateway();
    let token = gateway.auth().login("contact@chy.cm", "secret").await.unwrap();
    assert_eq!(token.access_token, "mock_token_123");
    assert_eq!(token.token_type, "bearer");
}

#[tokio::test]
async fn fixture_gateway_acknowledges_unmatched_routes() {
    let gateway = fixture_gateway();
    let ack: Ack = gateway.equipment().delete(5).await.unwrap();
    assert!(ack.success);
}
