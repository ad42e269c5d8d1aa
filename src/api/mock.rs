//! 演示模式响应器
//!
//! `HttpClient` 的第二个实现：不访问网络，按 (路径, 方法) 返回固定数据。
//! 浏览器环境下模拟 500ms 网络延迟，原生环境（测试）直接返回。
//! 返回值只由路径与方法决定，反复调用结果一致。

use serde_json::{Value, json};

use crate::api::transport::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::error::ApiResult;

/// 模拟网络延迟（毫秒）
const SIMULATED_LATENCY_MS: u32 = 500;

/// 演示模式下创建服务返回的固定 id
const CREATED_SERVICE_ID: u64 = 99;

/// 固定数据响应器
#[derive(Clone, Default)]
pub struct FixtureHttpClient;

impl FixtureHttpClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FixtureHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        #[cfg(target_arch = "wasm32")]
        gloo_timers::future::TimeoutFuture::new(SIMULATED_LATENCY_MS).await;

        let path = endpoint_path(&req.url);
        let (status, body) = respond(path, req.method, req.body.as_deref());
        Ok(HttpResponse {
            status,
            body: body.to_string(),
        })
    }
}

/// 从完整 URL 中截出 API 根之后的端点路径
fn endpoint_path(url: &str) -> &str {
    match url.find("/api/v1") {
        Some(idx) => &url[idx + "/api/v1".len()..],
        None => url,
    }
}

/// 端点匹配
///
/// 未覆盖的端点统一返回通用确认体。
fn respond(path: &str, method: HttpMethod, body: Option<&str>) -> (u16, Value) {
    if path.contains("/auth/register") && method == HttpMethod::Post {
        return (200, register_fixture());
    }
    if path.contains("/auth/login") && method == HttpMethod::Post {
        return (
            200,
            json!({ "access_token": "mock_token_123", "token_type": "bearer" }),
        );
    }
    if path.contains("/hospital/me") {
        return (200, user_fixture());
    }
    if path.contains("/hospital/dashboard") {
        return (200, dashboard_fixture());
    }
    if path.contains("/services") {
        if method == HttpMethod::Post {
            return (200, created_service(body));
        }
        return (200, services_fixture());
    }
    if path.contains("/capacity") {
        return (200, capacity_fixture());
    }
    if path.contains("/location") {
        return (200, location_fixture());
    }
    (200, json!({ "success": true }))
}

/// 创建服务：回显请求体并补上固定 id
fn created_service(body: Option<&str>) -> Value {
    let mut value = body
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
        .unwrap_or_else(|| json!({}));
    if let Some(map) = value.as_object_mut() {
        map.insert("id".to_string(), json!(CREATED_SERVICE_ID));
        map.entry("hospital_id").or_insert(json!(1));
    }
    value
}

// =========================================================
// 固定数据
// =========================================================

fn user_fixture() -> Value {
    json!({
        "id": 1,
        "name": "Centre Hospitalier de Yaoundé",
        "email": "contact@chy.cm",
        "phone": "+237 699 123 456",
        "address": "Avenue de l'Indépendance",
        "city": "Yaoundé",
        "country": "Cameroun",
        "active": true,
        "verified": true,
        "score": 8.5
    })
}

fn register_fixture() -> Value {
    let mut value = user_fixture();
    if let Some(map) = value.as_object_mut() {
        map.insert(
            "message".to_string(),
            json!("Inscription réussie. Vous pouvez maintenant vous connecter."),
        );
    }
    value
}

fn dashboard_fixture() -> Value {
    json!({
        "available_beds": 45,
        "occupancy_rate": 68.0,
        "active_doctors": 23,
        "active_services": 8,
        "hospital_score": 8.5,
        "patients_today": 127,
        "recommendations_today": 34,
        "waiting_queue": 12
    })
}

fn services_fixture() -> Value {
    json!([
        {
            "id": 1,
            "hospital_id": 1,
            "name": "Urgences",
            "description": "Service d'urgences 24h/24",
            "doctors": 5,
            "equipment": ["Défibrillateur", "Moniteur cardiaque"]
        },
        {
            "id": 2,
            "hospital_id": 1,
            "name": "Cardiologie",
            "description": "Soins cardiovasculaires",
            "doctors": 3,
            "equipment": ["ECG", "Échographe"]
        },
        {
            "id": 3,
            "hospital_id": 1,
            "name": "Maternité",
            "description": "Suivi de grossesse et accouchements",
            "doctors": 4,
            "equipment": ["Table d'accouchement", "Couveuse"]
        }
    ])
}

fn capacity_fixture() -> Value {
    json!({
        "id": 1,
        "hospital_id": 1,
        "beds": 120,
        "occupied_beds": 75,
        "total_doctors": 23,
        "active_doctors": 23,
        "total_nurses": 45,
        "active_nurses": 45,
        "waiting_queue": 12,
        "average_wait_time": 25
    })
}

fn location_fixture() -> Value {
    json!({
        "id": 1,
        "hospital_id": 1,
        "address": "Avenue de l'Indépendance",
        "city": "Yaoundé",
        "region": "Centre",
        "country": "Cameroun",
        "latitude": 3.8480,
        "longitude": 11.5021
    })
}

// =========================================================
// 单元测试
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Capacity, DashboardStats, HospitalProfile, Location, Service};

    async fn send(path: &str, method: HttpMethod, body: Option<Value>) -> HttpResponse {
        let mut req = HttpRequest::new(&format!("http://localhost:8000/api/v1{}", path), method);
        if let Some(body) = body {
            req = req.with_json_body(body);
        }
        FixtureHttpClient::new().send(req).await.unwrap()
    }

    #[tokio::test]
    async fn dashboard_fixture_is_stable() {
        let first = send("/hospital/dashboard", HttpMethod::Get, None).await;
        let second = send("/hospital/dashboard", HttpMethod::Get, None).await;
        assert_eq!(first, second);

        let stats: DashboardStats = first.json().unwrap();
        assert_eq!(stats.available_beds, 45);
        assert_eq!(stats.occupancy_rate, 68.0);
        assert_eq!(stats.waiting_queue, 12);
    }

    #[tokio::test]
    async fn login_fixture_returns_canned_token() {
        let resp = send("/auth/login", HttpMethod::Post, None).await;
        let value: Value = resp.json().unwrap();
        assert_eq!(value["access_token"], "mock_token_123");
        assert_eq!(value["token_type"], "bearer");
    }

    #[tokio::test]
    async fn profile_fixture_decodes() {
        let resp = send("/hospital/me", HttpMethod::Get, None).await;
        let profile: HospitalProfile = resp.json().unwrap();
        assert_eq!(profile.name, "Centre Hospitalier de Yaoundé");
        assert_eq!(profile.email, "contact@chy.cm");
        assert!(profile.verified);
    }

    #[tokio::test]
    async fn services_fixture_decodes() {
        let resp = send("/services/", HttpMethod::Get, None).await;
        let services: Vec<Service> = resp.json().unwrap();
        assert_eq!(services.len(), 3);
        assert_eq!(services[0].name, "Urgences");
        assert_eq!(services[0].doctors, 5);
    }

    #[tokio::test]
    async fn capacity_and_location_fixtures_decode() {
        let capacity: Capacity = send("/capacity/", HttpMethod::Get, None)
            .await
            .json()
            .unwrap();
        assert_eq!(capacity.beds, 120);
        assert_eq!(capacity.occupied_beds, 75);
        assert!(capacity.validate().is_ok());

        let location: Location = send("/location/", HttpMethod::Get, None)
            .await
            .json()
            .unwrap();
        assert_eq!(location.city, "Yaoundé");
        assert_eq!(location.latitude, Some(3.8480));
    }

    #[tokio::test]
    async fn created_service_uses_fixed_id() {
        let resp = send(
            "/services/",
            HttpMethod::Post,
            Some(json!({ "name": "Radiologie", "description": "Imagerie" })),
        )
        .await;
        let service: Service = resp.json().unwrap();
        assert_eq!(service.id, CREATED_SERVICE_ID);
        assert_eq!(service.hospital_id, 1);
        assert_eq!(service.name, "Radiologie");
    }

    #[tokio::test]
    async fn unmatched_path_returns_generic_ack() {
        let resp = send("/equipment/", HttpMethod::Get, None).await;
        let value: Value = resp.json().unwrap();
        assert_eq!(value, json!({ "success": true }));
    }

    #[tokio::test]
    async fn url_without_suffix_still_matches() {
        // 根地址未带 /api/v1 时退化为整串匹配
        let req = HttpRequest::new("http://localhost:9999/hospital/dashboard", HttpMethod::Get);
        let resp = FixtureHttpClient::new().send(req).await.unwrap();
        let stats: DashboardStats = resp.json().unwrap();
        assert_eq!(stats.active_doctors, 23);
    }
}
