//! API 网关模块
//!
//! 与后端交互的唯一通道：
//! - 在规范化根地址下拼接端点路径（根与路径之间恰好一个斜杠）
//! - 自动注入 `Authorization: Bearer <token>`（调用方显式设置的头优先）
//! - 统一错误归一化：非 2xx -> `Api`，网络失败 -> `Network`，坏响应体 -> `Decode`
//!
//! 传输实现在启动时注入一次（真实 fetch 或固定数据响应器），
//! 请求路径上不再出现演示模式分支。

pub mod mock;
pub mod transport;

#[cfg(test)]
mod tests;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult, extract_error_message};
use crate::protocol::{
    Ack, Capacity, DashboardStats, Equipment, EquipmentCreate, HospitalProfile, HospitalRecord,
    HospitalSummary, Location, ProfileUpdate, RegisterRequest, Service, ServiceCreate,
    TokenResponse,
};
use crate::token::SharedTokenStore;
use transport::{HttpMethod, HttpRequest, SharedHttpClient};

// =========================================================
// 网关本体
// =========================================================

/// API 网关
///
/// 持有规范化根地址、传输实现与凭证存储，整个应用共享同一份配置。
#[derive(Clone)]
pub struct ApiGateway {
    root: String,
    client: SharedHttpClient,
    tokens: SharedTokenStore,
}

impl ApiGateway {
    pub fn new(config: &AppConfig, client: SharedHttpClient, tokens: SharedTokenStore) -> Self {
        Self {
            root: config.api_root.clone(),
            client,
            tokens,
        }
    }

    /// 规范化后的根地址
    pub fn root(&self) -> &str {
        &self.root
    }

    /// 拼接端点路径：忽略路径的前导斜杠，保证恰好一个分隔斜杠
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.root, path.trim_start_matches('/'))
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(&self.url(path), method)
    }

    /// 常规发送：带 Bearer 注入
    async fn send<T: DeserializeOwned>(&self, req: HttpRequest) -> ApiResult<T> {
        self.dispatch(self.with_bearer(req)).await
    }

    /// 匿名发送：登录端点使用，不注入 Bearer
    async fn send_anonymous<T: DeserializeOwned>(&self, req: HttpRequest) -> ApiResult<T> {
        self.dispatch(req).await
    }

    fn with_bearer(&self, req: HttpRequest) -> HttpRequest {
        match self.tokens.get() {
            Some(token) => req.with_default_header("Authorization", &format!("Bearer {}", token)),
            None => req,
        }
    }

    async fn dispatch<T: DeserializeOwned>(&self, req: HttpRequest) -> ApiResult<T> {
        let resp = self.client.send(req).await?;
        if !resp.is_success() {
            return Err(ApiError::api(
                resp.status,
                extract_error_message(resp.status, &resp.body),
            ));
        }
        resp.json()
    }

    // =========================================================
    // 资源命名空间
    // =========================================================

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { gateway: self }
    }

    pub fn hospital(&self) -> HospitalApi<'_> {
        HospitalApi { gateway: self }
    }

    pub fn hospitals(&self) -> HospitalsApi<'_> {
        HospitalsApi { gateway: self }
    }

    pub fn services(&self) -> ServicesApi<'_> {
        ServicesApi { gateway: self }
    }

    pub fn capacity(&self) -> CapacityApi<'_> {
        CapacityApi { gateway: self }
    }

    pub fn location(&self) -> LocationApi<'_> {
        LocationApi { gateway: self }
    }

    pub fn equipment(&self) -> EquipmentApi<'_> {
        EquipmentApi { gateway: self }
    }
}

fn json_body<T: Serialize>(value: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ApiError::decode(e.to_string()))
}

// =========================================================
// 认证
// =========================================================

pub struct AuthApi<'a> {
    gateway: &'a ApiGateway,
}

impl AuthApi<'_> {
    /// 注册医院账号，本地校验失败不发起请求
    pub async fn register(&self, form: &RegisterRequest) -> ApiResult<Ack> {
        form.validate()?;
        let req = self
            .gateway
            .request(HttpMethod::Post, "/auth/register")
            .with_json_body(json_body(form)?);
        self.gateway.send(req).await
    }

    /// 表单编码登录
    ///
    /// 后端的 OAuth2 表单约定把邮箱放在 `username` 字段。
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenResponse> {
        let req = self
            .gateway
            .request(HttpMethod::Post, "/auth/login")
            .with_form_body(&[("username", email), ("password", password)]);
        self.gateway.send_anonymous(req).await
    }
}

// =========================================================
// 当前医院
// =========================================================

pub struct HospitalApi<'a> {
    gateway: &'a ApiGateway,
}

impl HospitalApi<'_> {
    /// 当前登录医院的档案
    pub async fn me(&self) -> ApiResult<HospitalProfile> {
        self.gateway
            .send(self.gateway.request(HttpMethod::Get, "/hospital/me"))
            .await
    }

    /// 更新档案，返回更新后的快照
    pub async fn update_me(&self, update: &ProfileUpdate) -> ApiResult<HospitalProfile> {
        let req = self
            .gateway
            .request(HttpMethod::Put, "/hospital/me")
            .with_json_body(json_body(update)?);
        self.gateway.send(req).await
    }

    /// 控制面板聚合指标
    pub async fn dashboard(&self) -> ApiResult<DashboardStats> {
        self.gateway
            .send(self.gateway.request(HttpMethod::Get, "/hospital/dashboard"))
            .await
    }
}

// =========================================================
// 医院目录
// =========================================================

pub struct HospitalsApi<'a> {
    gateway: &'a ApiGateway,
}

impl HospitalsApi<'_> {
    pub async fn list(&self) -> ApiResult<Vec<HospitalSummary>> {
        self.gateway
            .send(self.gateway.request(HttpMethod::Get, "/hospitals/"))
            .await
    }

    pub async fn get(&self, id: u64) -> ApiResult<HospitalSummary> {
        self.gateway
            .send(
                self.gateway
                    .request(HttpMethod::Get, &format!("/hospitals/{}", id)),
            )
            .await
    }

    /// 指定医院的服务列表
    pub async fn services(&self, id: u64) -> ApiResult<Vec<Service>> {
        self.gateway
            .send(
                self.gateway
                    .request(HttpMethod::Get, &format!("/hospitals/{}/services", id)),
            )
            .await
    }

    pub async fn add_service(&self, id: u64, service: &ServiceCreate) -> ApiResult<Service> {
        let req = self
            .gateway
            .request(HttpMethod::Post, &format!("/hospitals/{}/services", id))
            .with_json_body(json_body(service)?);
        self.gateway.send(req).await
    }

    /// 目录录入（POST /hospitals，此端点无尾部斜杠）
    pub async fn add(&self, record: &HospitalRecord) -> ApiResult<Ack> {
        let req = self
            .gateway
            .request(HttpMethod::Post, "/hospitals")
            .with_json_body(json_body(record)?);
        self.gateway.send(req).await
    }
}

// =========================================================
// 服务管理
// =========================================================

pub struct ServicesApi<'a> {
    gateway: &'a ApiGateway,
}

impl ServicesApi<'_> {
    pub async fn list(&self) -> ApiResult<Vec<Service>> {
        self.gateway
            .send(self.gateway.request(HttpMethod::Get, "/services/"))
            .await
    }

    pub async fn create(&self, service: &ServiceCreate) -> ApiResult<Service> {
        let req = self
            .gateway
            .request(HttpMethod::Post, "/services/")
            .with_json_body(json_body(service)?);
        self.gateway.send(req).await
    }

    pub async fn update(&self, id: u64, service: &ServiceCreate) -> ApiResult<Service> {
        let req = self
            .gateway
            .request(HttpMethod::Put, &format!("/services/{}", id))
            .with_json_body(json_body(service)?);
        self.gateway.send(req).await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<Ack> {
        self.gateway
            .send(
                self.gateway
                    .request(HttpMethod::Delete, &format!("/services/{}", id)),
            )
            .await
    }
}

// =========================================================
// 容量
// =========================================================

pub struct CapacityApi<'a> {
    gateway: &'a ApiGateway,
}

impl CapacityApi<'_> {
    pub async fn get(&self) -> ApiResult<Capacity> {
        self.gateway
            .send(self.gateway.request(HttpMethod::Get, "/capacity/"))
            .await
    }

    /// 更新容量，本地校验失败不发起请求
    pub async fn update(&self, capacity: &Capacity) -> ApiResult<Capacity> {
        capacity.validate()?;
        let req = self
            .gateway
            .request(HttpMethod::Put, "/capacity/")
            .with_json_body(json_body(capacity)?);
        self.gateway.send(req).await
    }
}

// =========================================================
// 地理位置
// =========================================================

pub struct LocationApi<'a> {
    gateway: &'a ApiGateway,
}

impl LocationApi<'_> {
    pub async fn get(&self) -> ApiResult<Location> {
        self.gateway
            .send(self.gateway.request(HttpMethod::Get, "/location/"))
            .await
    }

    /// 创建或覆盖位置记录
    pub async fn upsert(&self, location: &Location) -> ApiResult<Location> {
        let req = self
            .gateway
            .request(HttpMethod::Post, "/location/")
            .with_json_body(json_body(location)?);
        self.gateway.send(req).await
    }
}

// =========================================================
// 设备管理
// =========================================================

pub struct EquipmentApi<'a> {
    gateway: &'a ApiGateway,
}

impl EquipmentApi<'_> {
    pub async fn list(&self) -> ApiResult<Vec<Equipment>> {
        self.gateway
            .send(self.gateway.request(HttpMethod::Get, "/equipment/"))
            .await
    }

    pub async fn create(&self, equipment: &EquipmentCreate) -> ApiResult<Equipment> {
        let req = self
            .gateway
            .request(HttpMethod::Post, "/equipment/")
            .with_json_body(json_body(equipment)?);
        self.gateway.send(req).await
    }

    pub async fn update(&self, id: u64, equipment: &EquipmentCreate) -> ApiResult<Equipment> {
        let req = self
            .gateway
            .request(HttpMethod::Put, &format!("/equipment/{}", id))
            .with_json_body(json_body(equipment)?);
        self.gateway.send(req).await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<Ack> {
        self.gateway
            .send(
                self.gateway
                    .request(HttpMethod::Delete, &format!("/equipment/{}", id)),
            )
            .await
    }
}
