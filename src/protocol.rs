//! REST 数据模型
//!
//! 与后端交换的全部 DTO。后端字段可能按版本增减，
//! 因此响应结构大量使用 `serde(default)` 宽容解码。

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

fn default_true() -> bool {
    true
}

fn default_country() -> String {
    "Cameroun".to_string()
}

// =========================================================
// 认证
// =========================================================

/// 注册请求体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl RegisterRequest {
    /// 注册表单只采集核心字段，其余走部署默认值
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            region: String::new(),
            country: "Cameroun".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    /// 提交前校验，失败时网关不会发起请求
    pub fn validate(&self) -> ApiResult<()> {
        if self.password.chars().count() < 6 {
            return Err(ApiError::validation(
                "Le mot de passe doit contenir au moins 6 caractères",
            ));
        }
        Ok(())
    }
}

/// 登录响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

// =========================================================
// 医院档案
// =========================================================

/// 当前登录医院的档案快照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HospitalProfile {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    /// 后端未返回时视为有效账号
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub score: f64,
}

/// 档案更新请求，仅携带被修改的字段
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// 医院目录条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HospitalSummary {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// 目录批量录入条目（POST /hospitals）
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HospitalRecord {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

// =========================================================
// 指标与容量
// =========================================================

/// 控制面板聚合指标
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct DashboardStats {
    #[serde(default)]
    pub available_beds: i64,
    #[serde(default)]
    pub occupancy_rate: f64,
    #[serde(default)]
    pub active_doctors: i64,
    #[serde(default)]
    pub active_services: i64,
    #[serde(default)]
    pub hospital_score: f64,
    #[serde(default)]
    pub patients_today: i64,
    #[serde(default)]
    pub recommendations_today: i64,
    #[serde(default)]
    pub waiting_queue: i64,
}

/// 容量记录（字段名与后端 schema 对齐）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Capacity {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub hospital_id: u64,
    #[serde(default)]
    pub beds: u32,
    #[serde(default)]
    pub occupied_beds: u32,
    #[serde(default)]
    pub total_doctors: u32,
    #[serde(default)]
    pub active_doctors: u32,
    #[serde(default)]
    pub total_nurses: u32,
    #[serde(default)]
    pub active_nurses: u32,
    #[serde(default)]
    pub waiting_queue: u32,
    #[serde(default)]
    pub average_wait_time: u32,
}

impl Capacity {
    /// 提交前校验：占用数不得超过对应总数
    pub fn validate(&self) -> ApiResult<()> {
        if self.occupied_beds > self.beds {
            return Err(ApiError::validation(
                "Le nombre de lits occupés ne peut pas dépasser le nombre total de lits",
            ));
        }
        if self.active_doctors > self.total_doctors {
            return Err(ApiError::validation(
                "Le nombre de médecins actifs ne peut pas dépasser le total",
            ));
        }
        if self.active_nurses > self.total_nurses {
            return Err(ApiError::validation(
                "Le nombre d'infirmiers actifs ne peut pas dépasser le total",
            ));
        }
        Ok(())
    }
}

// =========================================================
// 服务、设备、位置
// =========================================================

/// 医院服务条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub hospital_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub doctors: u32,
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// 服务创建/更新请求体
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServiceCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 设备条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Equipment {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub hospital_id: u64,
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub available: bool,
}

/// 设备创建/更新请求体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentCreate {
    pub name: String,
    pub quantity: u32,
    pub available: bool,
}

/// 地理位置记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub hospital_id: u64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            id: 0,
            hospital_id: 0,
            latitude: None,
            longitude: None,
            address: String::new(),
            city: String::new(),
            region: String::new(),
            country: default_country(),
        }
    }
}

// =========================================================
// 通用确认响应
// =========================================================

/// 通用确认响应
///
/// 字段全部可缺省，任何 JSON 对象都能解码成它，
/// 用于只关心成功与否的端点。
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// =========================================================
// 单元测试
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_decodes_from_minimal_payload() {
        // 后端 /hospital/me 只返回一部分字段
        let body = r#"{"id":3,"name":"CHU","email":"chu@example.cm","address":"Rue 1","phone":"+237 600 000 000"}"#;
        let profile: HospitalProfile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.name, "CHU");
        assert!(profile.active);
        assert!(!profile.verified);
        assert_eq!(profile.score, 0.0);
        assert_eq!(profile.country, "");
    }

    #[test]
    fn capacity_decodes_with_defaults() {
        let capacity: Capacity = serde_json::from_str(r#"{"beds":10,"occupied_beds":4}"#).unwrap();
        assert_eq!(capacity.beds, 10);
        assert_eq!(capacity.occupied_beds, 4);
        assert_eq!(capacity.total_nurses, 0);
    }

    #[test]
    fn capacity_rejects_more_occupied_than_beds() {
        let capacity = Capacity {
            beds: 10,
            occupied_beds: 11,
            ..Capacity::default()
        };
        let err = capacity.validate().unwrap_err();
        assert!(err.message().contains("lits occupés"));
    }

    #[test]
    fn capacity_rejects_staff_overflow() {
        let doctors = Capacity {
            total_doctors: 5,
            active_doctors: 6,
            ..Capacity::default()
        };
        assert!(doctors.validate().is_err());

        let nurses = Capacity {
            total_nurses: 2,
            active_nurses: 3,
            ..Capacity::default()
        };
        assert!(nurses.validate().is_err());
    }

    #[test]
    fn capacity_accepts_exact_limits() {
        let capacity = Capacity {
            beds: 10,
            occupied_beds: 10,
            total_doctors: 4,
            active_doctors: 4,
            total_nurses: 6,
            active_nurses: 6,
            ..Capacity::default()
        };
        assert!(capacity.validate().is_ok());
    }

    #[test]
    fn register_defaults_follow_deployment() {
        let form = RegisterRequest::new("CHY", "contact@chy.cm", "secret1");
        assert_eq!(form.country, "Cameroun");
        assert_eq!(form.latitude, 0.0);
        assert_eq!(form.longitude, 0.0);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn register_rejects_short_password() {
        let form = RegisterRequest::new("CHY", "contact@chy.cm", "12345");
        let err = form.validate().unwrap_err();
        assert!(err.message().contains("6 caractères"));
    }

    #[test]
    fn profile_update_skips_untouched_fields() {
        let update = ProfileUpdate {
            name: Some("Nouveau nom".to_string()),
            ..ProfileUpdate::default()
        };
        let body = serde_json::to_string(&update).unwrap();
        assert_eq!(body, r#"{"name":"Nouveau nom"}"#);
    }

    #[test]
    fn ack_decodes_from_any_object() {
        let ack: Ack = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(ack.success);

        // 注册端点返回的是档案加提示语
        let ack: Ack =
            serde_json::from_str(r#"{"id":1,"name":"CHY","message":"Inscription réussie"}"#)
                .unwrap();
        assert!(!ack.success);
        assert_eq!(ack.message, "Inscription réussie");
    }

    #[test]
    fn location_default_country_is_backend_default() {
        let location: Location = serde_json::from_str(r#"{"city":"Yaoundé"}"#).unwrap();
        assert_eq!(location.country, "Cameroun");
        assert_eq!(location.latitude, None);
    }
}
