//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys。
//! 定义应用的所有路由、路径互转与认证守卫属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 控制面板首页 (需要认证)
    Dashboard,
    /// 服务管理
    Services,
    /// 容量管理
    Capacity,
    /// 地理位置
    Location,
    /// 设备管理
    Equipment,
    /// 医院档案
    Profile,
    /// 医院目录
    Hospitals,
    /// 目录中单个医院的详情
    HospitalDetail(u64),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        if let Some(rest) = path.strip_prefix("/dashboard/hospitals/") {
            return match rest.parse::<u64>() {
                Ok(id) => Self::HospitalDetail(id),
                Err(_) => Self::NotFound,
            };
        }

        match path {
            "" | "/" | "/login" | "/auth/login" => Self::Login,
            "/register" | "/auth/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/dashboard/services" => Self::Services,
            "/dashboard/capacity" => Self::Capacity,
            "/dashboard/location" => Self::Location,
            "/dashboard/equipment" => Self::Equipment,
            "/dashboard/profile" => Self::Profile,
            "/dashboard/hospitals" => Self::Hospitals,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的规范 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/auth/login".to_string(),
            Self::Register => "/auth/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Services => "/dashboard/services".to_string(),
            Self::Capacity => "/dashboard/capacity".to_string(),
            Self::Location => "/dashboard/location".to_string(),
            Self::Equipment => "/dashboard/equipment".to_string(),
            Self::Profile => "/dashboard/profile".to_string(),
            Self::Hospitals => "/dashboard/hospitals".to_string(),
            Self::HospitalDetail(id) => format!("/dashboard/hospitals/{}", id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::Services
                | Self::Capacity
                | Self::Location
                | Self::Equipment
                | Self::Profile
                | Self::Hospitals
                | Self::HospitalDetail(_)
        )
    }

    /// 定义已认证用户是否应该离开此路由（登录/注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录/注册页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_paths_resolve_to_login() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path(""), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/auth/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/register"), AppRoute::Register);
    }

    #[test]
    fn canonical_paths_round_trip() {
        let routes = [
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::Services,
            AppRoute::Capacity,
            AppRoute::Location,
            AppRoute::Equipment,
            AppRoute::Profile,
            AppRoute::Hospitals,
            AppRoute::HospitalDetail(42),
            AppRoute::NotFound,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn hospital_detail_parses_numeric_id_only() {
        assert_eq!(
            AppRoute::from_path("/dashboard/hospitals/7"),
            AppRoute::HospitalDetail(7)
        );
        assert_eq!(
            AppRoute::from_path("/dashboard/hospitals/abc"),
            AppRoute::NotFound
        );
        assert_eq!(
            AppRoute::from_path("/dashboard/hospitals/"),
            AppRoute::NotFound
        );
    }

    #[test]
    fn guard_matrix() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::Register.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(AppRoute::Services.requires_auth());
        assert!(AppRoute::HospitalDetail(1).requires_auth());

        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert!(AppRoute::Register.should_redirect_when_authenticated());
        assert!(!AppRoute::Dashboard.should_redirect_when_authenticated());
    }

    #[test]
    fn unknown_path_is_not_found() {
        assert_eq!(AppRoute::from_path("/admin"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/dashboard/unknown"), AppRoute::NotFound);
    }
}
