//! PulseAI 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `config`: 启动期配置（编译期环境变量注入）
//! - `api`: API 网关、传输抽象与本地夹具
//! - `session`: 会话状态管理
//! - `web::route` / `web::router`: 路由领域模型与引擎
//! - `components`: UI 组件层

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod api;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod token;

mod components {
    pub mod capacity;
    pub mod dashboard;
    pub mod equipment;
    pub mod hospital_detail;
    pub mod hospitals;
    mod icons;
    mod layout;
    pub mod location;
    pub mod login;
    pub mod profile;
    pub mod register;
    mod service_dialog;
    pub mod services;
}

use crate::api::ApiGateway;
use crate::api::mock::FixtureHttpClient;
use crate::api::transport::{FetchHttpClient, SharedHttpClient};
use crate::components::capacity::CapacityPage;
use crate::components::dashboard::DashboardPage;
use crate::components::equipment::EquipmentPage;
use crate::components::hospital_detail::HospitalDetailPage;
use crate::components::hospitals::HospitalsPage;
use crate::components::location::LocationPage;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::services::ServicesPage;
use crate::config::AppConfig;
use crate::session::{Session, init_session};
use crate::token::{BrowserTokenStore, SharedTokenStore};

use std::sync::Arc;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 仅封装路由与 localStorage；HTTP 与定时器走 gloo-* 系列 crate。
pub(crate) mod web {
    pub mod route;
    pub mod router;
    mod storage;

    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Services => view! { <ServicesPage /> }.into_any(),
        AppRoute::Capacity => view! { <CapacityPage /> }.into_any(),
        AppRoute::Location => view! { <LocationPage /> }.into_any(),
        AppRoute::Equipment => view! { <EquipmentPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Hospitals => view! { <HospitalsPage /> }.into_any(),
        AppRoute::HospitalDetail(id) => view! { <HospitalDetailPage id=id /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page introuvable"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取启动配置，传输实现在此一次性选定
    let config = AppConfig::from_env();
    log_info!(
        "[App] API root: {} (mock: {})",
        config.api_root,
        config.mock_mode
    );

    let client: SharedHttpClient = if config.mock_mode {
        Arc::new(FixtureHttpClient::new())
    } else {
        Arc::new(FetchHttpClient)
    };
    let tokens: SharedTokenStore = Arc::new(BrowserTokenStore);

    // 2. 组装网关与会话上下文
    let gateway = ApiGateway::new(&config, client, tokens.clone());
    let session = Session::new(gateway, tokens);
    provide_context(session.clone());

    // 3. 恢复既有会话（localStorage 中的 token）
    init_session(&session);

    // 4. 获取会话信号，用于注入路由服务（解耦！）
    let is_authenticated = session.is_authenticated_signal();
    let is_loading = session.is_loading_signal();

    view! {
        // 5. 路由器组件：注入会话信号实现守卫
        <Router is_authenticated=is_authenticated is_loading=is_loading>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
