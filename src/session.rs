//! 会话管理模块
//!
//! 凭证与登录状态的唯一权威：
//! - 凭证持久化在注入的 `TokenStore` 中（浏览器下是 localStorage 的 `token` 键）
//! - 状态机 `Unknown -> Restoring -> Authenticated | Anonymous`
//! - 恢复与刷新一律失败即登出：档案拉取失败时清除凭证，绝不带着
//!   无法验证的 token 停留在已登录状态
//!
//! 会话对象经 `provide_context` 注入组件树，页面通过 [`use_session`] 获取。

use leptos::prelude::*;

use crate::api::ApiGateway;
use crate::error::ApiResult;
use crate::protocol::{HospitalProfile, RegisterRequest};
use crate::token::SharedTokenStore;

// =========================================================
// 会话状态
// =========================================================

/// 会话生命周期状态
///
/// `Unknown` 是挂载瞬间的初值，`Restoring` 表示正在用持久化凭证换取档案。
/// 两者都算"加载中"，路由守卫在此期间不做跳转判断。
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Unknown,
    Restoring,
    Authenticated(HospitalProfile),
    Anonymous,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Unknown | Self::Restoring)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn profile(&self) -> Option<&HospitalProfile> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }
}

// =========================================================
// 会话对象
// =========================================================

/// 应用级会话
///
/// 克隆代价低（信号是 Copy，其余是 Arc），事件回调里按值捕获即可。
#[derive(Clone)]
pub struct Session {
    state: RwSignal<SessionState>,
    gateway: ApiGateway,
    tokens: SharedTokenStore,
}

impl Session {
    pub fn new(gateway: ApiGateway, tokens: SharedTokenStore) -> Self {
        Self {
            state: RwSignal::new(SessionState::Unknown),
            gateway,
            tokens,
        }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    pub fn state(&self) -> RwSignal<SessionState> {
        self.state
    }

    /// 供路由守卫使用的派生信号
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated())
    }

    pub fn is_loading_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_loading())
    }

    pub fn profile_signal(&self) -> Signal<Option<HospitalProfile>> {
        let state = self.state;
        Signal::derive(move || state.get().profile().cloned())
    }

    // =========================================================
    // 生命周期操作
    // =========================================================

    /// 启动时恢复会话
    ///
    /// 没有持久化凭证时直接判定为匿名，不发网络请求；
    /// 有凭证但档案拉取失败时清除凭证（失败即登出）。
    pub async fn restore(&self) {
        if self.tokens.get().is_none() {
            self.state.set(SessionState::Anonymous);
            return;
        }

        self.state.set(SessionState::Restoring);
        match self.gateway.hospital().me().await {
            Ok(profile) => self.state.set(SessionState::Authenticated(profile)),
            Err(err) => {
                log_error!("[Session] Restore failed, clearing token: {}", err);
                self.tokens.clear();
                self.state.set(SessionState::Anonymous);
            }
        }
    }

    /// 登录：换取 token、持久化、拉取档案
    ///
    /// token 已写入但档案拉取失败时整体回滚，不留下半登录状态。
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<()> {
        let token = self.gateway.auth().login(email, password).await?;
        self.tokens.set(&token.access_token);

        match self.gateway.hospital().me().await {
            Ok(profile) => {
                self.state.set(SessionState::Authenticated(profile));
                Ok(())
            }
            Err(err) => {
                self.tokens.clear();
                self.state.set(SessionState::Anonymous);
                Err(err)
            }
        }
    }

    /// 注册成功后立即用同一组凭证登录
    pub async fn register(&self, form: &RegisterRequest) -> ApiResult<()> {
        self.gateway.auth().register(form).await?;
        self.login(&form.email, &form.password).await
    }

    /// 重新拉取档案（档案编辑保存后调用）
    ///
    /// 没有凭证时不做任何事；拉取失败按失败即登出处理。
    pub async fn refresh(&self) {
        if self.tokens.get().is_none() {
            return;
        }

        match self.gateway.hospital().me().await {
            Ok(profile) => self.state.set(SessionState::Authenticated(profile)),
            Err(err) => {
                log_error!("[Session] Refresh failed, logging out: {}", err);
                self.logout();
            }
        }
    }

    /// 登出：清除凭证并进入匿名态，可重复调用
    pub fn logout(&self) {
        self.tokens.clear();
        self.state.set(SessionState::Anonymous);
    }
}

// =========================================================
// 上下文接入
// =========================================================

/// 从组件树上下文取会话，App 挂载时必须已经注入
pub fn use_session() -> Session {
    use_context::<Session>().expect("Session not provided, wrap the app with provide_context")
}

/// 挂载后异步恢复会话，不阻塞首帧渲染
pub fn init_session(session: &Session) {
    let session = session.clone();
    leptos::task::spawn_local(async move {
        session.restore().await;
    });
}

// =========================================================
// Tests
// =========================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::transport::ScriptedHttpClient;
    use crate::config::AppConfig;
    use crate::token::{MemoryTokenStore, TokenStore};

    const ME_URL: &str = "http://localhost:8000/api/v1/hospital/me";
    const LOGIN_URL: &str = "http://localhost:8000/api/v1/auth/login";
    const REGISTER_URL: &str = "http://localhost:8000/api/v1/auth/register";

    fn session_with(
        token: Option<&str>,
    ) -> (Session, Arc<ScriptedHttpClient>, Arc<MemoryTokenStore>) {
        let config = AppConfig::from_values("http://localhost:8000", "");
        let client = Arc::new(ScriptedHttpClient::new());
        let tokens = match token {
            Some(t) => Arc::new(MemoryTokenStore::with_token(t)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        let gateway = ApiGateway::new(&config, client.clone(), tokens.clone());
        (Session::new(gateway, tokens.clone()), client, tokens)
    }

    fn profile_json(name: &str) -> serde_json::Value {
        json!({"id": 1, "name": name, "email": "contact@chy.cm"})
    }

    #[tokio::test]
    async fn restore_without_token_skips_network() {
        let (session, client, _) = session_with(None);

        session.restore().await;

        assert_eq!(session.state().get_untracked(), SessionState::Anonymous);
        assert!(client.recorded().is_empty());
    }

    #[tokio::test]
    async fn restore_with_token_authenticates() {
        let (session, client, _) = session_with(Some("persisted"));
        client.mock_response(ME_URL, 200, profile_json("Centre Hospitalier"));

        session.restore().await;

        let state = session.state().get_untracked();
        assert_eq!(state.profile().map(|p| p.name.as_str()), Some("Centre Hospitalier"));

        let requests = client.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].2.get("Authorization").map(String::as_str),
            Some("Bearer persisted")
        );
    }

    #[tokio::test]
    async fn restore_fails_closed_on_rejected_token() {
        let (session, client, tokens) = session_with(Some("expired"));
        client.mock_response(ME_URL, 401, json!({"detail": "Token expiré"}));

        session.restore().await;

        assert_eq!(session.state().get_untracked(), SessionState::Anonymous);
        assert_eq!(tokens.get(), None);
    }

    #[tokio::test]
    async fn login_persists_token_and_loads_profile() {
        let (session, client, tokens) = session_with(None);
        client.mock_response(
            LOGIN_URL,
            200,
            json!({"access_token": "fresh", "token_type": "bearer"}),
        );
        client.mock_response(ME_URL, 200, profile_json("Centre Hospitalier"));

        session.login("contact@chy.cm", "secret").await.unwrap();

        assert_eq!(tokens.get().as_deref(), Some("fresh"));
        assert!(session.state().get_untracked().is_authenticated());
    }

    #[tokio::test]
    async fn login_failure_keeps_store_empty() {
        let (session, client, tokens) = session_with(None);
        client.mock_response(LOGIN_URL, 401, json!({"detail": "Identifiants invalides"}));

        let err = session.login("contact@chy.cm", "wrong").await.unwrap_err();

        assert_eq!(err.message(), "Identifiants invalides");
        assert_eq!(tokens.get(), None);
        assert!(!session.state().get_untracked().is_authenticated());
    }

    #[tokio::test]
    async fn login_rolls_back_when_profile_fetch_fails() {
        let (session, client, tokens) = session_with(None);
        client.mock_response(
            LOGIN_URL,
            200,
            json!({"access_token": "fresh", "token_type": "bearer"}),
        );
        client.mock_response(ME_URL, 500, json!({"detail": "Erreur interne"}));

        let err = session.login("contact@chy.cm", "secret").await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(tokens.get(), None);
        assert_eq!(session.state().get_untracked(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn register_chains_into_login() {
        let (session, client, tokens) = session_with(None);
        client.mock_response(
            REGISTER_URL,
            200,
            json!({"success": true, "message": "Inscription réussie"}),
        );
        client.mock_response(
            LOGIN_URL,
            200,
            json!({"access_token": "fresh", "token_type": "bearer"}),
        );
        client.mock_response(ME_URL, 200, profile_json("Nouveau Centre"));

        let form = RegisterRequest::new("Nouveau Centre", "contact@chy.cm", "secret-6");
        session.register(&form).await.unwrap();

        // Register, then login with the same credentials, then profile fetch.
        let recorded = client.recorded();
        let paths: Vec<&str> = recorded
            .iter()
            .map(|(url, _, _, _)| {
                url.strip_prefix("http://localhost:8000/api/v1")
                    .unwrap_or(url.as_str())
            })
            .collect();
        assert_eq!(paths, vec!["/auth/register", "/auth/login", "/hospital/me"]);
        assert_eq!(tokens.get().as_deref(), Some("fresh"));
        assert!(session.state().get_untracked().is_authenticated());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let (session, client, tokens) = session_with(Some("persisted"));
        client.mock_response(ME_URL, 200, profile_json("Centre Hospitalier"));
        session.restore().await;

        session.logout();
        session.logout();

        assert_eq!(tokens.get(), None);
        assert_eq!(session.state().get_untracked(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn refresh_replaces_profile() {
        let (session, client, _) = session_with(Some("persisted"));
        client.mock_response(ME_URL, 200, profile_json("Ancien nom"));
        session.restore().await;

        client.mock_response(ME_URL, 200, profile_json("Nouveau nom"));
        session.refresh().await;

        let state = session.state().get_untracked();
        assert_eq!(state.profile().map(|p| p.name.as_str()), Some("Nouveau nom"));
    }

    #[tokio::test]
    async fn refresh_without_token_is_a_noop() {
        let (session, client, _) = session_with(None);
        session.restore().await;

        session.refresh().await;

        assert!(client.recorded().is_empty());
        assert_eq!(session.state().get_untracked(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn refresh_failure_logs_out() {
        let (session, client, tokens) = session_with(Some("persisted"));
        client.mock_response(ME_URL, 200, profile_json("Centre Hospitalier"));
        session.restore().await;

        client.mock_response(ME_URL, 401, json!({"detail": "Token expiré"}));
        session.refresh().await;

        assert_eq!(tokens.get(), None);
        assert_eq!(session.state().get_untracked(), SessionState::Anonymous);
    }

    #[test]
    fn loading_covers_unknown_and_restoring() {
        assert!(SessionState::Unknown.is_loading());
        assert!(SessionState::Restoring.is_loading());
        assert!(!SessionState::Anonymous.is_loading());
    }
}
