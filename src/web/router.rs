//! 浏览器路由模块
//!
//! History API 的全部读写集中在这里，路由状态用信号承载，
//! 程序内跳转统一经过 [`RouterService::navigate`]。
//!
//! 守卫规则集中在 [`resolve_target`]：
//! - 受保护路由 + 未认证，送回登录页
//! - 登录/注册页 + 已认证，送到面板
//!
//! 会话恢复期间不判定，恢复结束后由 Effect 纠正落点。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

// =========================================================
// History 读写
// =========================================================

/// History 写入方式
#[derive(Clone, Copy)]
enum HistoryWrite {
    /// 常规跳转，可用后退键回来
    Push,
    /// 守卫重定向，不在历史里留下被拦截的地址
    Replace,
}

/// 读取地址栏当前路径
fn browser_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 把路径写进浏览器历史，History 不可用时静默跳过
fn write_history(path: &str, mode: HistoryWrite) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = match mode {
        HistoryWrite::Push => history.push_state_with_url(&JsValue::NULL, "", Some(path)),
        HistoryWrite::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(path)),
    };
}

// =========================================================
// 守卫
// =========================================================

/// 计算目标路由经守卫后的实际落点
///
/// 返回值与 `target` 不同即发生了重定向。`restoring` 为真表示
/// 会话仍在恢复，此时放行，待状态落定后再由 Effect 纠正。
fn resolve_target(target: AppRoute, is_auth: bool, restoring: bool) -> AppRoute {
    if target.requires_auth() && !is_auth && !restoring {
        return AppRoute::auth_failure_redirect();
    }
    if target.should_redirect_when_authenticated() && is_auth {
        return AppRoute::auth_success_redirect();
    }
    target
}

// =========================================================
// 路由服务
// =========================================================

/// 路由服务
///
/// `Copy`，可直接被事件闭包捕获。认证与加载状态以信号注入，
/// 本模块不认识会话类型。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    is_authenticated: Signal<bool>,
    is_loading: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>, is_loading: Signal<bool>) -> Self {
        // 首屏路由从地址栏解析
        let (current_route, set_route) = signal(AppRoute::from_path(&browser_path()));
        Self {
            current_route,
            set_route,
            is_authenticated,
            is_loading,
        }
    }

    /// 当前路由（只读信号）
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 程序内跳转入口，经守卫后写历史并更新路由信号
    pub fn navigate(&self, target: AppRoute) {
        let landed = resolve_target(
            target,
            self.is_authenticated.get_untracked(),
            self.is_loading.get_untracked(),
        );
        if landed != target {
            log_info!("[Router] {:?} refusé, redirection vers {:?}", target, landed);
        }
        write_history(&landed.to_path(), HistoryWrite::Push);
        self.set_route.set(landed);
    }

    /// 监听浏览器前进/后退，popstate 走同一套守卫
    fn listen_popstate(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let is_loading = self.is_loading;

        let on_popstate = Closure::<dyn Fn()>::new(move || {
            let requested = AppRoute::from_path(&browser_path());
            let landed = resolve_target(
                requested,
                is_authenticated.get_untracked(),
                is_loading.get_untracked(),
            );
            if landed != requested {
                // 被拦截的历史项用重定向目标顶掉
                write_history(&landed.to_path(), HistoryWrite::Replace);
            }
            set_route.set(landed);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
        }
        // 监听器伴随整个页面生命周期，闭包交给 JS 侧持有
        on_popstate.forget();
    }

    /// 认证状态变化时纠正当前落点
    ///
    /// 覆盖三种时刻：恢复完成、登录成功、登出（含凭证失效）。
    fn watch_session(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let is_loading = self.is_loading;

        Effect::new(move |_| {
            // 恢复期间不动，状态落定后这里会再跑一次
            if is_loading.get() {
                return;
            }

            let here = current_route.get_untracked();
            let landed = resolve_target(here, is_authenticated.get(), false);
            if landed != here {
                log_info!("[Router] Session mise à jour, {:?} -> {:?}", here, landed);
                write_history(&landed.to_path(), HistoryWrite::Push);
                set_route.set(landed);
            }
        });
    }
}

// =========================================================
// Context 接入与组件
// =========================================================

fn provide_router(is_authenticated: Signal<bool>, is_loading: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated, is_loading);
    router.listen_popstate();
    router.watch_session();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务，Router 组件挂载后才可调用
pub fn use_router() -> RouterService {
    use_context::<RouterService>().expect("RouterService not provided, mount Router first")
}

/// 路由根组件，放在 App 最外层
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 会话恢复状态信号
    is_loading: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, is_loading);
    children()
}

/// 路由出口，按当前路由渲染对应页面
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数，返回当前路由对应的视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    move || matcher(router.current_route().get())
}
