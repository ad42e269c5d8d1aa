//! 控制台页面外壳
//!
//! 导航栏、页签与退出按钮。会话恢复期间整个外壳显示加载态，
//! 恢复结束后由路由守卫决定去留。

use leptos::prelude::*;

use crate::components::icons::{HeartPulse, LogOut};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 单个导航页签，高亮当前路由
#[component]
fn NavTab(route: AppRoute, label: &'static str) -> impl IntoView {
    let router = use_router();

    view! {
        <a
            role="tab"
            class=move || {
                if router.current_route().get() == route { "tab tab-active" } else { "tab" }
            }
            on:click=move |_| router.navigate(route)
        >
            {label}
        </a>
    }
}

/// 控制台外壳组件，所有受保护页面套在里面
#[component]
pub fn DashboardLayout(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let is_loading = session.is_loading_signal();
    let profile = session.profile_signal();

    view! {
        <Show
            when=move || !is_loading.get()
            fallback=|| view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
        >
            {
                let session = session.clone();
                let children = children.clone();
                let on_logout = move |_| {
                    session.logout();
                    router.navigate(AppRoute::Login);
                };

                view! {
                    <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
                        <div class="max-w-7xl mx-auto space-y-6">
                            <div class="navbar bg-base-100 rounded-box shadow-xl">
                                <div class="flex-1 gap-2">
                                    <HeartPulse attr:class="text-primary h-6 w-6" />
                                    <a class="btn btn-ghost text-xl">"PulseAI"</a>
                                    <span class="badge badge-neutral hidden md:inline-flex">
                                        {move || profile.get().map(|p| p.name).unwrap_or_default()}
                                    </span>
                                </div>
                                <div class="flex-none">
                                    <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                                        <LogOut attr:class="h-4 w-4" /> "Déconnexion"
                                    </button>
                                </div>
                            </div>

                            <div role="tablist" class="tabs tabs-boxed bg-base-100 shadow">
                                <NavTab route=AppRoute::Dashboard label="Vue d'ensemble" />
                                <NavTab route=AppRoute::Services label="Services" />
                                <NavTab route=AppRoute::Capacity label="Capacité" />
                                <NavTab route=AppRoute::Equipment label="Équipements" />
                                <NavTab route=AppRoute::Location label="Localisation" />
                                <NavTab route=AppRoute::Hospitals label="Annuaire" />
                                <NavTab route=AppRoute::Profile label="Profil" />
                            </div>

                            <main>{children()}</main>
                        </div>
                    </div>
                }
            }
        </Show>
    }
}
