use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::{Activity, Bed, RefreshCw, Stethoscope, Users};
use crate::components::layout::DashboardLayout;
use crate::protocol::DashboardStats;
use crate::session::use_session;

/// 床位占用率对应的状态标签与徽章样式
pub fn occupancy_badge(rate: f64) -> (&'static str, &'static str) {
    if rate >= 90.0 {
        ("Critique", "badge-error")
    } else if rate >= 75.0 {
        ("Élevée", "badge-warning")
    } else if rate >= 50.0 {
        ("Normale", "badge-success")
    } else {
        ("Faible", "badge-info")
    }
}

/// 候诊队列徽章样式，超过 10 人标红
pub fn queue_badge(waiting: i64) -> &'static str {
    if waiting > 10 { "badge-error" } else { "badge-info" }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();

    let (stats, set_stats) = signal(Option::<DashboardStats>::None);
    let (loading_stats, set_loading_stats) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let load_stats = {
        let session = session.clone();
        move || {
            let session = session.clone();
            set_loading_stats.set(true);
            spawn_local(async move {
                match session.gateway().hospital().dashboard().await {
                    Ok(data) => set_stats.set(Some(data)),
                    Err(e) => {
                        set_notification.set(Some((format!("Erreur de chargement : {}", e), true)));
                    }
                }
                set_loading_stats.set(false);
            });
        }
    };

    // 初始加载，等会话恢复完成后触发
    {
        let load_stats = load_stats.clone();
        let is_authenticated = session.is_authenticated_signal();
        let is_loading = session.is_loading_signal();
        Effect::new(move |_| {
            if is_authenticated.get() && !is_loading.get() {
                load_stats();
            }
        });
    }

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    // 指标的派生值，后端未返回前显示零值
    let current = move || stats.get().unwrap_or_default();
    let occupancy = move || current().occupancy_rate;
    let waiting = move || current().waiting_queue;

    view! {
        <DashboardLayout>
            <Show when=move || notification.get().is_some()>
                <div class="toast toast-top toast-end z-50">
                    <div class=move || {
                        let (_, is_err) = notification.get().unwrap();
                        if is_err {
                            "alert alert-error shadow-lg"
                        } else {
                            "alert alert-success shadow-lg"
                        }
                    }>
                        <span>{move || notification.get().unwrap().0}</span>
                    </div>
                </div>
            </Show>

            <div class="flex items-center justify-between">
                <div>
                    <h2 class="text-2xl font-bold">"Vue d'ensemble"</h2>
                    <p class="text-base-content/70 text-sm">"Indicateurs du jour pour votre établissement."</p>
                </div>
                {
                    let load_stats = load_stats.clone();
                    view! {
                        <button on:click=move |_| load_stats() disabled=move || loading_stats.get() class="btn btn-ghost btn-circle">
                            <RefreshCw attr:class=move || if loading_stats.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                        </button>
                    }
                }
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary">
                        <Bed attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Lits disponibles"</div>
                    <div class="stat-value text-primary">{move || current().available_beds}</div>
                </div>

                <div class="stat">
                    <div class="stat-figure text-secondary">
                        <Activity attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Taux d'occupation"</div>
                    <div class="stat-value text-secondary">{move || format!("{:.1}%", occupancy())}</div>
                    <div class="stat-desc">
                        <span class=move || format!("badge {}", occupancy_badge(occupancy()).1)>
                            {move || occupancy_badge(occupancy()).0}
                        </span>
                    </div>
                </div>

                <div class="stat">
                    <div class="stat-figure text-success">
                        <Users attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Médecins actifs"</div>
                    <div class="stat-value text-success">{move || current().active_doctors}</div>
                </div>

                <div class="stat">
                    <div class="stat-figure text-accent">
                        <Stethoscope attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Services actifs"</div>
                    <div class="stat-value text-accent">{move || current().active_services}</div>
                </div>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"Patients aujourd'hui"</div>
                    <div class="stat-value">{move || current().patients_today}</div>
                </div>

                <div class="stat">
                    <div class="stat-title">"Recommandations"</div>
                    <div class="stat-value">{move || current().recommendations_today}</div>
                    <div class="stat-desc">"Orientations reçues aujourd'hui"</div>
                </div>

                <div class="stat">
                    <div class="stat-title">"File d'attente"</div>
                    <div class="stat-value">{move || waiting()}</div>
                    <div class="stat-desc">
                        <span class=move || format!("badge {}", queue_badge(waiting()))>
                            {move || format!("{} en attente", waiting())}
                        </span>
                    </div>
                </div>

                <div class="stat">
                    <div class="stat-title">"Score de l'hôpital"</div>
                    <div class="stat-value">{move || format!("{:.1}", current().hospital_score)}</div>
                    <div class="stat-desc">"Sur 10"</div>
                </div>
            </div>

            <Show when=move || loading_stats.get() && stats.get().is_none()>
                <div class="flex justify-center py-8">
                    <span class="loading loading-spinner loading-md"></span>
                </div>
            </Show>
        </DashboardLayout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_badge_thresholds() {
        assert_eq!(occupancy_badge(95.0), ("Critique", "badge-error"));
        assert_eq!(occupancy_badge(90.0), ("Critique", "badge-error"));
        assert_eq!(occupancy_badge(89.9), ("Élevée", "badge-warning"));
        assert_eq!(occupancy_badge(75.0), ("Élevée", "badge-warning"));
        assert_eq!(occupancy_badge(74.9), ("Normale", "badge-success"));
        assert_eq!(occupancy_badge(50.0), ("Normale", "badge-success"));
        assert_eq!(occupancy_badge(49.9), ("Faible", "badge-info"));
        assert_eq!(occupancy_badge(0.0), ("Faible", "badge-info"));
    }

    #[test]
    fn queue_badge_flags_overflow() {
        assert_eq!(queue_badge(0), "badge-info");
        assert_eq!(queue_badge(10), "badge-info");
        assert_eq!(queue_badge(11), "badge-error");
    }
}
