use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::ArrowLeft;
use crate::components::layout::DashboardLayout;
use crate::components::service_dialog::AddServiceDialog;
use crate::protocol::{HospitalSummary, Service, ServiceCreate};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 目录医院详情页：基本信息加该院服务清单
#[component]
pub fn HospitalDetailPage(id: u64) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (hospital, set_hospital) = signal(Option::<HospitalSummary>::None);
    let (services, set_services) = signal(Vec::<Service>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let load_detail = {
        let session = session.clone();
        move || {
            let session = session.clone();
            set_loading.set(true);
            spawn_local(async move {
                match session.gateway().hospitals().get(id).await {
                    Ok(data) => set_hospital.set(Some(data)),
                    Err(e) => {
                        set_notification.set(Some((format!("Erreur de chargement : {}", e), true)));
                    }
                }
                match session.gateway().hospitals().services(id).await {
                    Ok(data) => set_services.set(data),
                    Err(e) => {
                        set_notification.set(Some((format!("Erreur de chargement : {}", e), true)));
                    }
                }
                set_loading.set(false);
            });
        }
    };

    // 初始加载
    {
        let load_detail = load_detail.clone();
        let is_authenticated = session.is_authenticated_signal();
        let is_loading = session.is_loading_signal();
        Effect::new(move |_| {
            if is_authenticated.get() && !is_loading.get() {
                load_detail();
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

    let handle_add = {
        let session = session.clone();
        move |service: ServiceCreate| {
            let session = session.clone();
            spawn_local(async move {
                match session.gateway().hospitals().add_service(id, &service).await {
                    Ok(created) => {
                        set_services.update(|list| list.push(created));
                        set_notification.set(Some(("Service ajouté".to_string(), false)));
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("Échec de l'ajout : {}", e), true)));
                    }
                }
            });
        }
    };

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

            <button
                class="btn btn-ghost btn-sm mb-4"
                on:click=move |_| router.navigate(AppRoute::Hospitals)
            >
                <ArrowLeft attr:class="h-4 w-4" /> "Retour à l'annuaire"
            </button>

            <div class="card bg-base-100 shadow-xl mb-6">
                <div class="card-body">
                    <Show when=move || loading.get() && hospital.get().is_none()>
                        <div class="flex justify-center py-4">
                            <span class="loading loading-spinner loading-md"></span>
                        </div>
                    </Show>
                    <Show when=move || hospital.get().is_some()>
                        <h3 class="card-title">
                            {move || hospital.get().map(|h| h.name).unwrap_or_default()}
                        </h3>
                        <div class="grid grid-cols-1 md:grid-cols-3 gap-4 text-sm">
                            <div>
                                <div class="text-base-content/60">"Email"</div>
                                <div class="font-medium">
                                    {move || hospital.get().map(|h| h.email).unwrap_or_default()}
                                </div>
                            </div>
                            <div>
                                <div class="text-base-content/60">"Téléphone"</div>
                                <div class="font-medium">
                                    {move || hospital.get().map(|h| h.phone).unwrap_or_default()}
                                </div>
                            </div>
                            <div>
                                <div class="text-base-content/60">"Adresse"</div>
                                <div class="font-medium">
                                    {move || hospital.get().map(|h| h.address).unwrap_or_default()}
                                </div>
                            </div>
                        </div>
                    </Show>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="flex items-center justify-between">
                        <h3 class="card-title">"Services proposés"</h3>
                        {
                            let handle_add = handle_add.clone();
                            view! { <AddServiceDialog on_add=handle_add /> }
                        }
                    </div>
                    <div class="overflow-x-auto">
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Nom"</th>
                                    <th>"Description"</th>
                                    <th>"Médecins"</th>
                                    <th>"Équipements"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || loading.get()>
                                    <tr>
                                        <td colspan="4" class="text-center">
                                            <span class="loading loading-spinner loading-md"></span>
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || !loading.get() && services.get().is_empty()>
                                    <tr>
                                        <td colspan="4" class="text-center text-base-content/60">
                                            "Aucun service déclaré"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || services.get()
                                    key=|service| service.id
                                    children=move |service: Service| {
                                        view! {
                                            <tr>
                                                <td class="font-medium">{service.name.clone()}</td>
                                                <td>{service.description.clone().unwrap_or_default()}</td>
                                                <td>{service.doctors}</td>
                                                <td>
                                                    <div class="flex flex-wrap gap-1">
                                                        {service
                                                            .equipment
                                                            .iter()
                                                            .map(|e| {
                                                                view! {
                                                                    <span class="badge badge-outline badge-sm">{e.clone()}</span>
                                                                }
                                                            })
                                                            .collect_view()}
                                                    </div>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </DashboardLayout>
    }
}
