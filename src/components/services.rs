use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::{RefreshCw, Stethoscope, Trash2};
use crate::components::layout::DashboardLayout;
use crate::components::service_dialog::AddServiceDialog;
use crate::protocol::{Service, ServiceCreate};
use crate::session::use_session;

#[component]
pub fn ServicesPage() -> impl IntoView {
    let session = use_session();

    let (services, set_services) = signal(Vec::<Service>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let load_services = {
        let session = session.clone();
        move || {
            let session = session.clone();
            set_loading.set(true);
            spawn_local(async move {
                match session.gateway().services().list().await {
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
        let load_services = load_services.clone();
        let is_authenticated = session.is_authenticated_signal();
        let is_loading = session.is_loading_signal();
        Effect::new(move |_| {
            if is_authenticated.get() && !is_loading.get() {
                load_services();
            }
        });
    }

    let handle_add = {
        let session = session.clone();
        let load_services = load_services.clone();
        move |request: ServiceCreate| {
            let session = session.clone();
            let load_services = load_services.clone();
            spawn_local(async move {
                match session.gateway().services().create(&request).await {
                    Ok(_) => {
                        set_notification.set(Some(("Service ajouté avec succès".to_string(), false)));
                        load_services();
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("Échec de l'ajout : {}", e), true)));
                    }
                }
            });
        }
    };

    let handle_delete = {
        let session = session.clone();
        move |id: u64| {
            let session = session.clone();
            spawn_local(async move {
                match session.gateway().services().delete(id).await {
                    Ok(_) => {
                        set_notification.set(Some(("Service supprimé".to_string(), false)));
                        set_services.update(|list| list.retain(|s| s.id != id));
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("Échec de la suppression : {}", e), true)));
                    }
                }
            });
        }
    };

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let total_services = move || services.with(|s| s.len());

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

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div>
                            <h3 class="card-title">"Services de l'hôpital"</h3>
                            <p class="text-base-content/70 text-sm">"Gérez les services proposés aux patients."</p>
                        </div>
                        {
                            let load_services = load_services.clone();
                            let handle_add = handle_add.clone();
                            view! {
                                <div class="flex items-center gap-2">
                                    <AddServiceDialog on_add=handle_add />
                                    <button on:click=move |_| load_services() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                                        <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                                    </button>
                                </div>
                            }
                        }
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Nom"</th>
                                    <th class="hidden md:table-cell">"Description"</th>
                                    <th>"Médecins"</th>
                                    <th class="hidden md:table-cell">"Équipements"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || total_services() == 0 && !loading.get()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "Aucun service enregistré. Ajoutez-en un pour commencer."
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || loading.get() && total_services() == 0>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span> " Chargement..."
                                        </td>
                                    </tr>
                                </Show>
                                {
                                    let handle_delete = handle_delete.clone();
                                    view! {
                                        <For
                                            each=move || services.get()
                                            key=|s| s.id
                                            children=move |service| {
                                                let handle_delete = handle_delete.clone();
                                                let id = service.id;
                                                view! {
                                                    <tr>
                                                        <td>
                                                            <div class="flex items-center gap-2 font-bold">
                                                                <Stethoscope attr:class="h-4 w-4 opacity-50" />
                                                                {service.name}
                                                            </div>
                                                        </td>
                                                        <td class="hidden md:table-cell text-sm opacity-70">
                                                            {service.description.unwrap_or_default()}
                                                        </td>
                                                        <td>
                                                            <div class="badge badge-neutral">{service.doctors}</div>
                                                        </td>
                                                        <td class="hidden md:table-cell">
                                                            <div class="flex flex-wrap gap-1">
                                                                {service
                                                                    .equipment
                                                                    .into_iter()
                                                                    .map(|item| view! { <span class="badge badge-outline badge-sm">{item}</span> })
                                                                    .collect_view()}
                                                            </div>
                                                        </td>
                                                        <td>
                                                            <button
                                                                on:click=move |_| handle_delete(id)
                                                                class="btn btn-ghost btn-sm btn-square text-error"
                                                            >
                                                                <Trash2 attr:class="h-4 w-4" />
                                                            </button>
                                                        </td>
                                                    </tr>
                                                }
                                            }
                                        />
                                    }
                                }
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </DashboardLayout>
    }
}
