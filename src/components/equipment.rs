use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::{Plus, Trash2};
use crate::components::layout::DashboardLayout;
use crate::protocol::{Equipment, EquipmentCreate};
use crate::session::use_session;

/// 设备清单页：列表、新增、切换可用状态、删除
#[component]
pub fn EquipmentPage() -> impl IntoView {
    let session = use_session();

    let (items, set_items) = signal(Vec::<Equipment>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let name = RwSignal::new(String::new());
    let quantity = RwSignal::new(1u32);
    let available = RwSignal::new(true);

    let load_items = {
        let session = session.clone();
        move || {
            let session = session.clone();
            set_loading.set(true);
            spawn_local(async move {
                match session.gateway().equipment().list().await {
                    Ok(data) => set_items.set(data),
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
        let load_items = load_items.clone();
        let is_authenticated = session.is_authenticated_signal();
        let is_loading = session.is_loading_signal();
        Effect::new(move |_| {
            if is_authenticated.get() && !is_loading.get() {
                load_items();
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
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let label = name.get().trim().to_string();
            if label.is_empty() {
                return;
            }
            let request = EquipmentCreate {
                name: label,
                quantity: quantity.get(),
                available: available.get(),
            };
            let session = session.clone();
            spawn_local(async move {
                match session.gateway().equipment().create(&request).await {
                    Ok(created) => {
                        set_items.update(|list| list.push(created));
                        name.set(String::new());
                        quantity.set(1);
                        available.set(true);
                        set_notification.set(Some(("Équipement ajouté".to_string(), false)));
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("Échec de l'ajout : {}", e), true)));
                    }
                }
            });
        }
    };

    let handle_toggle = {
        let session = session.clone();
        move |item: Equipment| {
            let request = EquipmentCreate {
                name: item.name.clone(),
                quantity: item.quantity,
                available: !item.available,
            };
            let session = session.clone();
            spawn_local(async move {
                match session.gateway().equipment().update(item.id, &request).await {
                    Ok(updated) => {
                        set_items.update(|list| {
                            if let Some(entry) = list.iter_mut().find(|e| e.id == updated.id) {
                                *entry = updated;
                            }
                        });
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("Échec de la mise à jour : {}", e), true)));
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
                match session.gateway().equipment().delete(id).await {
                    Ok(_) => {
                        set_items.update(|list| list.retain(|e| e.id != id));
                        set_notification.set(Some(("Équipement supprimé".to_string(), false)));
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("Échec de la suppression : {}", e), true)));
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

            <div class="card bg-base-100 shadow-xl mb-6">
                <div class="card-body">
                    <h3 class="card-title text-base">"Ajouter un équipement"</h3>
                    {
                        let handle_add = handle_add.clone();
                        view! {
                            <form on:submit=handle_add class="flex flex-wrap items-end gap-4">
                                <div class="form-control grow">
                                    <label class="label" for="equipment-name">
                                        <span class="label-text">"Nom"</span>
                                    </label>
                                    <input
                                        id="equipment-name"
                                        type="text"
                                        placeholder="Respirateur"
                                        required
                                        on:input=move |ev| name.set(event_target_value(&ev))
                                        prop:value=name
                                        class="input input-bordered w-full"
                                    />
                                </div>
                                <div class="form-control w-28">
                                    <label class="label" for="equipment-quantity">
                                        <span class="label-text">"Quantité"</span>
                                    </label>
                                    <input
                                        id="equipment-quantity"
                                        type="number"
                                        min="0"
                                        on:input=move |ev| {
                                            if let Ok(parsed) = event_target_value(&ev).parse::<u32>() {
                                                quantity.set(parsed);
                                            }
                                        }
                                        prop:value=move || quantity.get().to_string()
                                        class="input input-bordered w-full"
                                    />
                                </div>
                                <label class="label cursor-pointer gap-2 pb-3">
                                    <span class="label-text">"Disponible"</span>
                                    <input
                                        type="checkbox"
                                        on:change=move |ev| available.set(event_target_checked(&ev))
                                        prop:checked=available
                                        class="toggle toggle-success"
                                    />
                                </label>
                                <button type="submit" class="btn btn-primary">
                                    <Plus attr:class="h-4 w-4" /> "Ajouter"
                                </button>
                            </form>
                        }
                    }
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Équipements"</h3>
                    <div class="overflow-x-auto">
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Nom"</th>
                                    <th>"Quantité"</th>
                                    <th>"Disponibilité"</th>
                                    <th></th>
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
                                <Show when=move || !loading.get() && items.get().is_empty()>
                                    <tr>
                                        <td colspan="4" class="text-center text-base-content/60">
                                            "Aucun équipement enregistré"
                                        </td>
                                    </tr>
                                </Show>
                                {
                                    let handle_toggle = handle_toggle.clone();
                                    let handle_delete = handle_delete.clone();
                                    view! {
                                        <For
                                            each=move || items.get()
                                            key=|item| (item.id, item.available, item.quantity)
                                            children=move |item: Equipment| {
                                                let handle_toggle = handle_toggle.clone();
                                                let handle_delete = handle_delete.clone();
                                                let toggle_item = item.clone();
                                                let item_id = item.id;
                                                view! {
                                                    <tr>
                                                        <td class="font-medium">{item.name.clone()}</td>
                                                        <td>{item.quantity}</td>
                                                        <td>
                                                            <label class="label cursor-pointer justify-start gap-2">
                                                                <input
                                                                    type="checkbox"
                                                                    checked=item.available
                                                                    on:change=move |_| handle_toggle(toggle_item.clone())
                                                                    class="toggle toggle-success toggle-sm"
                                                                />
                                                                <span class=if item.available {
                                                                    "badge badge-success badge-sm"
                                                                } else {
                                                                    "badge badge-ghost badge-sm"
                                                                }>
                                                                    {if item.available { "Disponible" } else { "Indisponible" }}
                                                                </span>
                                                            </label>
                                                        </td>
                                                        <td class="text-right">
                                                            <button
                                                                class="btn btn-ghost btn-sm text-error"
                                                                on:click=move |_| handle_delete(item_id)
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
