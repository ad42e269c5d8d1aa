use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::{Building2, Plus};
use crate::components::layout::DashboardLayout;
use crate::protocol::{HospitalRecord, HospitalSummary};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 医院目录页：浏览全网机构并支持录入新条目
#[component]
pub fn HospitalsPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (hospitals, set_hospitals) = signal(Vec::<HospitalSummary>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let address = RwSignal::new(String::new());
    let city = RwSignal::new(String::new());

    let load_hospitals = {
        let session = session.clone();
        move || {
            let session = session.clone();
            set_loading.set(true);
            spawn_local(async move {
                match session.gateway().hospitals().list().await {
                    Ok(data) => set_hospitals.set(data),
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
        let load_hospitals = load_hospitals.clone();
        let is_authenticated = session.is_authenticated_signal();
        let is_loading = session.is_loading_signal();
        Effect::new(move |_| {
            if is_authenticated.get() && !is_loading.get() {
                load_hospitals();
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
        let load_hospitals = load_hospitals.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let label = name.get().trim().to_string();
            if label.is_empty() {
                return;
            }
            let record = HospitalRecord {
                name: label,
                email: email.get(),
                phone: phone.get(),
                address: address.get(),
                city: city.get(),
            };
            let session = session.clone();
            let load_hospitals = load_hospitals.clone();
            spawn_local(async move {
                match session.gateway().hospitals().add(&record).await {
                    Ok(_) => {
                        name.set(String::new());
                        email.set(String::new());
                        phone.set(String::new());
                        address.set(String::new());
                        city.set(String::new());
                        set_notification.set(Some(("Hôpital ajouté à l'annuaire".to_string(), false)));
                        // 后端只回执不回条目，整表重拉
                        load_hospitals();
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

            <div class="card bg-base-100 shadow-xl mb-6">
                <div class="card-body">
                    <h3 class="card-title text-base">"Référencer un hôpital"</h3>
                    {
                        let handle_add = handle_add.clone();
                        view! {
                            <form on:submit=handle_add class="space-y-4">
                                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                                    <div class="form-control">
                                        <label class="label" for="hospital-name">
                                            <span class="label-text">"Nom"</span>
                                        </label>
                                        <input
                                            id="hospital-name"
                                            type="text"
                                            placeholder="Hôpital Général"
                                            required
                                            on:input=move |ev| name.set(event_target_value(&ev))
                                            prop:value=name
                                            class="input input-bordered w-full"
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="hospital-email">
                                            <span class="label-text">"Email"</span>
                                        </label>
                                        <input
                                            id="hospital-email"
                                            type="email"
                                            placeholder="contact@hopital.cm"
                                            on:input=move |ev| email.set(event_target_value(&ev))
                                            prop:value=email
                                            class="input input-bordered w-full"
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="hospital-phone">
                                            <span class="label-text">"Téléphone"</span>
                                        </label>
                                        <input
                                            id="hospital-phone"
                                            type="text"
                                            placeholder="+237 222 000 000"
                                            on:input=move |ev| phone.set(event_target_value(&ev))
                                            prop:value=phone
                                            class="input input-bordered w-full"
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="hospital-address">
                                            <span class="label-text">"Adresse"</span>
                                        </label>
                                        <input
                                            id="hospital-address"
                                            type="text"
                                            placeholder="Avenue Kennedy"
                                            on:input=move |ev| address.set(event_target_value(&ev))
                                            prop:value=address
                                            class="input input-bordered w-full"
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="hospital-city">
                                            <span class="label-text">"Ville"</span>
                                        </label>
                                        <input
                                            id="hospital-city"
                                            type="text"
                                            placeholder="Yaoundé"
                                            on:input=move |ev| city.set(event_target_value(&ev))
                                            prop:value=city
                                            class="input input-bordered w-full"
                                        />
                                    </div>
                                </div>
                                <div class="card-actions justify-end">
                                    <button type="submit" class="btn btn-primary btn-sm">
                                        <Plus attr:class="h-4 w-4" /> "Ajouter"
                                    </button>
                                </div>
                            </form>
                        }
                    }
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">
                        <Building2 attr:class="h-5 w-5" /> "Annuaire des hôpitaux"
                    </h3>
                    <div class="overflow-x-auto">
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Nom"</th>
                                    <th>"Email"</th>
                                    <th>"Téléphone"</th>
                                    <th>"Adresse"</th>
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
                                <Show when=move || !loading.get() && hospitals.get().is_empty()>
                                    <tr>
                                        <td colspan="4" class="text-center text-base-content/60">
                                            "Aucun hôpital référencé"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || hospitals.get()
                                    key=|hospital| hospital.id
                                    children=move |hospital: HospitalSummary| {
                                        let id = hospital.id;
                                        view! {
                                            <tr
                                                class="hover cursor-pointer"
                                                on:click=move |_| router.navigate(AppRoute::HospitalDetail(id))
                                            >
                                                <td class="font-medium">{hospital.name.clone()}</td>
                                                <td>{hospital.email.clone()}</td>
                                                <td>{hospital.phone.clone()}</td>
                                                <td>{hospital.address.clone()}</td>
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
