use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::Pencil;
use crate::components::layout::DashboardLayout;
use crate::protocol::{HospitalProfile, ProfileUpdate};
use crate::session::use_session;

/// 档案编辑表单，提交时只上送变更过的字段
#[derive(Clone, Copy)]
struct ProfileForm {
    name: RwSignal<String>,
    phone: RwSignal<String>,
    address: RwSignal<String>,
    city: RwSignal<String>,
    country: RwSignal<String>,
}

impl ProfileForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            city: RwSignal::new(String::new()),
            country: RwSignal::new(String::new()),
        }
    }

    fn load(&self, profile: &HospitalProfile) {
        self.name.set(profile.name.clone());
        self.phone.set(profile.phone.clone());
        self.address.set(profile.address.clone());
        self.city.set(profile.city.clone());
        self.country.set(profile.country.clone());
    }

    fn diff(&self, base: &HospitalProfile) -> ProfileUpdate {
        let changed = |current: RwSignal<String>, original: &str| {
            let value = current.get();
            (value != original).then_some(value)
        };
        ProfileUpdate {
            name: changed(self.name, &base.name),
            phone: changed(self.phone, &base.phone),
            address: changed(self.address, &base.address),
            city: changed(self.city, &base.city),
            country: changed(self.country, &base.country),
        }
    }
}

/// 档案编辑字段
#[component]
fn ProfileField(id: &'static str, label: &'static str, value: RwSignal<String>) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type="text"
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
                class="input input-bordered w-full"
            />
        </div>
    }
}

/// 只读明细行
#[component]
fn DetailRow(label: &'static str, value: Signal<String>) -> impl IntoView {
    view! {
        <div>
            <div class="text-sm text-base-content/60">{label}</div>
            <div class="font-medium">
                {move || {
                    let v = value.get();
                    if v.is_empty() { "Non renseigné".to_string() } else { v }
                }}
            </div>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_session();
    let profile = session.profile_signal();

    let form = ProfileForm::new();
    let (editing, set_editing) = signal(false);
    let (saving, set_saving) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let on_submit = {
        let session = session.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(current) = profile.get() else {
                return;
            };
            let update = form.diff(&current);
            if update == ProfileUpdate::default() {
                set_editing.set(false);
                return;
            }
            set_saving.set(true);
            let session = session.clone();
            spawn_local(async move {
                match session.gateway().hospital().update_me(&update).await {
                    Ok(_) => {
                        // 以会话快照为准，重新拉取档案
                        session.refresh().await;
                        set_editing.set(false);
                        set_notification.set(Some(("Profil mis à jour".to_string(), false)));
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("Échec de la mise à jour : {}", e), true)));
                    }
                }
                set_saving.set(false);
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

            <div class="card bg-base-100 shadow-xl max-w-3xl">
                <div class="card-body">
                    <div class="flex items-start justify-between">
                        <div>
                            <h3 class="card-title">
                                {move || profile.get().map(|p| p.name).unwrap_or_default()}
                            </h3>
                            <p class="text-base-content/70 text-sm">
                                {move || profile.get().map(|p| p.email).unwrap_or_default()}
                            </p>
                        </div>
                        <div class="flex items-center gap-2">
                            <span class=move || {
                                if profile.get().map(|p| p.active).unwrap_or(true) {
                                    "badge badge-success"
                                } else {
                                    "badge badge-error"
                                }
                            }>
                                {move || {
                                    if profile.get().map(|p| p.active).unwrap_or(true) { "Actif" } else { "Inactif" }
                                }}
                            </span>
                            <span class=move || {
                                if profile.get().map(|p| p.verified).unwrap_or(false) {
                                    "badge badge-info"
                                } else {
                                    "badge badge-ghost"
                                }
                            }>
                                {move || {
                                    if profile.get().map(|p| p.verified).unwrap_or(false) { "Vérifié" } else { "Non vérifié" }
                                }}
                            </span>
                        </div>
                    </div>

                    <div class="stat px-0">
                        <div class="stat-title">"Score de l'établissement"</div>
                        <div class="stat-value text-primary">
                            {move || format!("{:.1}", profile.get().map(|p| p.score).unwrap_or_default())}
                        </div>
                    </div>

                    <Show when=move || !editing.get()>
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <DetailRow
                                label="Téléphone"
                                value=Signal::derive(move || profile.get().map(|p| p.phone).unwrap_or_default())
                            />
                            <DetailRow
                                label="Adresse"
                                value=Signal::derive(move || profile.get().map(|p| p.address).unwrap_or_default())
                            />
                            <DetailRow
                                label="Ville"
                                value=Signal::derive(move || profile.get().map(|p| p.city).unwrap_or_default())
                            />
                            <DetailRow
                                label="Pays"
                                value=Signal::derive(move || profile.get().map(|p| p.country).unwrap_or_default())
                            />
                        </div>
                        <div class="card-actions justify-end">
                            <button
                                class="btn btn-outline btn-sm"
                                on:click=move |_| {
                                    if let Some(p) = profile.get() {
                                        form.load(&p);
                                        set_editing.set(true);
                                    }
                                }
                            >
                                <Pencil attr:class="h-4 w-4" /> "Modifier"
                            </button>
                        </div>
                    </Show>

                    {
                        let on_submit = on_submit.clone();
                        view! {
                            <Show when=move || editing.get()>
                                {
                                    let on_submit = on_submit.clone();
                                    view! {
                                        <form on:submit=on_submit class="space-y-4">
                                            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                                <ProfileField id="profile-name" label="Nom" value=form.name />
                                                <ProfileField id="profile-phone" label="Téléphone" value=form.phone />
                                                <ProfileField id="profile-address" label="Adresse" value=form.address />
                                                <ProfileField id="profile-city" label="Ville" value=form.city />
                                                <ProfileField id="profile-country" label="Pays" value=form.country />
                                            </div>
                                            <div class="card-actions justify-end">
                                                <button
                                                    type="button"
                                                    class="btn btn-ghost btn-sm"
                                                    on:click=move |_| set_editing.set(false)
                                                >
                                                    "Annuler"
                                                </button>
                                                <button type="submit" disabled=move || saving.get() class="btn btn-primary btn-sm">
                                                    {move || if saving.get() {
                                                        view! { <span class="loading loading-spinner"></span> "Enregistrement..." }.into_any()
                                                    } else {
                                                        "Enregistrer".into_any()
                                                    }}
                                                </button>
                                            </div>
                                        </form>
                                    }
                                }
                            </Show>
                        }
                    }
                </div>
            </div>
        </DashboardLayout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> HospitalProfile {
        HospitalProfile {
            id: 1,
            name: "Hôpital Central".to_string(),
            email: "contact@central.cm".to_string(),
            phone: "+237 222 000 000".to_string(),
            address: "Rue de l'Hôpital".to_string(),
            city: "Yaoundé".to_string(),
            country: "Cameroun".to_string(),
            active: true,
            verified: true,
            score: 4.5,
        }
    }

    #[test]
    fn untouched_form_produces_empty_update() {
        let base = sample_profile();
        let form = ProfileForm::new();
        form.load(&base);
        assert_eq!(form.diff(&base), ProfileUpdate::default());
    }

    #[test]
    fn diff_carries_only_changed_fields() {
        let base = sample_profile();
        let form = ProfileForm::new();
        form.load(&base);

        form.city.set("Douala".to_string());
        form.phone.set("+237 233 111 111".to_string());

        let update = form.diff(&base);
        assert_eq!(update.city.as_deref(), Some("Douala"));
        assert_eq!(update.phone.as_deref(), Some("+237 233 111 111"));
        assert!(update.name.is_none());
        assert!(update.address.is_none());
        assert!(update.country.is_none());
    }
}
