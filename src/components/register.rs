mod form_state;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::HeartPulse;
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use form_state::RegisterFormState;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let form = RegisterFormState::new();
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_loading = session.is_loading_signal();

    view! {
        <Show when=move || !is_loading.get() fallback=|| view! { <div class="flex items-center justify-center min-h-screen"><span class="loading loading-spinner loading-lg text-primary"></span></div> }>
            {
                let session = session.clone();
                let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
                    ev.prevent_default();

                    // 密码一致性在本地检查，长度规则由请求体校验兜底
                    if !form.passwords_match() {
                        set_error_msg.set(Some("Les mots de passe ne correspondent pas".to_string()));
                        return;
                    }

                    set_is_submitting.set(true);
                    set_error_msg.set(None);

                    let session = session.clone();
                    spawn_local(async move {
                        // 注册成功后用同一组凭证直接登录
                        match session.register(&form.to_request()).await {
                            Ok(()) => {
                                form.reset();
                                router.navigate(AppRoute::Dashboard);
                            }
                            Err(err) => set_error_msg.set(Some(err.to_string())),
                        }
                        set_is_submitting.set(false);
                    });
                };

                view! {
                    <div class="hero min-h-screen bg-base-200 py-8">
                        <div class="hero-content flex-col w-full max-w-2xl">
                            <div class="text-center mb-4">
                                <div class="flex flex-col items-center gap-2">
                                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                        <HeartPulse attr:class="h-8 w-8" />
                                    </div>
                                    <h1 class="text-3xl font-bold">"Créer un compte hôpital"</h1>
                                    <p class="text-base-content/70">
                                        "Rejoignez le réseau PulseAI"
                                    </p>
                                </div>
                            </div>

                            <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                                <form class="card-body" on:submit=on_submit>
                                    <Show when=move || error_msg.get().is_some()>
                                        <div role="alert" class="alert alert-error text-sm py-2">
                                            <span>{move || error_msg.get().unwrap()}</span>
                                        </div>
                                    </Show>

                                    <div class="form-control">
                                        <label class="label" for="name">
                                            <span class="label-text">"Nom de l'établissement"</span>
                                        </label>
                                        <input id="name" required
                                            type="text"
                                            placeholder="Centre Hospitalier de Yaoundé"
                                            on:input=move |ev| form.name.set(event_target_value(&ev))
                                            prop:value=form.name
                                            class="input input-bordered"
                                        />
                                    </div>

                                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                        <div class="form-control">
                                            <label class="label" for="email">
                                                <span class="label-text">"Adresse e-mail"</span>
                                            </label>
                                            <input id="email" required
                                                type="email"
                                                placeholder="hopital@exemple.cm"
                                                on:input=move |ev| form.email.set(event_target_value(&ev))
                                                prop:value=form.email
                                                class="input input-bordered"
                                            />
                                        </div>
                                        <div class="form-control">
                                            <label class="label" for="phone">
                                                <span class="label-text">"Téléphone"</span>
                                            </label>
                                            <input id="phone"
                                                type="tel"
                                                placeholder="+237 699 123 456"
                                                on:input=move |ev| form.phone.set(event_target_value(&ev))
                                                prop:value=form.phone
                                                class="input input-bordered"
                                            />
                                        </div>
                                    </div>

                                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                        <div class="form-control">
                                            <label class="label" for="password">
                                                <span class="label-text">"Mot de passe"</span>
                                            </label>
                                            <input id="password" required
                                                type="password"
                                                placeholder="6 caractères minimum"
                                                on:input=move |ev| form.password.set(event_target_value(&ev))
                                                prop:value=form.password
                                                class="input input-bordered"
                                            />
                                        </div>
                                        <div class="form-control">
                                            <label class="label" for="confirm_password">
                                                <span class="label-text">"Confirmer le mot de passe"</span>
                                            </label>
                                            <input id="confirm_password" required
                                                type="password"
                                                placeholder="••••••••"
                                                on:input=move |ev| form.confirm_password.set(event_target_value(&ev))
                                                prop:value=form.confirm_password
                                                class="input input-bordered"
                                            />
                                        </div>
                                    </div>

                                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                        <div class="form-control">
                                            <label class="label" for="address">
                                                <span class="label-text">"Adresse"</span>
                                            </label>
                                            <input id="address"
                                                type="text"
                                                placeholder="Avenue de l'Indépendance"
                                                on:input=move |ev| form.address.set(event_target_value(&ev))
                                                prop:value=form.address
                                                class="input input-bordered"
                                            />
                                        </div>
                                        <div class="form-control">
                                            <label class="label" for="city">
                                                <span class="label-text">"Ville"</span>
                                            </label>
                                            <input id="city"
                                                type="text"
                                                placeholder="Yaoundé"
                                                on:input=move |ev| form.city.set(event_target_value(&ev))
                                                prop:value=form.city
                                                class="input input-bordered"
                                            />
                                        </div>
                                    </div>

                                    <div class="form-control mt-6">
                                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                            {move || if is_submitting.get() {
                                                view! { <span class="loading loading-spinner"></span> "Création du compte..." }.into_any()
                                            } else {
                                                "S'inscrire".into_any()
                                            }}
                                        </button>
                                    </div>
                                    <p class="text-center text-sm text-base-content/70 mt-2">
                                        "Déjà inscrit ? "
                                        <a class="link link-primary" on:click=move |_| router.navigate(AppRoute::Login)>
                                            "Se connecter"
                                        </a>
                                    </p>
                                </form>
                            </div>
                        </div>
                    </div>
                }
            }
        </Show>
    }
}
