use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::HeartPulse;
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// Login page. Anonymous users land here; the router effect sends
/// authenticated ones straight to the dashboard.
#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // While the persisted session is being restored we only show a
    // spinner, so a token holder never sees the login form flash by.
    let is_loading = session.is_loading_signal();

    let restoring_fallback = || {
        view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
    };

    view! {
        <Show when=move || !is_loading.get() fallback=restoring_fallback>
            {
                let session = session.clone();
                let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
                    ev.prevent_default();
                    if email.get().is_empty() || password.get().is_empty() {
                        set_error_msg.set(Some("Veuillez remplir tous les champs".to_string()));
                        return;
                    }

                    set_is_submitting.set(true);
                    set_error_msg.set(None);

                    let session = session.clone();
                    spawn_local(async move {
                        match session.login(&email.get(), &password.get()).await {
                            Ok(()) => router.navigate(AppRoute::Dashboard),
                            Err(err) => set_error_msg.set(Some(err.to_string())),
                        }
                        set_is_submitting.set(false);
                    });
                };

                view! {
                    <div class="hero min-h-screen bg-base-200">
                        <div class="hero-content flex-col w-full max-w-md">
                            <header class="text-center space-y-2">
                                <div class="inline-flex p-3 bg-primary/10 rounded-2xl text-primary">
                                    <HeartPulse attr:class="h-8 w-8" />
                                </div>
                                <h1 class="text-3xl font-bold">"PulseAI"</h1>
                                <p class="text-base-content/70">"Connectez-vous à votre espace hôpital"</p>
                            </header>

                            <div class="card w-full bg-base-100 shadow-2xl">
                                <form class="card-body gap-4" on:submit=on_submit>
                                    <Show when=move || error_msg.get().is_some()>
                                        <div role="alert" class="alert alert-error text-sm py-2">
                                            <span>{move || error_msg.get().unwrap()}</span>
                                        </div>
                                    </Show>

                                    <label class="input input-bordered flex items-center gap-2">
                                        <span class="text-base-content/60 text-sm w-28 shrink-0">"E-mail"</span>
                                        <input
                                            type="email"
                                            class="grow"
                                            placeholder="hopital@exemple.cm"
                                            prop:value=email
                                            on:input=move |ev| set_email.set(event_target_value(&ev))
                                            required
                                        />
                                    </label>

                                    <label class="input input-bordered flex items-center gap-2">
                                        <span class="text-base-content/60 text-sm w-28 shrink-0">"Mot de passe"</span>
                                        <input
                                            type="password"
                                            class="grow"
                                            placeholder="••••••••"
                                            prop:value=password
                                            on:input=move |ev| set_password.set(event_target_value(&ev))
                                            required
                                        />
                                    </label>

                                    <button class="btn btn-primary mt-2" disabled=move || is_submitting.get()>
                                        {move || if is_submitting.get() {
                                            view! { <span class="loading loading-spinner"></span> "Connexion..." }.into_any()
                                        } else {
                                            "Se connecter".into_any()
                                        }}
                                    </button>

                                    <p class="text-center text-sm text-base-content/70">
                                        "Pas encore de compte ? "
                                        <a class="link link-primary" on:click=move |_| router.navigate(AppRoute::Register)>
                                            "Créer un compte"
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
