use leptos::prelude::*;

use crate::components::icons::Plus;
use crate::protocol::ServiceCreate;

/// 添加服务的模态框，提交产物经回调交给宿主页面
///
/// 触发按钮和 `<dialog>` 一起渲染，宿主只需接收 [`ServiceCreate`]。
#[component]
pub fn AddServiceDialog(#[prop(into)] on_add: Callback<ServiceCreate>) -> impl IntoView {
    let (is_open, set_open) = signal(false);
    let dialog_el = NodeRef::<leptos::html::Dialog>::new();

    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());

    let reset_form = move || {
        set_name.set(String::new());
        set_description.set(String::new());
    };

    // is_open 信号是唯一事实源，<dialog> 的原生状态跟着它走
    Effect::new(move |_| {
        let Some(dialog) = dialog_el.get() else {
            return;
        };
        if is_open.get() {
            if !dialog.open() {
                let _ = dialog.show_modal();
            }
        } else if dialog.open() {
            dialog.close();
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();

        let description = description.get();
        on_add.run(ServiceCreate {
            name: name.get().trim().to_string(),
            description: (!description.trim().is_empty()).then_some(description),
        });
        set_open.set(false);
        reset_form();
    };

    view! {
        <button class="btn btn-primary gap-2" on:click=move |_| set_open.set(true)>
            <Plus attr:class="h-4 w-4" />
            "Ajouter un service"
        </button>

        // Échap 或点击遮罩关闭时由 on:close 把信号拉回 false
        <dialog class="modal" node_ref=dialog_el on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Nouveau service"</h3>
                <p class="py-4 text-base-content/70">
                    "Décrivez le service proposé par votre établissement."
                </p>

                <form class="space-y-4" on:submit=on_submit>
                    <label class="form-control">
                        <div class="label">
                            <span class="label-text">"Nom du service"</span>
                        </div>
                        <input
                            type="text"
                            class="input input-bordered w-full"
                            placeholder="Cardiologie"
                            prop:value=name
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                            required
                        />
                    </label>

                    <label class="form-control">
                        <div class="label">
                            <span class="label-text">"Description (optionnel)"</span>
                        </div>
                        <textarea
                            class="textarea textarea-bordered w-full"
                            placeholder="Consultations et soins spécialisés"
                            prop:value=description
                            on:input=move |ev| set_description.set(event_target_value(&ev))
                        ></textarea>
                    </label>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_open.set(false)>
                            "Annuler"
                        </button>
                        <button type="submit" class="btn btn-primary">"Ajouter"</button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"fermer"</button>
            </form>
        </dialog>
    }
}
