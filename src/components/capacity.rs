use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::dashboard::occupancy_badge;
use crate::components::icons::Bed;
use crate::components::layout::DashboardLayout;
use crate::error::ApiErrorKind;
use crate::protocol::Capacity;
use crate::session::use_session;

/// 入住率百分比，保留一位小数；没有床位时为 0
pub fn occupancy_rate(beds: u32, occupied: u32) -> f64 {
    if beds == 0 {
        return 0.0;
    }
    (occupied as f64 / beds as f64 * 1000.0).round() / 10.0
}

/// 容量表单状态，字段与 [`Capacity`] 一一对应
#[derive(Clone, Copy)]
struct CapacityForm {
    beds: RwSignal<u32>,
    occupied_beds: RwSignal<u32>,
    total_doctors: RwSignal<u32>,
    active_doctors: RwSignal<u32>,
    total_nurses: RwSignal<u32>,
    active_nurses: RwSignal<u32>,
    waiting_queue: RwSignal<u32>,
    average_wait_time: RwSignal<u32>,
}

impl CapacityForm {
    fn new() -> Self {
        Self {
            beds: RwSignal::new(0),
            occupied_beds: RwSignal::new(0),
            total_doctors: RwSignal::new(0),
            active_doctors: RwSignal::new(0),
            total_nurses: RwSignal::new(0),
            active_nurses: RwSignal::new(0),
            waiting_queue: RwSignal::new(0),
            average_wait_time: RwSignal::new(0),
        }
    }

    /// 用服务端返回的记录填充表单
    fn load(&self, capacity: &Capacity) {
        self.beds.set(capacity.beds);
        self.occupied_beds.set(capacity.occupied_beds);
        self.total_doctors.set(capacity.total_doctors);
        self.active_doctors.set(capacity.active_doctors);
        self.total_nurses.set(capacity.total_nurses);
        self.active_nurses.set(capacity.active_nurses);
        self.waiting_queue.set(capacity.waiting_queue);
        self.average_wait_time.set(capacity.average_wait_time);
    }

    /// 转换回容量记录，id 与 hospital_id 沿用服务端的值
    fn to_record(&self, base: Capacity) -> Capacity {
        Capacity {
            beds: self.beds.get(),
            occupied_beds: self.occupied_beds.get(),
            total_doctors: self.total_doctors.get(),
            active_doctors: self.active_doctors.get(),
            total_nurses: self.total_nurses.get(),
            active_nurses: self.active_nurses.get(),
            waiting_queue: self.waiting_queue.get(),
            average_wait_time: self.average_wait_time.get(),
            ..base
        }
    }
}

/// 数字输入框，解析失败的输入不写回信号
#[component]
fn NumberField(id: &'static str, label: &'static str, value: RwSignal<u32>) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type="number"
                min="0"
                prop:value=move || value.get().to_string()
                on:input=move |ev| {
                    if let Ok(parsed) = event_target_value(&ev).parse::<u32>() {
                        value.set(parsed);
                    }
                }
                class="input input-bordered w-full"
            />
        </div>
    }
}

#[component]
pub fn CapacityPage() -> impl IntoView {
    let session = use_session();

    let form = CapacityForm::new();
    let (record, set_record) = signal(Capacity::default());
    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let load_capacity = {
        let session = session.clone();
        move || {
            let session = session.clone();
            set_loading.set(true);
            spawn_local(async move {
                match session.gateway().capacity().get().await {
                    Ok(data) => {
                        form.load(&data);
                        set_record.set(data);
                    }
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
        let load_capacity = load_capacity.clone();
        let is_authenticated = session.is_authenticated_signal();
        let is_loading = session.is_loading_signal();
        Effect::new(move |_| {
            if is_authenticated.get() && !is_loading.get() {
                load_capacity();
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

    // 输入变化时实时预估入住率
    let estimated = move || occupancy_rate(form.beds.get(), form.occupied_beds.get());

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

            {
                let session = session.clone();
                let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
                    ev.prevent_default();
                    set_saving.set(true);
                    set_error_msg.set(None);

                    let session = session.clone();
                    let updated = form.to_record(record.get());
                    spawn_local(async move {
                        match session.gateway().capacity().update(&updated).await {
                            Ok(data) => {
                                form.load(&data);
                                set_record.set(data);
                                set_notification.set(Some(("Capacité mise à jour".to_string(), false)));
                            }
                            // 校验错误贴在表单上，其余错误走通知
                            Err(e) if e.kind() == ApiErrorKind::Validation => {
                                set_error_msg.set(Some(e.to_string()));
                            }
                            Err(e) => {
                                set_notification.set(Some((format!("Échec de la mise à jour : {}", e), true)));
                            }
                        }
                        set_saving.set(false);
                    });
                };

                view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="flex items-center justify-between">
                                <div>
                                    <h3 class="card-title">
                                        <Bed attr:class="h-5 w-5" /> "Capacité de l'hôpital"
                                    </h3>
                                    <p class="text-base-content/70 text-sm">"Lits, personnel et file d'attente."</p>
                                </div>
                                <div class="text-right">
                                    <div class="text-sm text-base-content/70">"Taux d'occupation estimé"</div>
                                    <div class="flex items-center justify-end gap-2">
                                        <span class="text-2xl font-bold">{move || format!("{:.1}%", estimated())}</span>
                                        <span class=move || format!("badge {}", occupancy_badge(estimated()).1)>
                                            {move || occupancy_badge(estimated()).0}
                                        </span>
                                    </div>
                                </div>
                            </div>

                            <Show when=move || error_msg.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || error_msg.get().unwrap()}</span>
                                </div>
                            </Show>

                            <Show when=move || loading.get()>
                                <div class="flex justify-center py-4">
                                    <span class="loading loading-spinner loading-md"></span>
                                </div>
                            </Show>

                            <form on:submit=on_submit class="space-y-4">
                                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                    <NumberField id="beds" label="Lits (total)" value=form.beds />
                                    <NumberField id="occupied_beds" label="Lits occupés" value=form.occupied_beds />
                                    <NumberField id="total_doctors" label="Médecins (total)" value=form.total_doctors />
                                    <NumberField id="active_doctors" label="Médecins actifs" value=form.active_doctors />
                                    <NumberField id="total_nurses" label="Infirmiers (total)" value=form.total_nurses />
                                    <NumberField id="active_nurses" label="Infirmiers actifs" value=form.active_nurses />
                                    <NumberField id="waiting_queue" label="Patients en attente" value=form.waiting_queue />
                                    <NumberField id="average_wait_time" label="Temps d'attente moyen (min)" value=form.average_wait_time />
                                </div>

                                <div class="card-actions justify-end">
                                    <button type="submit" disabled=move || saving.get() || loading.get() class="btn btn-primary">
                                        {move || if saving.get() {
                                            view! { <span class="loading loading-spinner"></span> "Enregistrement..." }.into_any()
                                        } else {
                                            "Enregistrer".into_any()
                                        }}
                                    </button>
                                </div>
                            </form>
                        </div>
                    </div>
                }
            }
        </DashboardLayout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_rate_rounds_to_one_decimal() {
        assert_eq!(occupancy_rate(120, 75), 62.5);
        assert_eq!(occupancy_rate(3, 1), 33.3);
        assert_eq!(occupancy_rate(3, 2), 66.7);
        assert_eq!(occupancy_rate(100, 100), 100.0);
    }

    #[test]
    fn occupancy_rate_without_beds_is_zero() {
        assert_eq!(occupancy_rate(0, 0), 0.0);
        assert_eq!(occupancy_rate(0, 10), 0.0);
    }

    #[test]
    fn form_round_trips_and_preserves_identity() {
        let base = Capacity {
            id: 7,
            hospital_id: 3,
            beds: 120,
            occupied_beds: 75,
            total_doctors: 23,
            active_doctors: 20,
            total_nurses: 45,
            active_nurses: 40,
            waiting_queue: 12,
            average_wait_time: 25,
        };

        let form = CapacityForm::new();
        form.load(&base);
        form.occupied_beds.set(80);

        let updated = form.to_record(base);
        assert_eq!(updated.id, 7);
        assert_eq!(updated.hospital_id, 3);
        assert_eq!(updated.occupied_beds, 80);
        assert_eq!(updated.beds, 120);
    }
}
