use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::MapPin;
use crate::components::layout::DashboardLayout;
use crate::error::{ApiError, ApiResult};
use crate::protocol::Location;
use crate::session::use_session;

/// 坐标输入解析：空串视为未填写，其余必须是合法数字
fn parse_coordinate(raw: &str, label: &str) -> ApiResult<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ApiError::validation(format!("{} invalide", label)))
}

/// 位置表单状态，坐标以文本持有、提交时解析
#[derive(Clone, Copy)]
struct LocationForm {
    latitude: RwSignal<String>,
    longitude: RwSignal<String>,
    address: RwSignal<String>,
    city: RwSignal<String>,
    region: RwSignal<String>,
    country: RwSignal<String>,
}

impl LocationForm {
    fn new() -> Self {
        Self {
            latitude: RwSignal::new(String::new()),
            longitude: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            city: RwSignal::new(String::new()),
            region: RwSignal::new(String::new()),
            country: RwSignal::new(String::new()),
        }
    }

    fn load(&self, location: &Location) {
        self.latitude
            .set(location.latitude.map(|v| v.to_string()).unwrap_or_default());
        self.longitude
            .set(location.longitude.map(|v| v.to_string()).unwrap_or_default());
        self.address.set(location.address.clone());
        self.city.set(location.city.clone());
        self.region.set(location.region.clone());
        self.country.set(location.country.clone());
    }

    fn to_record(&self, base: Location) -> ApiResult<Location> {
        Ok(Location {
            latitude: parse_coordinate(&self.latitude.get(), "Latitude")?,
            longitude: parse_coordinate(&self.longitude.get(), "Longitude")?,
            address: self.address.get(),
            city: self.city.get(),
            region: self.region.get(),
            country: self.country.get(),
            ..base
        })
    }
}

/// 文本输入框
#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    placeholder: &'static str,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type="text"
                placeholder=placeholder
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
                class="input input-bordered w-full"
            />
        </div>
    }
}

#[component]
pub fn LocationPage() -> impl IntoView {
    let session = use_session();

    let form = LocationForm::new();
    let (record, set_record) = signal(Location::default());
    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let load_location = {
        let session = session.clone();
        move || {
            let session = session.clone();
            set_loading.set(true);
            spawn_local(async move {
                match session.gateway().location().get().await {
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
        let load_location = load_location.clone();
        let is_authenticated = session.is_authenticated_signal();
        let is_loading = session.is_loading_signal();
        Effect::new(move |_| {
            if is_authenticated.get() && !is_loading.get() {
                load_location();
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
                    set_error_msg.set(None);

                    // 坐标解析失败直接贴错误，不发请求
                    let updated = match form.to_record(record.get()) {
                        Ok(updated) => updated,
                        Err(e) => {
                            set_error_msg.set(Some(e.to_string()));
                            return;
                        }
                    };

                    set_saving.set(true);
                    let session = session.clone();
                    spawn_local(async move {
                        match session.gateway().location().upsert(&updated).await {
                            Ok(data) => {
                                form.load(&data);
                                set_record.set(data);
                                set_notification.set(Some(("Localisation enregistrée".to_string(), false)));
                            }
                            Err(e) => {
                                set_notification.set(Some((format!("Échec de l'enregistrement : {}", e), true)));
                            }
                        }
                        set_saving.set(false);
                    });
                };

                view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div>
                                <h3 class="card-title">
                                    <MapPin attr:class="h-5 w-5" /> "Localisation"
                                </h3>
                                <p class="text-base-content/70 text-sm">
                                    "Position géographique utilisée pour orienter les patients vers votre établissement."
                                </p>
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
                                    <TextField id="latitude" label="Latitude" placeholder="3.8480" value=form.latitude />
                                    <TextField id="longitude" label="Longitude" placeholder="11.5021" value=form.longitude />
                                    <TextField id="address" label="Adresse" placeholder="Avenue de l'Indépendance" value=form.address />
                                    <TextField id="city" label="Ville" placeholder="Yaoundé" value=form.city />
                                    <TextField id="region" label="Région" placeholder="Centre" value=form.region />
                                    <TextField id="country" label="Pays" placeholder="Cameroun" value=form.country />
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
    fn coordinate_parsing() {
        assert_eq!(parse_coordinate("", "Latitude").unwrap(), None);
        assert_eq!(parse_coordinate("  ", "Latitude").unwrap(), None);
        assert_eq!(parse_coordinate("3.8480", "Latitude").unwrap(), Some(3.848));
        assert_eq!(parse_coordinate("-11.5", "Longitude").unwrap(), Some(-11.5));
        assert!(parse_coordinate("abc", "Latitude").is_err());
    }

    #[test]
    fn form_round_trips_coordinates() {
        let base = Location {
            id: 4,
            hospital_id: 1,
            latitude: Some(3.848),
            longitude: Some(11.5021),
            city: "Yaoundé".to_string(),
            ..Location::default()
        };

        let form = LocationForm::new();
        form.load(&base);
        assert_eq!(form.latitude.get(), "3.848");

        form.city.set("Douala".to_string());
        let updated = form.to_record(base.clone()).unwrap();
        assert_eq!(updated.id, 4);
        assert_eq!(updated.latitude, Some(3.848));
        assert_eq!(updated.city, "Douala");
    }

    #[test]
    fn blank_coordinates_clear_the_position() {
        let base = Location {
            latitude: Some(3.848),
            longitude: Some(11.5021),
            ..Location::default()
        };

        let form = LocationForm::new();
        form.load(&base);
        form.latitude.set(String::new());
        form.longitude.set(String::new());

        let updated = form.to_record(base).unwrap();
        assert_eq!(updated.latitude, None);
        assert_eq!(updated.longitude, None);
    }
}
