//! 注册表单状态管理模块
//!
//! 将零散的 signal 整合为 `RegisterFormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到请求对象的转换

use leptos::prelude::*;

use crate::protocol::RegisterRequest;

/// 注册表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，适合直接在闭包间传递。
#[derive(Clone, Copy)]
pub struct RegisterFormState {
    pub name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub confirm_password: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub address: RwSignal<String>,
    pub city: RwSignal<String>,
}

impl RegisterFormState {
    /// 创建新的表单状态，所有字段为空
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            confirm_password: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            city: RwSignal::new(String::new()),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.password.set(String::new());
        self.confirm_password.set(String::new());
        self.phone.set(String::new());
        self.address.set(String::new());
        self.city.set(String::new());
    }

    /// 本地一致性检查：两次输入的密码必须一致
    pub fn passwords_match(&self) -> bool {
        self.password.get() == self.confirm_password.get()
    }

    /// 将表单状态转换为注册请求对象
    ///
    /// 表单未采集的字段（国家、坐标、大区）使用部署默认值。
    pub fn to_request(&self) -> RegisterRequest {
        let mut request =
            RegisterRequest::new(self.name.get(), self.email.get(), self.password.get());
        request.phone = self.phone.get();
        request.address = self.address.get();
        request.city = self.city.get();
        request
    }
}

impl Default for RegisterFormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_request_keeps_deployment_defaults() {
        let form = RegisterFormState::new();
        form.name.set("Centre Hospitalier".to_string());
        form.email.set("contact@chy.cm".to_string());
        form.password.set("secret-6".to_string());
        form.phone.set("+237 699 000 000".to_string());

        let request = form.to_request();
        assert_eq!(request.name, "Centre Hospitalier");
        assert_eq!(request.phone, "+237 699 000 000");
        assert_eq!(request.country, "Cameroun");
        assert_eq!(request.latitude, 0.0);
        assert_eq!(request.longitude, 0.0);
        assert!(request.region.is_empty());
    }

    #[test]
    fn passwords_must_match() {
        let form = RegisterFormState::new();
        form.password.set("secret-6".to_string());
        form.confirm_password.set("secret-7".to_string());
        assert!(!form.passwords_match());

        form.confirm_password.set("secret-6".to_string());
        assert!(form.passwords_match());
    }

    #[test]
    fn reset_clears_every_field() {
        let form = RegisterFormState::new();
        form.name.set("Centre".to_string());
        form.city.set("Yaoundé".to_string());

        form.reset();
        assert!(form.name.get().is_empty());
        assert!(form.city.get().is_empty());
    }
}
