//! 本地存储模块
//!
//! `web_sys::Storage` 的最小封装，所有存取都经由 [`LocalStorage::with`]。
//! 本应用里只承载会话令牌一个键。

/// 本地存储封装
///
/// 浏览器禁用存储或处于隐私模式时所有操作静默降级：
/// 读取返回 `None`，写入返回 `false`，调用方按"无持久化凭证"处理。
pub struct LocalStorage;

impl LocalStorage {
    /// 在可用的 Storage 上执行操作，存储不可用时返回 `None`
    fn with<T>(op: impl FnOnce(&web_sys::Storage) -> Option<T>) -> Option<T> {
        let storage = web_sys::window()?.local_storage().ok()??;
        op(&storage)
    }

    /// 读取键值，键不存在或存储不可用时返回 `None`
    pub fn get(key: &str) -> Option<String> {
        Self::with(|s| s.get_item(key).ok()?)
    }

    /// 写入键值，返回是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::with(|s| s.set_item(key, value).ok()).is_some()
    }

    /// 删除键值对，返回是否成功
    pub fn delete(key: &str) -> bool {
        Self::with(|s| s.remove_item(key).ok()).is_some()
    }
}
