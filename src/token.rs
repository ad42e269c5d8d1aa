//! 凭证存储模块
//!
//! 会话令牌唯一的持久化通道。浏览器实现落在 LocalStorage，
//! 测试注入内存实现。网关读它注入 Bearer 头，会话层写它。

use std::sync::Arc;

use crate::web::LocalStorage;

/// LocalStorage 中的令牌键名（与既有部署保持一致，升级不丢会话）
pub const TOKEN_STORAGE_KEY: &str = "token";

/// 令牌存取抽象
pub trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// 启动时构建一次，网关与会话共享同一实例
pub type SharedTokenStore = Arc<dyn TokenStore + Send + Sync>;

// =========================================================
// 浏览器实现
// =========================================================

/// LocalStorage 实现
#[derive(Clone, Default)]
pub struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
    fn get(&self) -> Option<String> {
        LocalStorage::get(TOKEN_STORAGE_KEY)
    }

    fn set(&self, token: &str) {
        LocalStorage::set(TOKEN_STORAGE_KEY, token);
    }

    fn clear(&self) {
        LocalStorage::delete(TOKEN_STORAGE_KEY);
    }
}

// =========================================================
// 测试工具: MemoryTokenStore
// =========================================================

#[cfg(test)]
pub struct MemoryTokenStore(std::sync::Mutex<Option<String>>);

#[cfg(test)]
impl MemoryTokenStore {
    pub fn new() -> Self {
        Self(std::sync::Mutex::new(None))
    }

    pub fn with_token(token: &str) -> Self {
        Self(std::sync::Mutex::new(Some(token.to_string())))
    }
}

#[cfg(test)]
impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.0.lock().unwrap().clone()
    }

    fn set(&self, token: &str) {
        *self.0.lock().unwrap() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.0.lock().unwrap() = None;
    }
}
