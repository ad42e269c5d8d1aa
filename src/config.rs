//! 启动期配置模块
//!
//! 环境变量在构建时注入（Trunk 会把 `PULSEAI_*` 传给 rustc），
//! 应用启动时读取一次生成 `AppConfig`，此后全程使用同一实例，
//! 任何其他模块都不再接触环境。

// =========================================================
// 默认值
// =========================================================

/// 默认后端根地址（本地开发环境）
const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// API 路径前缀，规范化后的根地址总是以它结尾
const API_SUFFIX: &str = "/api/v1";

// =========================================================
// 配置结构体
// =========================================================

/// 应用配置
///
/// 只在启动时构建一次，随后注入网关。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 规范化后的 API 根地址（无尾部斜杠，以 `/api/v1` 结尾）
    pub api_root: String,
    /// 演示模式开关：启用后使用固定数据响应器，不访问网络
    pub mock_mode: bool,
}

impl AppConfig {
    /// 从构建期环境变量读取配置
    ///
    /// - `PULSEAI_API_URL`: 后端根地址，未设置或为空时使用本地默认值
    /// - `PULSEAI_MOCK_MODE`: 去除空白后严格等于 `"true"` 才启用演示模式
    pub fn from_env() -> Self {
        let raw_url = option_env!("PULSEAI_API_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_API_URL);
        let mock_flag = option_env!("PULSEAI_MOCK_MODE").unwrap_or("");
        Self::from_values(raw_url, mock_flag)
    }

    /// 由原始值构建配置（测试与 `from_env` 共用）
    pub fn from_values(raw_url: &str, mock_flag: &str) -> Self {
        Self {
            api_root: normalize_base_url(raw_url),
            mock_mode: mock_flag.trim() == "true",
        }
    }
}

// =========================================================
// 根地址规范化
// =========================================================

/// 规范化后端根地址
///
/// 1. 去除首尾空白
/// 2. 去除所有尾部斜杠
/// 3. 若未以 `/api/v1` 结尾则补上
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.ends_with(API_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_SUFFIX)
    }
}

// =========================================================
// 单元测试
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_suffix() {
        assert_eq!(
            normalize_base_url("http://localhost:8000"),
            "http://localhost:8000/api/v1"
        );
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/"),
            "http://localhost:8000/api/v1"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000///"),
            "http://localhost:8000/api/v1"
        );
    }

    #[test]
    fn existing_suffix_is_not_duplicated() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/api/v1"),
            "http://localhost:8000/api/v1"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000/api/v1/"),
            "http://localhost:8000/api/v1"
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            normalize_base_url("  https://api.pulseai.cm  "),
            "https://api.pulseai.cm/api/v1"
        );
    }

    #[test]
    fn mock_flag_requires_exact_true() {
        assert!(AppConfig::from_values("http://x", "true").mock_mode);
        assert!(AppConfig::from_values("http://x", " true ").mock_mode);
        assert!(!AppConfig::from_values("http://x", "TRUE").mock_mode);
        assert!(!AppConfig::from_values("http://x", "1").mock_mode);
        assert!(!AppConfig::from_values("http://x", "").mock_mode);
    }

    #[test]
    fn from_values_normalizes_root() {
        let config = AppConfig::from_values("http://localhost:8000//", "false");
        assert_eq!(config.api_root, "http://localhost:8000/api/v1");
        assert!(!config.mock_mode);
    }
}
