//! 错误类型模块
//!
//! 网关的所有失败都归一化为 `ApiError`，页面层只需展示 message。

use std::fmt;

// =========================================================
// 错误类别枚举
// =========================================================

/// 错误类别枚举
/// 区分失败发生的层次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 网络层失败，未拿到任何响应
    Network,
    /// 后端返回非 2xx 状态
    Api,
    /// 2xx 响应但响应体无法解析
    Decode,
    /// 提交前的本地校验失败，未发起网络请求
    Validation,
}

// =========================================================
// 核心错误类型
// =========================================================

/// 网关错误
///
/// - kind: 错误类别
/// - message: 可直接展示的错误消息
/// - status: 仅 `Api` 类别携带的 HTTP 状态码
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    status: Option<u16>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Api,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    // --- Accessors ---

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// 可展示的错误消息
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP 状态码（仅 `Api` 类别）
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 页面直接展示 Display 输出，保持为纯 message
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 响应体错误信息提取
// =========================================================

/// 从失败响应体提取可读的错误信息
///
/// 依次尝试：JSON 的 `detail` 字段、`message` 字段、原始文本，
/// 响应体为空时退化为 `"Error <status>"`。
pub fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|v| v.as_str()) {
            return detail.to_string();
        }
        if let Some(message) = value.get("message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }
    if !body.is_empty() {
        return body.to_string();
    }
    format!("Error {}", status)
}

// =========================================================
// 单元测试
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_field_wins() {
        let body = r#"{"detail":"invalid credentials"}"#;
        assert_eq!(extract_error_message(401, body), "invalid credentials");
    }

    #[test]
    fn message_field_is_fallback() {
        let body = r#"{"message":"quota exceeded"}"#;
        assert_eq!(extract_error_message(429, body), "quota exceeded");
    }

    #[test]
    fn detail_takes_precedence_over_message() {
        let body = r#"{"detail":"a","message":"b"}"#;
        assert_eq!(extract_error_message(400, body), "a");
    }

    #[test]
    fn raw_text_when_not_json() {
        assert_eq!(extract_error_message(502, "Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn non_string_detail_falls_through_to_raw_text() {
        // FastAPI 的校验错误会把 detail 设成数组
        let body = r#"{"detail":[{"loc":["body","email"]}]}"#;
        assert_eq!(extract_error_message(422, body), body);
    }

    #[test]
    fn empty_body_uses_status() {
        assert_eq!(extract_error_message(500, ""), "Error 500");
    }

    #[test]
    fn display_is_plain_message() {
        let err = ApiError::api(401, "invalid credentials");
        assert_eq!(err.to_string(), "invalid credentials");
        assert_eq!(err.status(), Some(401));
    }
}
