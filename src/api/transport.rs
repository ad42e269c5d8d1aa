//! HTTP 传输层
//!
//! 把请求抽象与具体网络实现解耦：网关只依赖 `HttpClient` trait，
//! 真实实现走浏览器 fetch（gloo-net），演示模式与测试各自注入替身。

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

#[cfg(test)]
use std::sync::Mutex;

// =========================================================
// 核心抽象层
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl From<HttpMethod> for gloo_net::http::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => gloo_net::http::Method::GET,
            HttpMethod::Post => gloo_net::http::Method::POST,
            HttpMethod::Put => gloo_net::http::Method::PUT,
            HttpMethod::Delete => gloo_net::http::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// 显式设置请求头（覆盖已有值，调用方优先）
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// 仅在键不存在时写入，用于注入默认头
    pub fn with_default_header(mut self, key: &str, value: &str) -> Self {
        self.headers
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
        self
    }

    /// 设置 JSON 请求体，并补上对应的 Content-Type
    pub fn with_json_body(mut self, body: serde_json::Value) -> Self {
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "application/json".to_string());
        self.body = Some(body.to_string());
        self
    }

    /// 设置表单编码请求体（登录端点使用）
    pub fn with_form_body(mut self, fields: &[(&str, &str)]) -> Self {
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "application/x-www-form-urlencoded".to_string());
        self.body = Some(encode_form(fields));
        self
    }
}

/// application/x-www-form-urlencoded 编码
///
/// 字母数字与 `-._*` 直传，空格编码为 `+`，其余字节百分号编码，
/// 与浏览器 URLSearchParams 的序列化结果一致。
fn encode_form(fields: &[(&str, &str)]) -> String {
    fn push_encoded(out: &mut String, value: &str) {
        for byte in value.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'*' => {
                    out.push(byte as char)
                }
                b' ' => out.push('+'),
                _ => {
                    out.push('%');
                    out.push_str(&format!("{:02X}", byte));
                }
            }
        }
    }

    let mut out = String::new();
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        push_encoded(&mut out, key);
        out.push('=');
        push_encoded(&mut out, value);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::decode(e.to_string()))
    }
}

#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

/// 启动时选定的传输实现（真实 fetch 或固定数据响应器）
pub type SharedHttpClient = Arc<dyn HttpClient + Send + Sync>;

// =========================================================
// 实现层: fetch 客户端
// =========================================================

/// 基于浏览器 fetch 的真实网络实现
#[derive(Clone)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = gloo_net::http::RequestBuilder::new(&req.url).method(req.method.into());
        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }

        let request = match req.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| ApiError::network(e.to_string()))?,
            None => builder
                .build()
                .map_err(|e| ApiError::network(e.to_string()))?,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: ScriptedHttpClient
// =========================================================

#[cfg(test)]
pub struct ScriptedHttpClient {
    // (URL, (状态码, 响应体))
    responses: Mutex<HashMap<String, (u16, String)>>,
    // 记录发出的请求 (URL, Method, Headers, Body)
    pub requests: Mutex<Vec<(String, String, HashMap<String, String>, Option<String>)>>,
}

#[cfg(test)]
impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
    }

    pub fn recorded(&self) -> Vec<(String, String, HashMap<String, String>, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for ScriptedHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.lock().unwrap().push((
            req.url.clone(),
            format!("{:?}", req.method),
            req.headers.clone(),
            req.body.clone(),
        ));

        let responses = self.responses.lock().unwrap();
        if let Some((status, body)) = responses.get(&req.url) {
            Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            })
        } else {
            Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            })
        }
    }
}

// =========================================================
// 单元测试
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_encoding_matches_url_search_params() {
        let body = encode_form(&[
            ("username", "contact@chy.cm"),
            ("password", "pass word+1"),
        ]);
        assert_eq!(body, "username=contact%40chy.cm&password=pass+word%2B1");
    }

    #[test]
    fn json_body_sets_content_type_once() {
        let req = HttpRequest::new("http://x/api/v1/services/", HttpMethod::Post)
            .with_json_body(serde_json::json!({"name":"Urgences"}));
        assert_eq!(
            req.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"Urgences"}"#));
    }

    #[test]
    fn explicit_header_beats_body_default() {
        let req = HttpRequest::new("http://x", HttpMethod::Post)
            .with_header("Content-Type", "application/json; charset=utf-8")
            .with_json_body(serde_json::json!({}));
        assert_eq!(
            req.headers.get("Content-Type").map(String::as_str),
            Some("application/json; charset=utf-8")
        );
    }

    #[test]
    fn default_header_does_not_override_explicit() {
        let req = HttpRequest::new("http://x", HttpMethod::Get)
            .with_header("Authorization", "Bearer custom")
            .with_default_header("Authorization", "Bearer stored");
        assert_eq!(
            req.headers.get("Authorization").map(String::as_str),
            Some("Bearer custom")
        );
    }
}
