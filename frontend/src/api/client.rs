//! API 核心：请求发送与 401 重放
//!
//! 所有资源客户端经由 `ApiCore` 发送请求。职责：
//! - 拼接基础 URL 与端点路径
//! - 附加 Bearer 授权头（刷新调用本身除外）
//! - 惰性过期检测：发送前发现访问令牌已过期且可刷新时，先走单飞刷新
//! - 收到 401 时触发单飞刷新并用新令牌重放一次；刷新失败则清空会话

use std::rc::Rc;

use fabriq_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::session::{SessionStore, TokenRefresher};
use crate::web::{HttpClient, HttpMethod, HttpRequest, HttpResponse};

use super::refresh::RefreshGate;

// =========================================================
// 错误类型
// =========================================================

/// API 调用错误分类
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 传输层失败（无响应）
    Network(String),
    /// 后端返回非 2xx；`message` 为错误体中的后端消息（若有）
    Status { status: u16, message: Option<String> },
    /// 2xx 但响应体无法解码
    Decode(String),
    /// 刷新失败，会话已清空，调用方应跳转登录
    SessionExpired,
}

impl ApiError {
    /// 面向用户的消息：优先后端原文，否则使用给定的回退文案
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::SessionExpired => "Session expired, please sign in again".to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    fn from_response(response: &HttpResponse) -> Self {
        // 后端错误体的惯例外形是 {"message": "..."}
        let message = serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_string));
        ApiError::Status {
            status: response.status,
            message,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::Status { status, message } => match message {
                Some(msg) => write!(f, "server error {}: {}", status, msg),
                None => write!(f, "server error {}", status),
            },
            ApiError::Decode(msg) => write!(f, "response decode error: {}", msg),
            ApiError::SessionExpired => write!(f, "session expired"),
        }
    }
}

impl std::error::Error for ApiError {}

// =========================================================
// API 核心
// =========================================================

pub struct ApiCore {
    base_url: String,
    http: Rc<dyn HttpClient>,
    session: SessionStore,
    gate: RefreshGate,
}

impl ApiCore {
    pub fn new(base_url: impl Into<String>, http: Rc<dyn HttpClient>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let gate = RefreshGate::new(
            session.clone(),
            http.clone(),
            format!("{}/api/auth/refresh", base_url),
        );
        Self {
            base_url,
            http,
            session,
            gate,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // =========================================================
    // 公开端点（登录/注册/刷新）：不附加 Bearer
    // =========================================================

    pub async fn post_public<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = HttpRequest::new(self.url(path), HttpMethod::Post).with_json(body);
        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response)
    }

    // =========================================================
    // 授权端点
    // =========================================================

    /// 发送一次授权请求，处理过期与 401 重放
    async fn send_authorized(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        // 惰性过期检测：请求时发现过期，先刷新再发送
        if !self.session.is_authenticated() && self.session.can_refresh() {
            self.gate
                .refresh()
                .await
                .map_err(|_| ApiError::SessionExpired)?;
        }

        let response = self.dispatch(method, path, body.clone(), None).await?;
        if response.status != 401 {
            return Ok(response);
        }

        // 401：等待（或发起）单飞刷新，用新令牌重放一次
        let renewed = self
            .gate
            .refresh()
            .await
            .map_err(|_| ApiError::SessionExpired)?;
        self.dispatch(method, path, body, Some(renewed)).await
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        token_override: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let mut request = HttpRequest::new(self.url(path), method);
        if let Some(body) = body {
            request = request.with_json(body);
        }
        if let Some(token) = token_override.or_else(|| self.session.access_token()) {
            request = request.with_header(
                HEADER_AUTHORIZATION,
                &format!("{}{}", BEARER_PREFIX, token),
            );
        }
        self.http
            .send(request)
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
        if !response.ok() {
            return Err(ApiError::from_response(&response));
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn expect_ok(response: HttpResponse) -> Result<(), ApiError> {
        if response.ok() {
            Ok(())
        } else {
            Err(ApiError::from_response(&response))
        }
    }

    // --- 类型化的动词封装 ---

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send_authorized(HttpMethod::Get, path, None).await?;
        Self::decode(response)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self
            .send_authorized(HttpMethod::Post, path, Some(body))
            .await?;
        Self::decode(response)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self
            .send_authorized(HttpMethod::Put, path, Some(body))
            .await?;
        Self::decode(response)
    }

    /// 不关心响应体的 PUT（如取消、标记收货）
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .send_authorized(HttpMethod::Put, path, Some("{}".to_string()))
            .await?;
        Self::decode(response)
    }

    pub async fn put_no_content(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .send_authorized(HttpMethod::Put, path, Some("{}".to_string()))
            .await?;
        Self::expect_ok(response)
    }

    pub async fn post_no_content(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .send_authorized(HttpMethod::Post, path, Some("{}".to_string()))
            .await?;
        Self::expect_ok(response)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send_authorized(HttpMethod::Delete, path, None).await?;
        Self::expect_ok(response)
    }
}

#[async_trait::async_trait(?Send)]
impl TokenRefresher for ApiCore {
    async fn refresh_session(&self) -> bool {
        self.gate.refresh().await.is_ok()
    }
}
