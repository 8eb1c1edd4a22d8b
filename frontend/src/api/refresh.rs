//! 单飞令牌刷新 (Single-flight Refresh)
//!
//! 多个请求可能同时发现访问令牌过期。若各自发起刷新，后端轮换刷新令牌时
//! 每次刷新都会作废前一次发出的刷新令牌，造成虚假登出。因此同一时刻最多
//! 允许一个刷新请求在途：第一个发现过期的调用方创建共享 future，其余调用
//! 方克隆并等待同一个结果。
//!
//! - 成功：所有等待者拿到同一个新访问令牌，按等待顺序重放各自的请求
//! - 失败：所有等待者一起失败，会话被清空

use std::cell::RefCell;
use std::rc::Rc;

use fabriq_shared::{AuthResponse, RefreshTokenRequest};
use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::session::SessionStore;
use crate::web::{HttpClient, HttpMethod, HttpRequest};

/// 刷新失败原因（可克隆，因为要广播给所有等待者）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshError(pub String);

impl std::fmt::Display for RefreshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "token refresh failed: {}", self.0)
    }
}

impl std::error::Error for RefreshError {}

type RefreshResult = Result<String, RefreshError>;
type SharedRefresh = Shared<LocalBoxFuture<'static, RefreshResult>>;

/// 单飞刷新协调器
#[derive(Clone)]
pub struct RefreshGate {
    session: SessionStore,
    http: Rc<dyn HttpClient>,
    refresh_url: String,
    /// 在途刷新的共享 future；None 表示当前没有刷新在途
    in_flight: Rc<RefCell<Option<SharedRefresh>>>,
}

impl RefreshGate {
    pub fn new(session: SessionStore, http: Rc<dyn HttpClient>, refresh_url: String) -> Self {
        Self {
            session,
            http,
            refresh_url,
            in_flight: Rc::new(RefCell::new(None)),
        }
    }

    /// 等待一次刷新的结果；必要时发起它
    ///
    /// 成功返回新的访问令牌；失败时会话已被清空。
    pub async fn refresh(&self) -> RefreshResult {
        let shared = {
            // 借用不得跨 await 持有
            let mut slot = self.in_flight.borrow_mut();
            match slot.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let created = self.start_refresh();
                    *slot = Some(created.clone());
                    created
                }
            }
        };

        let result = shared.await;

        // 清除已完成的槽位，让下一个过期周期能发起新的刷新
        let mut slot = self.in_flight.borrow_mut();
        if slot.as_ref().map_or(false, |s| s.peek().is_some()) {
            *slot = None;
        }

        result
    }

    fn start_refresh(&self) -> SharedRefresh {
        let session = self.session.clone();
        let http = self.http.clone();
        let url = self.refresh_url.clone();

        perform_refresh(session, http, url).boxed_local().shared()
    }
}

/// 实际的刷新调用：`POST /api/auth/refresh`，不携带 Bearer 头
async fn perform_refresh(
    session: SessionStore,
    http: Rc<dyn HttpClient>,
    url: String,
) -> RefreshResult {
    let refresh_token = match session.refresh_token() {
        Some(token) if session.can_refresh() => token,
        _ => {
            session.purge();
            return Err(RefreshError("no usable refresh token".to_string()));
        }
    };

    let body = serde_json::to_string(&RefreshTokenRequest { refresh_token })
        .map_err(|e| RefreshError(e.to_string()))?;

    let request = HttpRequest::new(&url, HttpMethod::Post).with_json(body);

    match http.send(request).await {
        Ok(response) if response.ok() => {
            match serde_json::from_str::<AuthResponse>(&response.body) {
                Ok(tokens) => {
                    session.save_tokens(&tokens);
                    Ok(tokens.access_token)
                }
                Err(e) => {
                    session.purge();
                    Err(RefreshError(format!("bad refresh response: {}", e)))
                }
            }
        }
        Ok(response) => {
            session.purge();
            Err(RefreshError(format!(
                "refresh rejected with status {}",
                response.status
            )))
        }
        Err(e) => {
            // 网络失败不能确定刷新令牌的状态，但会话已不可信
            session.purge();
            Err(RefreshError(e.to_string()))
        }
    }
}
