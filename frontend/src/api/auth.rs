//! 认证端点客户端

use std::rc::Rc;

use fabriq_shared::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use send_wrapper::SendWrapper;

use super::client::{ApiCore, ApiError};

#[derive(Clone)]
pub struct AuthApi {
    core: SendWrapper<Rc<ApiCore>>,
}

impl AuthApi {
    pub fn new(core: Rc<ApiCore>) -> Self {
        Self {
            core: SendWrapper::new(core),
        }
    }

    /// 登录；成功后令牌对由调用方交给会话服务持久化
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.core.post_public("/api/auth/login", credentials).await
    }

    pub async fn register(&self, payload: &RegisterRequest) -> Result<UserResponse, ApiError> {
        self.core.post_public("/api/users/register", payload).await
    }

    /// 登出通知后端；无论成败，本地会话都会被清空
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.core.post_no_content("/api/auth/logout").await
    }
}
