//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 令牌本身由 `SessionStore` 持久化；本模块只维护驱动 UI 的信号层：
//! 当前用户与"已登录"信号。路由服务通过注入的信号检查认证状态。

use leptos::prelude::*;
use leptos::task::spawn_local;
use send_wrapper::SendWrapper;

use fabriq_shared::LoginRequest;

use crate::api::{ApiError, AuthApi};
use crate::session::{SessionStore, User};

/// 认证上下文
///
/// 包含当前用户信号与会话存取，通过 Context 在组件间共享。
/// Context 要求 `Send + Sync`，单线程的会话存取经 `SendWrapper` 包装。
#[derive(Clone)]
pub struct AuthContext {
    session: SendWrapper<SessionStore>,
    /// 当前用户；None 表示未登录
    user: RwSignal<Option<User>>,
}

impl AuthContext {
    /// 创建认证上下文并从持久化会话恢复初始状态
    ///
    /// 只要刷新令牌仍可用就恢复用户身份：访问令牌过期的情况交给
    /// 守卫/API 层的惰性刷新处理。
    pub fn new(session: SessionStore) -> Self {
        let initial = if session.is_authenticated() || session.can_refresh() {
            session.current_user()
        } else {
            // 残留的死会话直接清掉
            session.purge();
            None
        };

        Self {
            session: SendWrapper::new(session),
            user: RwSignal::new(initial),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn user(&self) -> RwSignal<Option<User>> {
        self.user
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let user = self.user;
        Signal::derive(move || user.get().is_some())
    }

    /// 当前用户是否持有任一给定角色（响应式）
    pub fn has_any_role(&self, required: &'static [&'static str]) -> Signal<bool> {
        let user = self.user;
        Signal::derive(move || {
            user.get()
                .map(|u| u.roles.iter().any(|r| required.contains(&r.as_str())))
                .unwrap_or(false)
        })
    }

    /// 令牌写入后同步用户信号（登录或刷新成功时调用）
    pub fn sync_from_session(&self) {
        self.user.set(self.session.current_user());
    }

    /// 清空信号层（会话本身由调用方清空）
    fn clear(&self) {
        self.user.set(None);
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录：换取令牌对，持久化后更新用户信号
pub async fn login(
    ctx: &AuthContext,
    api: &AuthApi,
    credentials: &LoginRequest,
) -> Result<(), ApiError> {
    let tokens = api.login(credentials).await?;
    ctx.session.save_tokens(&tokens);
    ctx.sync_from_session();
    Ok(())
}

/// 注销并清除状态
///
/// 后端通知是尽力而为：无论成败，本地会话都会被清空。
/// 导航由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext, api: AuthApi) {
    let session = ctx.session().clone();
    let ctx = ctx.clone();
    spawn_local(async move {
        if api.logout().await.is_err() {
            crate::log_info!("[Auth] logout notification failed, clearing locally");
        }
        session.purge();
        ctx.clear();
    });
}
