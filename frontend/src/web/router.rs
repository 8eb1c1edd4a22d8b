//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 导航流程："请求 -> 守卫评估 -> (必要时刷新) -> 处理 -> 加载"。
//! 守卫决策本身是纯函数（见 `guard` 模块），本模块只执行副作用。

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;

use crate::guard::{self, RouteDecision};
use crate::session::{SessionStore, TokenRefresher};

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 获取当前查询串（含 `?` 前缀，可能为空）
pub fn current_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 会话与刷新接口通过注入传入，路由层不直接认识 API 层。
/// 两者都是单线程对象，经 `SendWrapper` 满足 Context 的 `Send + Sync` 要求。
#[derive(Clone)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话状态（守卫评估的输入）
    session: SendWrapper<SessionStore>,
    /// 令牌刷新接口（守卫要求刷新时调用，内部单飞）
    refresher: SendWrapper<Rc<dyn TokenRefresher>>,
    /// 认证状态信号，驱动登录/登出时的自动重定向
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(
        session: SessionStore,
        refresher: Rc<dyn TokenRefresher>,
        is_authenticated: Signal<bool>,
    ) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session: SendWrapper::new(session),
            refresher: SendWrapper::new(refresher),
            is_authenticated,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.apply(AppRoute::from_path(path), true);
    }

    /// 不留历史记录的导航（重定向语义）
    pub fn replace(&self, path: &str) {
        self.apply(AppRoute::from_path(path), false);
    }

    /// 执行一次守卫评估并落实其决策
    ///
    /// # Arguments
    /// * `target` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn apply(&self, target: AppRoute, use_push: bool) {
        match guard::evaluate(&self.session, &target) {
            RouteDecision::Allow => {
                let path = target.to_path();
                if use_push {
                    push_history_state(&path);
                } else {
                    replace_history_state(&path);
                }
                self.set_route.set(target);
            }
            RouteDecision::Deny { redirect, .. } => {
                crate::log_info!("[Router] denied {} -> {}", target.to_path(), redirect);
                // 拒绝导致的跳转不应留下历史记录
                replace_history_state(&redirect);
                self.set_route.set(AppRoute::from_path(&redirect));
            }
            RouteDecision::Refresh => {
                // 访问令牌过期但可刷新：先刷新（单飞），成功后重新评估
                crate::log_info!("[Router] stale session, refreshing before {}", target);
                let this = self.clone();
                spawn_local(async move {
                    if this.refresher.refresh_session().await {
                        this.apply(target, use_push);
                    } else {
                        // 刷新失败时会话已被清空，回到登录页并携带 returnUrl
                        let redirect = AppRoute::login_redirect_for(&target);
                        replace_history_state(&redirect);
                        this.set_route.set(AppRoute::Login);
                    }
                });
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    ///
    /// popstate 时同样执行守卫流程，但一律用 replaceState 修正 URL。
    fn init_popstate_listener(&self) {
        let this = self.clone();

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            this.apply(target, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let route = current_route.get_untracked();

            if is_auth {
                // 用户刚登录：离开登录页，优先回到 returnUrl 指定的位置
                if route.should_redirect_when_authenticated() {
                    let target = AppRoute::return_url_from_query(&current_search())
                        .unwrap_or_else(|| AppRoute::Home.to_path());
                    crate::log_info!("[Router] signed in, redirecting to {}", target);
                    push_history_state(&target);
                    set_route.set(AppRoute::from_path(&target));
                }
            } else {
                // 用户登出：受保护页面一律弹回登录页
                if route.requires_auth() {
                    let redirect = AppRoute::login_redirect_for(&route);
                    crate::log_info!("[Router] signed out, redirecting to login");
                    push_history_state(&redirect);
                    set_route.set(AppRoute::Login);
                }
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    session: SessionStore,
    refresher: Rc<dyn TokenRefresher>,
    is_authenticated: Signal<bool>,
) -> RouterService {
    let router = RouterService::new(session, refresher, is_authenticated);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    // 初始 URL 也要过守卫（直接输入受保护地址刷新页面的情况）
    let initial = router.current_route.get_untracked();
    router.apply(initial, false);

    provide_context(router.clone());
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话状态
    session: SessionStore,
    /// 令牌刷新接口
    refresher: Rc<dyn TokenRefresher>,
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session, refresher, is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
