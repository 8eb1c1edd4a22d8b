//! Fabriq ERP 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route` / `web::router`: 路由定义与路由服务（守卫在导航层执行）
//! - `session` / `auth`: 令牌生命周期与认证信号
//! - `api`: 每资源一个客户端，统一经由 `ApiCore`（单飞刷新、401 重放）
//! - `state`: 客户列表的纯归约状态切片
//! - `components`: UI 组件层

use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;

mod api;
mod auth;
mod components;
mod config;
mod guard;
mod session;
mod state;
mod theme;
mod toast;

// 原生 Web API 封装模块
// 以 trait 暴露存储/HTTP/时钟接口，非 wasm 目标下可注入内存替身测试。
pub(crate) mod web;

use api::ApiCore;
use auth::AuthContext;
use components::delivery::customer_detail::CustomerDetailPage;
use components::delivery::customers::CustomersPage;
use components::delivery::deliveries::DeliveriesPage;
use components::delivery::orders::OrdersPage;
use components::header::AppHeader;
use components::home::HomePage;
use components::login::LoginPage;
use components::procurement::materials::MaterialsPage;
use components::procurement::suppliers::SuppliersPage;
use components::procurement::supply_orders::SupplyOrdersPage;
use components::production::bill_of_materials::BillOfMaterialsPage;
use components::production::production_orders::ProductionOrdersPage;
use components::production::products::ProductsPage;
use components::profile::ProfilePage;
use components::register::RegisterPage;
use components::unauthorized::UnauthorizedPage;
use session::{BrowserClock, SessionStore, TokenRefresher};
use theme::provide_theme;
use toast::{ToastHost, provide_toasts};
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};
use web::{FetchHttpClient, HttpClient, KeyValueStore, LocalStorage};

// =========================================================
// 跨目标日志宏
// =========================================================

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&format!($($arg)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        println!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::error_1(&format!($($arg)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!($($arg)*);
    }};
}

/// 从 Context 获取共享的 API 核心
///
/// Context 值必须 `Send + Sync`，因此核心以 `SendWrapper` 包装存入；
/// CSR 单线程下取出即解包。
pub(crate) fn use_api_core() -> Rc<ApiCore> {
    use_context::<SendWrapper<Rc<ApiCore>>>()
        .expect("ApiCore should be provided")
        .take()
}

/// 路由匹配函数
///
/// 登录/注册页独占整屏；其余页面套在导航栏布局里。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        other => {
            let page = match other {
                AppRoute::Home => view! { <HomePage /> }.into_any(),
                AppRoute::Unauthorized => view! { <UnauthorizedPage /> }.into_any(),
                AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
                AppRoute::Suppliers => view! { <SuppliersPage /> }.into_any(),
                AppRoute::Materials => view! { <MaterialsPage /> }.into_any(),
                AppRoute::SupplyOrders => view! { <SupplyOrdersPage /> }.into_any(),
                AppRoute::Products => view! { <ProductsPage /> }.into_any(),
                AppRoute::BillOfMaterials => view! { <BillOfMaterialsPage /> }.into_any(),
                AppRoute::ProductionOrders => view! { <ProductionOrdersPage /> }.into_any(),
                AppRoute::Customers => view! { <CustomersPage /> }.into_any(),
                AppRoute::CustomerDetail(id) => view! { <CustomerDetailPage id=id /> }.into_any(),
                AppRoute::Orders => view! { <OrdersPage /> }.into_any(),
                AppRoute::Deliveries => view! { <DeliveriesPage /> }.into_any(),
                _ => view! {
                    <div class="flex items-center justify-center min-h-[70vh] bg-base-200">
                        <div class="text-center">
                            <h1 class="text-6xl font-bold text-error">"404"</h1>
                            <p class="text-xl mt-4">"Page not found"</p>
                        </div>
                    </div>
                }
                .into_any(),
            };
            view! {
                <div class="min-h-screen bg-base-200">
                    <AppHeader />
                    {page}
                </div>
            }
            .into_any()
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 浏览器端基础设施
    let store: Rc<dyn KeyValueStore> = Rc::new(LocalStorage);
    let http: Rc<dyn HttpClient> = Rc::new(FetchHttpClient);
    let session = SessionStore::new(store.clone(), Rc::new(BrowserClock));

    // 2. API 核心：单飞刷新与 401 重放都在这里
    let base_url = config::api_base_url(store.as_ref());
    let core = Rc::new(ApiCore::new(base_url, http, session.clone()));
    provide_context(SendWrapper::new(core.clone()));

    // 3. 认证上下文：从持久化会话恢复
    let auth_ctx = AuthContext::new(session.clone());
    provide_context(auth_ctx.clone());

    // 4. 主题与提示条
    provide_theme(store);
    provide_toasts();

    // 5. 路由器：注入会话、刷新接口与认证信号实现守卫
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let refresher: Rc<dyn TokenRefresher> = core;

    view! {
        <Router session=session refresher=refresher is_authenticated=is_authenticated>
            <ToastHost />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Leptos 0.8 的 Context 与视图闭包要求 `Send + Sync + 'static`。
    // 凡是进入该边界的类型都在这里做编译期断言；
    // 谁把裸 `Rc` 字段加回去，这条测试就无法通过编译。
    #[test]
    fn context_types_satisfy_leptos_bounds() {
        fn assert_boundary<T: Clone + Send + Sync + 'static>() {}

        assert_boundary::<SendWrapper<Rc<ApiCore>>>();
        assert_boundary::<AuthContext>();
        assert_boundary::<web::router::RouterService>();
        assert_boundary::<api::AuthApi>();
        assert_boundary::<api::CustomerApi>();
        assert_boundary::<api::SupplierApi>();
        assert_boundary::<api::MaterialApi>();
        assert_boundary::<api::SupplyOrderApi>();
        assert_boundary::<api::ProductApi>();
        assert_boundary::<api::ProductionOrderApi>();
        assert_boundary::<api::OrderApi>();
        assert_boundary::<api::DeliveryApi>();
        assert_boundary::<state::CustomerStore>();
        assert_boundary::<theme::ThemeContext>();
        assert_boundary::<toast::ToastContext>();
    }
}
