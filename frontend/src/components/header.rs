//! 顶部导航栏
//!
//! 左侧为品牌与按域分组的菜单（仅管理员可见），右侧为主题切换与用户菜单。
//! 所有跳转都走路由服务，保证守卫逻辑统一生效。

use leptos::prelude::*;

use fabriq_shared::ROLE_ADMIN;

use crate::api::AuthApi;
use crate::auth::{logout, use_auth};
use crate::theme::use_theme;
use crate::web::router::use_router;

/// 经由路由服务的应用内链接
#[component]
pub fn NavLink(#[prop(into)] to: String, children: Children) -> impl IntoView {
    let router = use_router();

    let href = to.clone();
    let on_click = move |ev: leptos::web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&to);
    };

    view! {
        <a href=href on:click=on_click>
            {children()}
        </a>
    }
}

#[component]
pub fn AppHeader() -> impl IntoView {
    let auth = use_auth();
    let theme = use_theme();

    let user = auth.user();
    let is_admin = auth.has_any_role(&[ROLE_ADMIN]);
    let is_authenticated = auth.is_authenticated_signal();
    let is_dark = theme.is_dark();

    let username = move || {
        user.get()
            .map(|u| u.username)
            .unwrap_or_default()
    };

    // Context 只在组件作用域可用，事件回调里解析会拿不到
    let auth_api = AuthApi::new(crate::use_api_core());
    let on_logout = {
        let auth = auth.clone();
        move |_| logout(&auth, auth_api.clone())
    };

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="navbar-start">
                <NavLink to="/">
                    <span class="btn btn-ghost text-xl font-bold text-primary">"Fabriq ERP"</span>
                </NavLink>
            </div>

            <div class="navbar-center">
                <Show when=move || is_admin.get()>
                    <ul class="menu menu-horizontal px-1">
                        <li>
                            <details>
                                <summary>"Procurement"</summary>
                                <ul class="p-2 bg-base-100 rounded-box shadow z-40 w-48">
                                    <li><NavLink to="/procurement/suppliers">"Suppliers"</NavLink></li>
                                    <li><NavLink to="/procurement/materials">"Raw materials"</NavLink></li>
                                    <li><NavLink to="/procurement/orders">"Supply orders"</NavLink></li>
                                </ul>
                            </details>
                        </li>
                        <li>
                            <details>
                                <summary>"Production"</summary>
                                <ul class="p-2 bg-base-100 rounded-box shadow z-40 w-48">
                                    <li><NavLink to="/production/products">"Products"</NavLink></li>
                                    <li><NavLink to="/production/bill-of-materials">"Bill of materials"</NavLink></li>
                                    <li><NavLink to="/production/production-orders">"Production orders"</NavLink></li>
                                </ul>
                            </details>
                        </li>
                        <li>
                            <details>
                                <summary>"Delivery"</summary>
                                <ul class="p-2 bg-base-100 rounded-box shadow z-40 w-48">
                                    <li><NavLink to="/delivery/customers">"Customers"</NavLink></li>
                                    <li><NavLink to="/delivery/orders">"Orders"</NavLink></li>
                                    <li><NavLink to="/delivery/deliveries">"Deliveries"</NavLink></li>
                                </ul>
                            </details>
                        </li>
                    </ul>
                </Show>
            </div>

            <div class="navbar-end gap-2">
                // 主题切换
                <label class="swap swap-rotate btn btn-ghost btn-circle">
                    <input
                        type="checkbox"
                        prop:checked=move || is_dark.get()
                        on:change=move |_| theme.toggle()
                    />
                    <span class="swap-on">"🌙"</span>
                    <span class="swap-off">"☀️"</span>
                </label>

                <Show
                    when=move || is_authenticated.get()
                    fallback=move || view! {
                        <NavLink to="/login">
                            <span class="btn btn-primary btn-sm">"Sign in"</span>
                        </NavLink>
                        <NavLink to="/register">
                            <span class="btn btn-ghost btn-sm">"Register"</span>
                        </NavLink>
                    }
                >
                    <div class="dropdown dropdown-end">
                        <div tabindex="0" role="button" class="btn btn-ghost gap-2">
                            <div class="avatar placeholder">
                                <div class="bg-primary text-primary-content rounded-full w-8">
                                    <span class="text-sm uppercase">
                                        {move || username().chars().next().unwrap_or('?').to_string()}
                                    </span>
                                </div>
                            </div>
                            <span class="hidden md:inline">{username}</span>
                        </div>
                        <ul tabindex="0" class="menu dropdown-content bg-base-100 rounded-box shadow z-40 w-48 p-2 mt-2">
                            <li><NavLink to="/profile">"Profile"</NavLink></li>
                            <li>
                                <button on:click=on_logout.clone() class="text-error">
                                    "Sign out"
                                </button>
                            </li>
                        </ul>
                    </div>
                </Show>
            </div>
        </div>
    }
}
