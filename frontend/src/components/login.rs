//! 登录页
//!
//! 提交后换取令牌对；跳转由路由服务的认证状态监听处理，
//! `returnUrl` 查询参数在那里被读取并兑现。

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::LoginRequest;

use crate::api::AuthApi;
use crate::auth::{login, use_auth};
use crate::components::header::NavLink;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    // Context 在 spawn_local 的 future 里已经不可用，句柄必须在组件作用域解析
    let auth_api = AuthApi::new(crate::use_api_core());

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get().trim().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let auth = auth.clone();
        let api = auth_api.clone();
        spawn_local(async move {
            let credentials = LoginRequest {
                username: username.get_untracked().trim().to_string(),
                password: password.get_untracked(),
            };
            match login(&auth, &api, &credentials).await {
                Ok(()) => {
                    // 认证信号翻转后，路由服务会带着 returnUrl 自动跳转
                }
                Err(e) => {
                    set_error_msg.set(Some(e.user_message("Invalid username or password")));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Fabriq ERP"</h1>
                    <p class="text-base-content/70 mt-2">
                        "Sign in to manage procurement, production and delivery"
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                placeholder="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "No account yet? "
                            <NavLink to="/register">
                                <span class="link link-primary">"Register"</span>
                            </NavLink>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
