//! 注册页
//!
//! 创建普通账号（USER 角色）；成功后引导去登录页。

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::RegisterRequest;

use crate::api::AuthApi;
use crate::toast::use_toasts;
use crate::web::router::use_router;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let toasts = use_toasts();
    let router = use_router();
    // Context 在 spawn_local 的 future 里已经不可用，句柄必须在组件作用域解析
    let auth_api = AuthApi::new(crate::use_api_core());

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();

        let name = username.get().trim().to_string();
        if name.len() < 3 {
            set_error_msg.set(Some("Username must be at least 3 characters".to_string()));
            return;
        }
        let address = email.get().trim().to_string();
        if address.is_empty() || !address.contains('@') {
            set_error_msg.set(Some("A valid email address is required".to_string()));
            return;
        }
        if password.get().len() < 6 {
            set_error_msg.set(Some("Password must be at least 6 characters".to_string()));
            return;
        }
        if password.get() != confirm.get() {
            set_error_msg.set(Some("Passwords do not match".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let router = router.clone();
        let api = auth_api.clone();
        spawn_local(async move {
            let optional = |s: String| {
                let s = s.trim().to_string();
                if s.is_empty() { None } else { Some(s) }
            };
            let payload = RegisterRequest {
                username: name,
                password: password.get_untracked(),
                email: address,
                first_name: optional(first_name.get_untracked()),
                last_name: optional(last_name.get_untracked()),
                role: "USER".to_string(),
            };
            match api.register(&payload).await {
                Ok(user) => {
                    toasts.success(format!("Account {} created, you can sign in", user.username));
                    router.navigate("/login");
                }
                Err(e) => {
                    set_error_msg.set(Some(e.user_message("Registration failed")));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create an account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="reg-username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="reg-username"
                                type="text"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="reg-email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="reg-email"
                                type="email"
                                placeholder="name@company.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="grid grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label" for="reg-first-name">
                                    <span class="label-text">"First name"</span>
                                </label>
                                <input
                                    id="reg-first-name"
                                    type="text"
                                    on:input=move |ev| set_first_name.set(event_target_value(&ev))
                                    prop:value=first_name
                                    class="input input-bordered"
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="reg-last-name">
                                    <span class="label-text">"Last name"</span>
                                </label>
                                <input
                                    id="reg-last-name"
                                    type="text"
                                    on:input=move |ev| set_last_name.set(event_target_value(&ev))
                                    prop:value=last_name
                                    class="input input-bordered"
                                />
                            </div>
                        </div>

                        <div class="form-control">
                            <label class="label" for="reg-password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="reg-password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="reg-confirm">
                                <span class="label-text">"Confirm password"</span>
                            </label>
                            <input
                                id="reg-confirm"
                                type="password"
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                prop:value=confirm
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                                } else {
                                    "Create account".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
