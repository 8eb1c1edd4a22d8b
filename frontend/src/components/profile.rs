//! 个人资料页
//!
//! 身份信息来自访问令牌的 claims，无需额外请求。

use leptos::prelude::*;

use crate::auth::use_auth;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let user = auth.user();

    view! {
        <div class="max-w-2xl mx-auto p-4 md:p-8">
            <h1 class="text-2xl font-bold mb-6">"Profile"</h1>

            {move || match user.get() {
                Some(user) => view! {
                    <div class="card bg-base-100 shadow">
                        <div class="card-body">
                            <div class="flex items-center gap-4">
                                <div class="avatar placeholder">
                                    <div class="bg-primary text-primary-content rounded-full w-16">
                                        <span class="text-2xl uppercase">
                                            {user.username.chars().next().unwrap_or('?').to_string()}
                                        </span>
                                    </div>
                                </div>
                                <div>
                                    <h2 class="card-title">{user.username.clone()}</h2>
                                    <div class="flex gap-2 mt-1">
                                        {user.roles.iter().map(|role| {
                                            let badge = if role == fabriq_shared::ROLE_ADMIN {
                                                "badge badge-secondary"
                                            } else {
                                                "badge badge-ghost"
                                            };
                                            view! { <span class=badge>{role.clone()}</span> }
                                        }).collect_view()}
                                    </div>
                                </div>
                            </div>
                        </div>
                    </div>
                }.into_any(),
                None => view! {
                    <div class="alert alert-warning">
                        <span>"No active session."</span>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}
