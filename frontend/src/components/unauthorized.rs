//! 无权限提示页

use leptos::prelude::*;

use crate::components::header::NavLink;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-[70vh] bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-warning">"403"</h1>
                <p class="text-xl mt-4">"You do not have access to this section"</p>
                <p class="text-base-content/70 mt-2">
                    "Contact an administrator if you believe this is a mistake."
                </p>
                <div class="mt-6">
                    <NavLink to="/">
                        <span class="btn btn-primary">"Back to home"</span>
                    </NavLink>
                </div>
            </div>
        </div>
    }
}
