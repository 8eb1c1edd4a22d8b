//! 首页（公开）

use leptos::prelude::*;

use fabriq_shared::ROLE_ADMIN;

use crate::auth::use_auth;
use crate::components::header::NavLink;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let is_authenticated = auth.is_authenticated_signal();
    let is_admin = auth.has_any_role(&[ROLE_ADMIN]);

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-lg">
                    <h1 class="text-5xl font-bold">"Fabriq ERP"</h1>
                    <p class="py-6 text-base-content/70">
                        "Procurement, production and delivery management for the workshop floor."
                    </p>

                    <Show
                        when=move || is_authenticated.get()
                        fallback=|| view! {
                            <NavLink to="/login">
                                <span class="btn btn-primary">"Sign in to get started"</span>
                            </NavLink>
                        }
                    >
                        <Show
                            when=move || is_admin.get()
                            fallback=|| view! {
                                <p class="text-base-content/70">
                                    "Your account has no administration sections. Visit your "
                                    <NavLink to="/profile"><span class="link link-primary">"profile"</span></NavLink>
                                    "."
                                </p>
                            }
                        >
                            <div class="grid grid-cols-1 md:grid-cols-3 gap-4 mt-4">
                                <NavLink to="/procurement/suppliers">
                                    <div class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
                                        <div class="card-body items-center">
                                            <h2 class="card-title">"Procurement"</h2>
                                            <p class="text-sm text-base-content/70">"Suppliers, materials, supply orders"</p>
                                        </div>
                                    </div>
                                </NavLink>
                                <NavLink to="/production/products">
                                    <div class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
                                        <div class="card-body items-center">
                                            <h2 class="card-title">"Production"</h2>
                                            <p class="text-sm text-base-content/70">"Products, BOMs, production orders"</p>
                                        </div>
                                    </div>
                                </NavLink>
                                <NavLink to="/delivery/customers">
                                    <div class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
                                        <div class="card-body items-center">
                                            <h2 class="card-title">"Delivery"</h2>
                                            <p class="text-sm text-base-content/70">"Customers, orders, deliveries"</p>
                                        </div>
                                    </div>
                                </NavLink>
                            </div>
                        </Show>
                    </Show>
                </div>
            </div>
        </div>
    }
}
