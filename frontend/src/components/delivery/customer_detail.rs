//! 客户详情页
//!
//! 展示客户信息与该客户的订单（订单列表在客户端按客户过滤）。

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::delivery::Order;

use crate::api::{CustomerApi, OrderApi};
use crate::components::header::NavLink;
use crate::state::CustomerStore;
use crate::toast::use_toasts;

#[component]
pub fn CustomerDetailPage(id: i64) -> impl IntoView {
    let toasts = use_toasts();
    let store = CustomerStore::new(CustomerApi::new(crate::use_api_core()));
    let state = store.state();
    let order_api = OrderApi::new(crate::use_api_core());

    store.load_detail(id);

    let (orders, set_orders) = signal(Vec::<Order>::new());
    {
        let order_api = order_api.clone();
        spawn_local(async move {
            match order_api.find_all().await {
                Ok(all) => set_orders.set(
                    all.into_iter().filter(|o| o.customer.id == id).collect(),
                ),
                Err(e) => toasts.error(e.user_message("Failed to load orders")),
            }
        });
    }

    view! {
        <div class="max-w-4xl mx-auto p-4 md:p-8 space-y-6">
            <NavLink to="/delivery/customers">
                <span class="btn btn-ghost btn-sm">"← Back to customers"</span>
            </NavLink>

            <Show
                when=move || !state.get().loading_selected
                fallback=|| view! {
                    <div class="flex justify-center p-12">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                {move || match state.get().selected {
                    Some(customer) => view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h1 class="card-title text-2xl">{customer.name.clone()}</h1>
                                <p class="text-base-content/70">
                                    {customer.address.clone()} ", " {customer.city.clone()}
                                </p>
                            </div>
                        </div>
                    }.into_any(),
                    None => view! {
                        <div class="alert alert-warning">
                            <span>"Customer not found."</span>
                        </div>
                    }.into_any(),
                }}
            </Show>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Orders"</h2>
                    <Show
                        when=move || !orders.get().is_empty()
                        fallback=|| view! {
                            <p class="text-base-content/60">"No orders for this customer."</p>
                        }
                    >
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Product"</th>
                                    <th>"Quantity"</th>
                                    <th>"Total"</th>
                                    <th>"Status"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || orders.get() key=|o| o.id let:order>
                                    <tr>
                                        <td>{order.product.name.clone()}</td>
                                        <td>{order.quantity}</td>
                                        <td>{format!("{:.2}", order.product_total_price)}</td>
                                        <td>
                                            <span class=if order.status.is_active() {
                                                "badge badge-info"
                                            } else {
                                                "badge badge-ghost"
                                            }>
                                                {order.status.label()}
                                            </span>
                                        </td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </Show>
                </div>
            </div>
        </div>
    }
}
