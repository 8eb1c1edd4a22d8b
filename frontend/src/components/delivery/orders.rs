//! 销售订单页
//!
//! 下单时从客户目录与产品目录中选择；活跃订单可取消。

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::PageQuery;
use fabriq_shared::delivery::{Customer, Order, OrderRequest};
use fabriq_shared::production::Product;

use crate::api::{CustomerApi, OrderApi, ProductApi};
use crate::toast::use_toasts;

/// 下单表单用的客户目录页大小；超过这个数量的客户走搜索
const CUSTOMER_CATALOG_SIZE: u32 = 200;

#[component]
pub fn OrdersPage() -> impl IntoView {
    let toasts = use_toasts();
    let api = OrderApi::new(crate::use_api_core());
    let customer_api = CustomerApi::new(crate::use_api_core());
    let product_api = ProductApi::new(crate::use_api_core());

    let (orders, set_orders) = signal(Vec::<Order>::new());
    let (customers, set_customers) = signal(Vec::<Customer>::new());
    let (products, set_products) = signal(Vec::<Product>::new());
    let (loading, set_loading) = signal(true);
    let (show_form, set_show_form) = signal(false);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.find_all().await {
                    Ok(data) => set_orders.set(data),
                    Err(e) => toasts.error(e.user_message("Failed to load orders")),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    {
        let customer_api = customer_api.clone();
        let product_api = product_api.clone();
        spawn_local(async move {
            let mut query = PageQuery::default();
            query.size = CUSTOMER_CATALOG_SIZE;
            match customer_api.search(&query).await {
                Ok(page) => set_customers.set(page.content),
                Err(e) => toasts.error(e.user_message("Failed to load customers")),
            }
            match product_api.find_all_products().await {
                Ok(data) => set_products.set(data),
                Err(e) => toasts.error(e.user_message("Failed to load products")),
            }
        });
    }

    // --- 表单字段 ---
    let (customer_id, set_customer_id) = signal(0i64);
    let (product_id, set_product_id) = signal(0i64);
    let (quantity, set_quantity) = signal(1u32);
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let open_create = move |_| {
        set_customer_id.set(0);
        set_product_id.set(0);
        set_quantity.set(1);
        set_form_error.set(None);
        set_show_form.set(true);
    };

    let on_submit = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if customer_id.get() == 0 || product_id.get() == 0 {
                set_form_error.set(Some("Choose a customer and a product".to_string()));
                return;
            }
            if quantity.get() == 0 {
                set_form_error.set(Some("Quantity must be at least 1".to_string()));
                return;
            }

            let payload = OrderRequest {
                customer_id: customer_id.get_untracked(),
                product_id: product_id.get_untracked(),
                quantity: quantity.get_untracked(),
                status: None,
            };

            set_saving.set(true);
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                match api.create(&payload).await {
                    Ok(_) => {
                        toasts.success("Order created");
                        set_show_form.set(false);
                        load();
                    }
                    Err(e) => set_form_error.set(Some(e.user_message("Failed to create order"))),
                }
                set_saving.set(false);
            });
        }
    };

    // Callback 是 Copy 的，行内的 <Show> 子闭包只捕获 Copy 值，保持 Fn
    let cancel_order = Callback::new({
        let api = api.clone();
        let load = load.clone();
        move |id: i64| {
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                match api.cancel(id).await {
                    Ok(_) => {
                        toasts.success("Order cancelled");
                        load();
                    }
                    Err(e) => toasts.error(e.user_message("Failed to cancel order")),
                }
            });
        }
    });

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Orders"</h1>
                <button class="btn btn-primary" on:click=open_create>"New order"</button>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body p-0">
                    <Show
                        when=move || !loading.get()
                        fallback=|| view! {
                            <div class="flex justify-center p-12">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                    >
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Customer"</th>
                                    <th>"Product"</th>
                                    <th>"Quantity"</th>
                                    <th>"Total"</th>
                                    <th>"Status"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || orders.get() key=|o| o.id let:order>
                                    {
                                        let id = order.id;
                                        let active = order.status.is_active();
                                        view! {
                                            <tr>
                                                <td class="font-medium">{order.customer.name.clone()}</td>
                                                <td>{order.product.name.clone()}</td>
                                                <td>{order.quantity}</td>
                                                <td>{format!("{:.2}", order.product_total_price)}</td>
                                                <td>
                                                    <span class=if active { "badge badge-info" } else { "badge badge-ghost" }>
                                                        {order.status.label()}
                                                    </span>
                                                </td>
                                                <td class="text-right">
                                                    <Show when=move || active>
                                                        <button
                                                            class="btn btn-outline btn-warning btn-sm"
                                                            on:click=move |_| cancel_order.run(id)
                                                        >"Cancel"</button>
                                                    </Show>
                                                </td>
                                            </tr>
                                        }
                                    }
                                </For>
                            </tbody>
                        </table>
                        <Show when=move || orders.get().is_empty()>
                            <p class="text-center text-base-content/60 p-8">"No orders yet."</p>
                        </Show>
                    </Show>
                </div>
            </div>

            <Show when=move || show_form.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">"New order"</h3>
                        <form class="space-y-4 mt-4" on:submit=on_submit.clone()>
                            <Show when=move || form_error.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="order-customer">
                                    <span class="label-text">"Customer"</span>
                                </label>
                                <select
                                    id="order-customer"
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        set_customer_id.set(event_target_value(&ev).parse().unwrap_or(0));
                                    }
                                >
                                    <option value="0" selected=move || customer_id.get() == 0>
                                        "Choose a customer..."
                                    </option>
                                    <For each=move || customers.get() key=|c| c.id let:customer>
                                        <option
                                            value=customer.id.to_string()
                                            selected=move || customer_id.get() == customer.id
                                        >
                                            {customer.name.clone()}
                                        </option>
                                    </For>
                                </select>
                            </div>

                            <div class="form-control">
                                <label class="label" for="order-product">
                                    <span class="label-text">"Product"</span>
                                </label>
                                <select
                                    id="order-product"
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        set_product_id.set(event_target_value(&ev).parse().unwrap_or(0));
                                    }
                                >
                                    <option value="0" selected=move || product_id.get() == 0>
                                        "Choose a product..."
                                    </option>
                                    <For each=move || products.get() key=|p| p.id let:product>
                                        <option
                                            value=product.id.to_string()
                                            selected=move || product_id.get() == product.id
                                        >
                                            {format!("{} ({:.2})", product.name, product.cost)}
                                        </option>
                                    </For>
                                </select>
                            </div>

                            <div class="form-control">
                                <label class="label" for="order-quantity">
                                    <span class="label-text">"Quantity"</span>
                                </label>
                                <input
                                    id="order-quantity"
                                    type="number"
                                    min="1"
                                    class="input input-bordered"
                                    prop:value=move || quantity.get().to_string()
                                    on:input=move |ev| {
                                        set_quantity.set(event_target_value(&ev).parse().unwrap_or(1));
                                    }
                                />
                            </div>

                            <div class="modal-action">
                                <button
                                    type="button"
                                    class="btn btn-ghost"
                                    on:click=move |_| set_show_form.set(false)
                                >"Cancel"</button>
                                <button class="btn btn-primary" disabled=move || saving.get()>
                                    {move || if saving.get() {
                                        view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                                    } else {
                                        "Create order".into_any()
                                    }}
                                </button>
                            </div>
                        </form>
                    </div>
                </div>
            </Show>
        </div>
    }
}
