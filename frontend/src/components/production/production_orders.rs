//! 生产订单页
//!
//! 行内展开物料需求覆盖情况；库存不足的需求行标红。
//! 运行中的订单可取消，待产订单可编辑/删除。

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::production::{
    Product, ProductionOrder, ProductionOrderRequest, ProductionOrderStatus,
};

use crate::api::{ProductApi, ProductionOrderApi};
use crate::toast::use_toasts;

fn status_badge(status: ProductionOrderStatus) -> &'static str {
    match status {
        ProductionOrderStatus::EnAttente => "badge badge-info",
        ProductionOrderStatus::EnProduction => "badge badge-primary",
        ProductionOrderStatus::Termine => "badge badge-success",
        ProductionOrderStatus::Bloque => "badge badge-error",
    }
}

#[component]
pub fn ProductionOrdersPage() -> impl IntoView {
    let toasts = use_toasts();
    let api = ProductionOrderApi::new(crate::use_api_core());
    let product_api = ProductApi::new(crate::use_api_core());

    let (orders, set_orders) = signal(Vec::<ProductionOrder>::new());
    let (products, set_products) = signal(Vec::<Product>::new());
    let (loading, set_loading) = signal(true);
    let (editing, set_editing) = signal(Option::<ProductionOrder>::None);
    let (show_form, set_show_form) = signal(false);
    let (pending_delete, set_pending_delete) = signal(Option::<ProductionOrder>::None);
    let (expanded, set_expanded) = signal(Option::<i64>::None);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.find_all().await {
                    Ok(data) => set_orders.set(data),
                    Err(e) => toasts.error(e.user_message("Failed to load production orders")),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    {
        let product_api = product_api.clone();
        spawn_local(async move {
            match product_api.find_all_products().await {
                Ok(data) => set_products.set(data),
                Err(e) => toasts.error(e.user_message("Failed to load products")),
            }
        });
    }

    // --- 表单字段 ---
    let (product_id, set_product_id) = signal(0i64);
    let (quantity, set_quantity) = signal(1u32);
    let (start_date, set_start_date) = signal(String::new());
    let (end_date, set_end_date) = signal(String::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let open_create = move |_| {
        set_editing.set(None);
        set_product_id.set(0);
        set_quantity.set(1);
        set_start_date.set(String::new());
        set_end_date.set(String::new());
        set_form_error.set(None);
        set_show_form.set(true);
    };

    let open_edit = move |order: ProductionOrder| {
        set_product_id.set(order.product_id);
        set_quantity.set(order.quantity);
        set_start_date.set(order.start_date.to_string());
        set_end_date.set(order.end_date.to_string());
        set_form_error.set(None);
        set_editing.set(Some(order));
        set_show_form.set(true);
    };

    let on_submit = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if product_id.get() == 0 {
                set_form_error.set(Some("Choose a product".to_string()));
                return;
            }
            if quantity.get() == 0 {
                set_form_error.set(Some("Quantity must be at least 1".to_string()));
                return;
            }
            let Ok(start) = start_date.get().parse::<NaiveDate>() else {
                set_form_error.set(Some("Start date is required".to_string()));
                return;
            };
            let Ok(end) = end_date.get().parse::<NaiveDate>() else {
                set_form_error.set(Some("End date is required".to_string()));
                return;
            };
            if end < start {
                set_form_error.set(Some("End date must be after start date".to_string()));
                return;
            }

            let payload = ProductionOrderRequest {
                product_id: product_id.get_untracked(),
                quantity: quantity.get_untracked(),
                start_date: start,
                end_date: end,
                status: editing.get_untracked().map(|o| o.status),
            };

            set_saving.set(true);
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                let result = match editing.get_untracked() {
                    Some(existing) => api.update(existing.id, &payload).await,
                    None => api.create(&payload).await,
                };
                match result {
                    Ok(_) => {
                        toasts.success("Production order saved");
                        set_show_form.set(false);
                        load();
                    }
                    Err(e) => set_form_error.set(Some(e.user_message("Failed to save production order"))),
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
                    Ok(()) => {
                        toasts.success("Production order cancelled");
                        load();
                    }
                    Err(e) => toasts.error(e.user_message("Failed to cancel production order")),
                }
            });
        }
    });

    let confirm_delete = {
        let api = api.clone();
        let load = load.clone();
        move |_| {
            let Some(target) = pending_delete.get_untracked() else {
                return;
            };
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                match api.delete(target.id).await {
                    Ok(()) => {
                        toasts.success("Production order deleted");
                        load();
                    }
                    Err(e) => toasts.error(e.user_message("Failed to delete production order")),
                }
                set_pending_delete.set(None);
            });
        }
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Production orders"</h1>
                <button class="btn btn-primary" on:click=open_create>"Plan production"</button>
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
                                    <th></th>
                                    <th>"Product"</th>
                                    <th>"Quantity"</th>
                                    <th>"Start"</th>
                                    <th>"End"</th>
                                    <th>"Est. time (h)"</th>
                                    <th>"Status"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || orders.get() key=|o| o.id let:order>
                                    {
                                        let id = order.id;
                                        let status = order.status;
                                        let cancellable = matches!(
                                            status,
                                            ProductionOrderStatus::EnAttente | ProductionOrderStatus::EnProduction
                                        );
                                        let requirements = order.bill_of_materials.clone();
                                        let has_requirements = !requirements.is_empty();
                                        let delete_target = order.clone();
                                        view! {
                                            <tr>
                                                <td>
                                                    <Show when=move || has_requirements>
                                                        <button
                                                            class="btn btn-ghost btn-xs"
                                                            on:click=move |_| {
                                                                set_expanded.update(|e| {
                                                                    *e = if *e == Some(id) { None } else { Some(id) };
                                                                });
                                                            }
                                                        >
                                                            {move || if expanded.get() == Some(id) { "▾" } else { "▸" }}
                                                        </button>
                                                    </Show>
                                                </td>
                                                <td class="font-medium">{order.product_name.clone()}</td>
                                                <td>{order.quantity}</td>
                                                <td>{order.start_date.to_string()}</td>
                                                <td>{order.end_date.to_string()}</td>
                                                <td>{order.production_estimated_time}</td>
                                                <td>
                                                    <span class=status_badge(status)>{status.label()}</span>
                                                </td>
                                                <td class="text-right space-x-2">
                                                    <Show when=move || status == ProductionOrderStatus::EnAttente>
                                                        <button
                                                            class="btn btn-ghost btn-sm"
                                                            // 行数据不进闭包，点击时按 id 从列表信号里取
                                                            on:click=move |_| {
                                                                if let Some(order) = orders
                                                                    .get_untracked()
                                                                    .into_iter()
                                                                    .find(|o| o.id == id)
                                                                {
                                                                    open_edit(order);
                                                                }
                                                            }
                                                        >"Edit"</button>
                                                    </Show>
                                                    <Show when=move || cancellable>
                                                        <button
                                                            class="btn btn-outline btn-warning btn-sm"
                                                            on:click=move |_| cancel_order.run(id)
                                                        >"Cancel"</button>
                                                    </Show>
                                                    <button
                                                        class="btn btn-ghost btn-sm text-error"
                                                        on:click=move |_| set_pending_delete.set(Some(delete_target.clone()))
                                                    >"Delete"</button>
                                                </td>
                                            </tr>
                                            <Show when=move || expanded.get() == Some(id)>
                                                <tr class="bg-base-200/50">
                                                    <td></td>
                                                    <td colspan="7">
                                                        <div class="space-y-1 py-1">
                                                            {requirements.iter().map(|req| {
                                                                let covered = req.is_covered();
                                                                view! {
                                                                    <div class="flex items-center gap-2 text-sm">
                                                                        <span class=if covered { "text-success" } else { "text-error font-medium" }>
                                                                            {if covered { "✓" } else { "✗" }}
                                                                        </span>
                                                                        <span>{req.raw_material_name.clone()}</span>
                                                                        <span class="text-base-content/60">
                                                                            {format!(
                                                                                "needs {} (stock {})",
                                                                                req.total_quantity_needed, req.current_stock
                                                                            )}
                                                                        </span>
                                                                    </div>
                                                                }
                                                            }).collect_view()}
                                                        </div>
                                                    </td>
                                                </tr>
                                            </Show>
                                        }
                                    }
                                </For>
                            </tbody>
                        </table>
                        <Show when=move || orders.get().is_empty()>
                            <p class="text-center text-base-content/60 p-8">"No production orders yet."</p>
                        </Show>
                    </Show>
                </div>
            </div>

            <Show when=move || show_form.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">
                            {move || if editing.get().is_some() { "Edit production order" } else { "Plan production" }}
                        </h3>
                        <form class="space-y-4 mt-4" on:submit=on_submit.clone()>
                            <Show when=move || form_error.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="po-product">
                                    <span class="label-text">"Product"</span>
                                </label>
                                <select
                                    id="po-product"
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
                                            {product.name.clone()}
                                        </option>
                                    </For>
                                </select>
                            </div>

                            <div class="grid grid-cols-3 gap-4">
                                <div class="form-control">
                                    <label class="label" for="po-quantity">
                                        <span class="label-text">"Quantity"</span>
                                    </label>
                                    <input
                                        id="po-quantity"
                                        type="number"
                                        min="1"
                                        class="input input-bordered"
                                        prop:value=move || quantity.get().to_string()
                                        on:input=move |ev| {
                                            set_quantity.set(event_target_value(&ev).parse().unwrap_or(1));
                                        }
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="po-start">
                                        <span class="label-text">"Start date"</span>
                                    </label>
                                    <input
                                        id="po-start"
                                        type="date"
                                        class="input input-bordered"
                                        prop:value=start_date
                                        on:input=move |ev| set_start_date.set(event_target_value(&ev))
                                        required
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="po-end">
                                        <span class="label-text">"End date"</span>
                                    </label>
                                    <input
                                        id="po-end"
                                        type="date"
                                        class="input input-bordered"
                                        prop:value=end_date
                                        on:input=move |ev| set_end_date.set(event_target_value(&ev))
                                        required
                                    />
                                </div>
                            </div>

                            <div class="modal-action">
                                <button
                                    type="button"
                                    class="btn btn-ghost"
                                    on:click=move |_| set_show_form.set(false)
                                >"Cancel"</button>
                                <button class="btn btn-primary" disabled=move || saving.get()>
                                    {move || if saving.get() {
                                        view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                                    } else {
                                        "Save".into_any()
                                    }}
                                </button>
                            </div>
                        </form>
                    </div>
                </div>
            </Show>

            <Show when=move || pending_delete.get().is_some()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">"Delete production order"</h3>
                        <p class="py-4">"Delete this production order?"</p>
                        <div class="modal-action">
                            <button class="btn btn-ghost" on:click=move |_| set_pending_delete.set(None)>
                                "Cancel"
                            </button>
                            <button class="btn btn-error" on:click=confirm_delete.clone()>
                                "Delete"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
