//! 采购订单页
//!
//! 下单表单按所选供应商过滤可购原料（`/api/suppliers/with-materials` 目录），
//! 支持多行明细；"标记收货"会让后端把数量入库。

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::procurement::{
    SupplierWithMaterials, SupplyOrder, SupplyOrderLine, SupplyOrderRequest,
};

use crate::api::{SupplierApi, SupplyOrderApi};
use crate::toast::use_toasts;

/// 表单里的一行明细（原料 id 为 0 表示尚未选择）
#[derive(Clone, PartialEq)]
struct LineDraft {
    key: u32,
    raw_material_id: i64,
    quantity: f64,
}

#[component]
pub fn SupplyOrdersPage() -> impl IntoView {
    let toasts = use_toasts();
    let api = SupplyOrderApi::new(crate::use_api_core());
    let supplier_api = SupplierApi::new(crate::use_api_core());

    let (orders, set_orders) = signal(Vec::<SupplyOrder>::new());
    let (catalog, set_catalog) = signal(Vec::<SupplierWithMaterials>::new());
    let (loading, set_loading) = signal(true);
    let (show_form, set_show_form) = signal(false);
    let (pending_delete, set_pending_delete) = signal(Option::<SupplyOrder>::None);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.find_all().await {
                    Ok(data) => set_orders.set(data),
                    Err(e) => toasts.error(e.user_message("Failed to load supply orders")),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    {
        let supplier_api = supplier_api.clone();
        spawn_local(async move {
            match supplier_api.with_materials().await {
                Ok(data) => set_catalog.set(data),
                Err(e) => toasts.error(e.user_message("Failed to load supplier catalog")),
            }
        });
    }

    // --- 表单字段 ---
    let (supplier_id, set_supplier_id) = signal(0i64);
    let (lines, set_lines) = signal(Vec::<LineDraft>::new());
    let (next_key, set_next_key) = signal(0u32);
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let add_line = move |_| {
        let key = next_key.get_untracked();
        set_next_key.set(key + 1);
        set_lines.update(|list| {
            list.push(LineDraft {
                key,
                raw_material_id: 0,
                quantity: 1.0,
            })
        });
    };

    let open_create = move |_| {
        set_supplier_id.set(0);
        set_lines.set(Vec::new());
        set_form_error.set(None);
        set_show_form.set(true);
        add_line(());
    };

    // 当前供应商可供的原料
    let available_materials = move || {
        let id = supplier_id.get();
        catalog
            .get()
            .into_iter()
            .find(|s| s.id == id)
            .map(|s| s.raw_materials)
            .unwrap_or_default()
    };

    let on_submit = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if supplier_id.get() == 0 {
                set_form_error.set(Some("Choose a supplier".to_string()));
                return;
            }
            let drafts = lines.get();
            if drafts.is_empty() {
                set_form_error.set(Some("Add at least one line".to_string()));
                return;
            }
            if drafts.iter().any(|l| l.raw_material_id == 0) {
                set_form_error.set(Some("Every line needs a material".to_string()));
                return;
            }
            if drafts.iter().any(|l| l.quantity <= 0.0) {
                set_form_error.set(Some("Quantities must be positive".to_string()));
                return;
            }

            let payload = SupplyOrderRequest {
                supplier_id: supplier_id.get_untracked(),
                lines: drafts
                    .iter()
                    .map(|l| SupplyOrderLine {
                        raw_material_id: l.raw_material_id,
                        quantity: l.quantity,
                    })
                    .collect(),
            };

            set_saving.set(true);
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                match api.create(&payload).await {
                    Ok(_) => {
                        toasts.success("Supply order placed");
                        set_show_form.set(false);
                        load();
                    }
                    Err(e) => set_form_error.set(Some(e.user_message("Failed to place order"))),
                }
                set_saving.set(false);
            });
        }
    };

    // Callback 是 Copy 的，行内的 <Show> 子闭包只捕获 Copy 值，保持 Fn
    let mark_received = Callback::new({
        let api = api.clone();
        let load = load.clone();
        move |id: i64| {
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                match api.mark_received(id).await {
                    Ok(_) => {
                        toasts.success("Order received, stock updated");
                        load();
                    }
                    Err(e) => toasts.error(e.user_message("Failed to mark order as received")),
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
                        toasts.success("Supply order deleted");
                        load();
                    }
                    Err(e) => toasts.error(e.user_message("Failed to delete supply order")),
                }
                set_pending_delete.set(None);
            });
        }
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Supply orders"</h1>
                <button class="btn btn-primary" on:click=open_create>"Place order"</button>
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
                                    <th>"Date"</th>
                                    <th>"Supplier"</th>
                                    <th>"Materials"</th>
                                    <th>"Status"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || orders.get() key=|o| o.id let:order>
                                    {
                                        let id = order.id;
                                        let received = order.status == "RECUE";
                                        let delete_target = order.clone();
                                        view! {
                                            <tr>
                                                <td>{order.date.to_string()}</td>
                                                <td class="font-medium">{order.supplier.name.clone()}</td>
                                                <td>
                                                    <div class="flex flex-wrap gap-1">
                                                        {order.raw_materials.iter().map(|m| view! {
                                                            <span class="badge badge-ghost badge-sm">
                                                                {format!("{} × {}", m.name, m.quantity)}
                                                            </span>
                                                        }).collect_view()}
                                                    </div>
                                                </td>
                                                <td>
                                                    <span class=if received { "badge badge-success" } else { "badge badge-info" }>
                                                        {if received { "Received" } else { "Pending" }}
                                                    </span>
                                                </td>
                                                <td class="text-right space-x-2">
                                                    <Show when=move || !received>
                                                        <button
                                                            class="btn btn-outline btn-success btn-sm"
                                                            on:click=move |_| mark_received.run(id)
                                                        >"Mark received"</button>
                                                    </Show>
                                                    <button
                                                        class="btn btn-ghost btn-sm text-error"
                                                        on:click=move |_| set_pending_delete.set(Some(delete_target.clone()))
                                                    >"Delete"</button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                </For>
                            </tbody>
                        </table>
                        <Show when=move || orders.get().is_empty()>
                            <p class="text-center text-base-content/60 p-8">"No supply orders yet."</p>
                        </Show>
                    </Show>
                </div>
            </div>

            <Show when=move || show_form.get()>
                <div class="modal modal-open">
                    <div class="modal-box max-w-2xl">
                        <h3 class="font-bold text-lg">"New supply order"</h3>
                        <form class="space-y-4 mt-4" on:submit=on_submit.clone()>
                            <Show when=move || form_error.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="order-supplier">
                                    <span class="label-text">"Supplier"</span>
                                </label>
                                <select
                                    id="order-supplier"
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        set_supplier_id.set(event_target_value(&ev).parse().unwrap_or(0));
                                        // 换供应商后原有选择不再有效
                                        set_lines.update(|list| {
                                            for line in list.iter_mut() {
                                                line.raw_material_id = 0;
                                            }
                                        });
                                    }
                                >
                                    <option value="0" selected=move || supplier_id.get() == 0>
                                        "Choose a supplier..."
                                    </option>
                                    <For each=move || catalog.get() key=|s| s.id let:supplier>
                                        <option
                                            value=supplier.id.to_string()
                                            selected=move || supplier_id.get() == supplier.id
                                        >
                                            {supplier.name.clone()}
                                        </option>
                                    </For>
                                </select>
                            </div>

                            <div class="space-y-2">
                                <div class="flex justify-between items-center">
                                    <span class="label-text font-medium">"Lines"</span>
                                    <button type="button" class="btn btn-ghost btn-sm" on:click=move |_| add_line(())>
                                        "+ Add line"
                                    </button>
                                </div>
                                <For each=move || lines.get() key=|l| l.key let:line>
                                    {
                                        let key = line.key;
                                        let line_material = line.raw_material_id;
                                        view! {
                                            <div class="flex gap-2 items-center">
                                                <select
                                                    class="select select-bordered select-sm flex-1"
                                                    on:change=move |ev| {
                                                        let id = event_target_value(&ev).parse().unwrap_or(0);
                                                        set_lines.update(|list| {
                                                            if let Some(l) = list.iter_mut().find(|l| l.key == key) {
                                                                l.raw_material_id = id;
                                                            }
                                                        });
                                                    }
                                                >
                                                    <option value="0" selected=line_material == 0>"Material..."</option>
                                                    {move || available_materials().into_iter().map(|m| view! {
                                                        <option value=m.id.to_string() selected=line_material == m.id>
                                                            {m.name.clone()}
                                                        </option>
                                                    }).collect_view()}
                                                </select>
                                                <input
                                                    type="number"
                                                    step="any"
                                                    min="0"
                                                    class="input input-bordered input-sm w-28"
                                                    prop:value=line.quantity.to_string()
                                                    on:input=move |ev| {
                                                        let qty = event_target_value(&ev).parse().unwrap_or(0.0);
                                                        set_lines.update(|list| {
                                                            if let Some(l) = list.iter_mut().find(|l| l.key == key) {
                                                                l.quantity = qty;
                                                            }
                                                        });
                                                    }
                                                />
                                                <button
                                                    type="button"
                                                    class="btn btn-ghost btn-sm text-error"
                                                    on:click=move |_| {
                                                        set_lines.update(|list| list.retain(|l| l.key != key));
                                                    }
                                                >"✕"</button>
                                            </div>
                                        }
                                    }
                                </For>
                            </div>

                            <div class="modal-action">
                                <button
                                    type="button"
                                    class="btn btn-ghost"
                                    on:click=move |_| set_show_form.set(false)
                                >"Cancel"</button>
                                <button class="btn btn-primary" disabled=move || saving.get()>
                                    {move || if saving.get() {
                                        view! { <span class="loading loading-spinner"></span> "Placing..." }.into_any()
                                    } else {
                                        "Place order".into_any()
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
                        <h3 class="font-bold text-lg">"Delete supply order"</h3>
                        <p class="py-4">"Delete this supply order?"</p>
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
