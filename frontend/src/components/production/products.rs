//! 产品管理页
//!
//! 行内展开产品的 BOM 行（来自产品详情内嵌的 `billOfMaterials`）。

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::production::{Product, ProductRequest};

use crate::api::ProductApi;
use crate::toast::use_toasts;

#[component]
pub fn ProductsPage() -> impl IntoView {
    let toasts = use_toasts();
    let api = ProductApi::new(crate::use_api_core());

    let (products, set_products) = signal(Vec::<Product>::new());
    let (loading, set_loading) = signal(true);
    let (editing, set_editing) = signal(Option::<Product>::None);
    let (show_form, set_show_form) = signal(false);
    let (pending_delete, set_pending_delete) = signal(Option::<Product>::None);
    let (expanded, set_expanded) = signal(Option::<i64>::None);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.find_all_products().await {
                    Ok(data) => set_products.set(data),
                    Err(e) => toasts.error(e.user_message("Failed to load products")),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    // --- 表单字段 ---
    let (name, set_name) = signal(String::new());
    let (cost, set_cost) = signal(0.0f64);
    let (production_time, set_production_time) = signal(1u32);
    let (stock, set_stock) = signal(0u32);
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let open_create = move |_| {
        set_editing.set(None);
        set_name.set(String::new());
        set_cost.set(0.0);
        set_production_time.set(1);
        set_stock.set(0);
        set_form_error.set(None);
        set_show_form.set(true);
    };

    let open_edit = move |product: Product| {
        set_name.set(product.name.clone());
        set_cost.set(product.cost);
        set_production_time.set(product.production_time);
        set_stock.set(product.stock);
        set_form_error.set(None);
        set_editing.set(Some(product));
        set_show_form.set(true);
    };

    let on_submit = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if name.get().trim().is_empty() {
                set_form_error.set(Some("Name is required".to_string()));
                return;
            }
            if cost.get() < 0.0 {
                set_form_error.set(Some("Cost cannot be negative".to_string()));
                return;
            }

            let payload = ProductRequest {
                name: name.get_untracked().trim().to_string(),
                cost: cost.get_untracked(),
                production_time: production_time.get_untracked(),
                stock: stock.get_untracked(),
            };

            set_saving.set(true);
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                let result = match editing.get_untracked() {
                    Some(existing) => api.update_product(existing.id, &payload).await,
                    None => api.create_product(&payload).await,
                };
                match result {
                    Ok(_) => {
                        toasts.success("Product saved");
                        set_show_form.set(false);
                        load();
                    }
                    Err(e) => set_form_error.set(Some(e.user_message("Failed to save product"))),
                }
                set_saving.set(false);
            });
        }
    };

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
                match api.delete_product(target.id).await {
                    Ok(()) => {
                        toasts.success("Product deleted");
                        load();
                    }
                    Err(e) => toasts.error(e.user_message("Failed to delete product")),
                }
                set_pending_delete.set(None);
            });
        }
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Products"</h1>
                <button class="btn btn-primary" on:click=open_create>"Add product"</button>
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
                                    <th>"Name"</th>
                                    <th>"Cost"</th>
                                    <th>"Production time (h)"</th>
                                    <th>"Stock"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || products.get() key=|p| p.id let:product>
                                    {
                                        let id = product.id;
                                        let edit_target = product.clone();
                                        let delete_target = product.clone();
                                        let bom_lines = product.bill_of_materials.clone();
                                        let has_bom = !bom_lines.is_empty();
                                        view! {
                                            <tr>
                                                <td>
                                                    <Show when=move || has_bom>
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
                                                <td class="font-medium">{product.name.clone()}</td>
                                                <td>{format!("{:.2}", product.cost)}</td>
                                                <td>{product.production_time}</td>
                                                <td>{product.stock}</td>
                                                <td class="text-right space-x-2">
                                                    <button
                                                        class="btn btn-ghost btn-sm"
                                                        on:click=move |_| open_edit(edit_target.clone())
                                                    >"Edit"</button>
                                                    <button
                                                        class="btn btn-ghost btn-sm text-error"
                                                        on:click=move |_| set_pending_delete.set(Some(delete_target.clone()))
                                                    >"Delete"</button>
                                                </td>
                                            </tr>
                                            <Show when=move || expanded.get() == Some(id)>
                                                <tr class="bg-base-200/50">
                                                    <td></td>
                                                    <td colspan="5">
                                                        <div class="flex flex-wrap gap-2 py-1">
                                                            {bom_lines.iter().map(|line| view! {
                                                                <span class="badge badge-outline">
                                                                    {format!("{} × {}", line.raw_material_name, line.quantity)}
                                                                </span>
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
                        <Show when=move || products.get().is_empty()>
                            <p class="text-center text-base-content/60 p-8">"No products yet."</p>
                        </Show>
                    </Show>
                </div>
            </div>

            <Show when=move || show_form.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">
                            {move || if editing.get().is_some() { "Edit product" } else { "New product" }}
                        </h3>
                        <form class="space-y-4 mt-4" on:submit=on_submit.clone()>
                            <Show when=move || form_error.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="product-name">
                                    <span class="label-text">"Name"</span>
                                </label>
                                <input
                                    id="product-name"
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=name
                                    on:input=move |ev| set_name.set(event_target_value(&ev))
                                    required
                                />
                            </div>
                            <div class="grid grid-cols-3 gap-4">
                                <div class="form-control">
                                    <label class="label" for="product-cost">
                                        <span class="label-text">"Cost"</span>
                                    </label>
                                    <input
                                        id="product-cost"
                                        type="number"
                                        step="any"
                                        min="0"
                                        class="input input-bordered"
                                        prop:value=move || cost.get().to_string()
                                        on:input=move |ev| {
                                            set_cost.set(event_target_value(&ev).parse().unwrap_or(0.0));
                                        }
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="product-time">
                                        <span class="label-text">"Prod. time (h)"</span>
                                    </label>
                                    <input
                                        id="product-time"
                                        type="number"
                                        min="1"
                                        class="input input-bordered"
                                        prop:value=move || production_time.get().to_string()
                                        on:input=move |ev| {
                                            set_production_time.set(event_target_value(&ev).parse().unwrap_or(1));
                                        }
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="product-stock">
                                        <span class="label-text">"Stock"</span>
                                    </label>
                                    <input
                                        id="product-stock"
                                        type="number"
                                        min="0"
                                        class="input input-bordered"
                                        prop:value=move || stock.get().to_string()
                                        on:input=move |ev| {
                                            set_stock.set(event_target_value(&ev).parse().unwrap_or(0));
                                        }
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
                        <h3 class="font-bold text-lg">"Delete product"</h3>
                        <p class="py-4">
                            "Delete "
                            <span class="font-semibold">
                                {move || pending_delete.get().map(|p| p.name).unwrap_or_default()}
                            </span>
                            "?"
                        </p>
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
