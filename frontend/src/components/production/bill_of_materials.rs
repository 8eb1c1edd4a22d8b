//! 物料清单 (BOM) 页
//!
//! 列表端点返回的是不带外键的扁平行；编辑预填时通过产品详情内嵌的
//! `BomLine`（携带 `rawMaterialId`）解析原料 id，避免按名称匹配的歧义。

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::production::{BillOfMaterial, BillOfMaterialRequest, Product};
use fabriq_shared::procurement::RawMaterial;

use crate::api::{MaterialApi, ProductApi};
use crate::toast::use_toasts;

/// 从产品目录里解析一条扁平 BOM 行的外键
///
/// 返回 `(product_id, raw_material_id)`；产品或原料行不存在时为 None。
fn resolve_ids(products: &[Product], bom: &BillOfMaterial) -> Option<(i64, i64)> {
    let product = products.iter().find(|p| {
        p.bill_of_materials
            .iter()
            .any(|line| line.id == bom.bill_of_material_id)
    })?;
    let line = product
        .bill_of_materials
        .iter()
        .find(|line| line.id == bom.bill_of_material_id)?;
    Some((product.id, line.raw_material_id))
}

#[component]
pub fn BillOfMaterialsPage() -> impl IntoView {
    let toasts = use_toasts();
    let api = ProductApi::new(crate::use_api_core());
    let material_api = MaterialApi::new(crate::use_api_core());

    let (boms, set_boms) = signal(Vec::<BillOfMaterial>::new());
    let (products, set_products) = signal(Vec::<Product>::new());
    let (materials, set_materials) = signal(Vec::<RawMaterial>::new());
    let (loading, set_loading) = signal(true);
    let (editing, set_editing) = signal(Option::<BillOfMaterial>::None);
    let (show_form, set_show_form) = signal(false);
    let (pending_delete, set_pending_delete) = signal(Option::<BillOfMaterial>::None);

    // BOM 列表与产品目录一起刷新：外键解析依赖产品详情
    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.find_all_boms().await {
                    Ok(data) => set_boms.set(data),
                    Err(e) => toasts.error(e.user_message("Failed to load bill of materials")),
                }
                match api.find_all_products().await {
                    Ok(data) => set_products.set(data),
                    Err(e) => toasts.error(e.user_message("Failed to load products")),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    {
        let material_api = material_api.clone();
        spawn_local(async move {
            match material_api.find_all().await {
                Ok(data) => set_materials.set(data),
                Err(e) => toasts.error(e.user_message("Failed to load materials")),
            }
        });
    }

    // --- 表单字段 ---
    let (product_id, set_product_id) = signal(0i64);
    let (raw_material_id, set_raw_material_id) = signal(0i64);
    let (quantity, set_quantity) = signal(1.0f64);
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let open_create = move |_| {
        set_editing.set(None);
        set_product_id.set(0);
        set_raw_material_id.set(0);
        set_quantity.set(1.0);
        set_form_error.set(None);
        set_show_form.set(true);
    };

    let open_edit = move |bom: BillOfMaterial| {
        match resolve_ids(&products.get_untracked(), &bom) {
            Some((pid, mid)) => {
                set_product_id.set(pid);
                set_raw_material_id.set(mid);
            }
            None => {
                // 目录尚未加载或行已被并发删除；保留空选择让用户重选
                set_product_id.set(0);
                set_raw_material_id.set(0);
            }
        }
        set_quantity.set(bom.quantity_per_product);
        set_form_error.set(None);
        set_editing.set(Some(bom));
        set_show_form.set(true);
    };

    let on_submit = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if product_id.get() == 0 || raw_material_id.get() == 0 {
                set_form_error.set(Some("Choose a product and a material".to_string()));
                return;
            }
            if quantity.get() <= 0.0 {
                set_form_error.set(Some("Quantity must be positive".to_string()));
                return;
            }

            let payload = BillOfMaterialRequest {
                product_id: product_id.get_untracked(),
                raw_material_id: raw_material_id.get_untracked(),
                quantity_per_product: quantity.get_untracked(),
            };

            set_saving.set(true);
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                let result = match editing.get_untracked() {
                    Some(existing) => api.update_bom(existing.bill_of_material_id, &payload).await,
                    None => api.create_bom(&payload).await,
                };
                match result {
                    Ok(_) => {
                        toasts.success("Bill of material saved");
                        set_show_form.set(false);
                        load();
                    }
                    Err(e) => set_form_error.set(Some(e.user_message("Failed to save bill of material"))),
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
                match api.delete_bom(target.bill_of_material_id).await {
                    Ok(()) => {
                        toasts.success("Bill of material deleted");
                        load();
                    }
                    Err(e) => toasts.error(e.user_message("Failed to delete bill of material")),
                }
                set_pending_delete.set(None);
            });
        }
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Bill of materials"</h1>
                <button class="btn btn-primary" on:click=open_create>"Add line"</button>
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
                                    <th>"Product"</th>
                                    <th>"Product stock"</th>
                                    <th>"Material"</th>
                                    <th>"Material stock"</th>
                                    <th>"Qty per product"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || boms.get() key=|b| b.bill_of_material_id let:bom>
                                    {
                                        let edit_target = bom.clone();
                                        let delete_target = bom.clone();
                                        view! {
                                            <tr>
                                                <td class="font-medium">{bom.product_name.clone()}</td>
                                                <td>{bom.product_stock}</td>
                                                <td>{bom.raw_material_name.clone()}</td>
                                                <td>{bom.raw_material_stock}</td>
                                                <td>{bom.quantity_per_product}</td>
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
                                        }
                                    }
                                </For>
                            </tbody>
                        </table>
                        <Show when=move || boms.get().is_empty()>
                            <p class="text-center text-base-content/60 p-8">"No bill of material lines yet."</p>
                        </Show>
                    </Show>
                </div>
            </div>

            <Show when=move || show_form.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">
                            {move || if editing.get().is_some() { "Edit line" } else { "New line" }}
                        </h3>
                        <form class="space-y-4 mt-4" on:submit=on_submit.clone()>
                            <Show when=move || form_error.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="bom-product">
                                    <span class="label-text">"Product"</span>
                                </label>
                                <select
                                    id="bom-product"
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

                            <div class="form-control">
                                <label class="label" for="bom-material">
                                    <span class="label-text">"Raw material"</span>
                                </label>
                                <select
                                    id="bom-material"
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        set_raw_material_id.set(event_target_value(&ev).parse().unwrap_or(0));
                                    }
                                >
                                    <option value="0" selected=move || raw_material_id.get() == 0>
                                        "Choose a material..."
                                    </option>
                                    <For each=move || materials.get() key=|m| m.id let:material>
                                        <option
                                            value=material.id.to_string()
                                            selected=move || raw_material_id.get() == material.id
                                        >
                                            {material.name.clone()}
                                        </option>
                                    </For>
                                </select>
                            </div>

                            <div class="form-control">
                                <label class="label" for="bom-quantity">
                                    <span class="label-text">"Quantity per product"</span>
                                </label>
                                <input
                                    id="bom-quantity"
                                    type="number"
                                    step="any"
                                    min="0"
                                    class="input input-bordered"
                                    prop:value=move || quantity.get().to_string()
                                    on:input=move |ev| {
                                        set_quantity.set(event_target_value(&ev).parse().unwrap_or(0.0));
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
                        <h3 class="font-bold text-lg">"Delete line"</h3>
                        <p class="py-4">
                            {move || pending_delete.get().map(|b| format!(
                                "Remove {} from {}?", b.raw_material_name, b.product_name
                            )).unwrap_or_default()}
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

#[cfg(test)]
mod tests {
    use super::*;
    use fabriq_shared::production::BomLine;

    fn product_with_line(product_id: i64, line_id: i64, material_id: i64) -> Product {
        Product {
            id: product_id,
            name: format!("P{}", product_id),
            cost: 10.0,
            production_time: 1,
            stock: 5,
            bill_of_materials: vec![BomLine {
                id: line_id,
                raw_material_id: material_id,
                raw_material_name: "Steel".to_string(),
                quantity: 2.0,
            }],
        }
    }

    fn flat_bom(line_id: i64) -> BillOfMaterial {
        BillOfMaterial {
            bill_of_material_id: line_id,
            product_name: "Chair".to_string(),
            product_stock: 5,
            raw_material_name: "Steel".to_string(),
            raw_material_stock: 40,
            quantity_per_product: 2.0,
        }
    }

    #[test]
    fn resolves_ids_through_product_bom_lines() {
        let products = vec![product_with_line(1, 30, 9), product_with_line(2, 31, 9)];
        assert_eq!(resolve_ids(&products, &flat_bom(31)), Some((2, 9)));
    }

    #[test]
    fn missing_line_resolves_to_none() {
        let products = vec![product_with_line(1, 30, 9)];
        assert_eq!(resolve_ids(&products, &flat_bom(99)), None);
    }
}
