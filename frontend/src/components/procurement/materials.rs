//! 原材料管理页
//!
//! 库存低于最小阈值的行高亮提示；表单可勾选多个供货供应商。

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::procurement::{RawMaterial, RawMaterialRequest, Supplier};

use crate::api::{MaterialApi, SupplierApi};
use crate::toast::use_toasts;

#[component]
pub fn MaterialsPage() -> impl IntoView {
    let toasts = use_toasts();
    let api = MaterialApi::new(crate::use_api_core());
    let supplier_api = SupplierApi::new(crate::use_api_core());

    let (materials, set_materials) = signal(Vec::<RawMaterial>::new());
    let (suppliers, set_suppliers) = signal(Vec::<Supplier>::new());
    let (loading, set_loading) = signal(true);
    let (editing, set_editing) = signal(Option::<RawMaterial>::None);
    let (show_form, set_show_form) = signal(false);
    let (pending_delete, set_pending_delete) = signal(Option::<RawMaterial>::None);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.find_all().await {
                    Ok(data) => set_materials.set(data),
                    Err(e) => toasts.error(e.user_message("Failed to load materials")),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    // 表单的供应商勾选需要完整目录
    {
        let supplier_api = supplier_api.clone();
        spawn_local(async move {
            match supplier_api.find_all().await {
                Ok(data) => set_suppliers.set(data),
                Err(e) => toasts.error(e.user_message("Failed to load suppliers")),
            }
        });
    }

    // --- 表单字段 ---
    let (name, set_name) = signal(String::new());
    let (stock, set_stock) = signal(0.0f64);
    let (min_stock, set_min_stock) = signal(0.0f64);
    let (unit, set_unit) = signal("kg".to_string());
    let (selected_suppliers, set_selected_suppliers) = signal(Vec::<i64>::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let open_create = move |_| {
        set_editing.set(None);
        set_name.set(String::new());
        set_stock.set(0.0);
        set_min_stock.set(0.0);
        set_unit.set("kg".to_string());
        set_selected_suppliers.set(Vec::new());
        set_form_error.set(None);
        set_show_form.set(true);
    };

    let open_edit = move |material: RawMaterial| {
        set_name.set(material.name.clone());
        set_stock.set(material.stock);
        set_min_stock.set(material.min_stock);
        set_unit.set(material.unit.clone());
        set_selected_suppliers.set(material.supplier_ids.clone());
        set_form_error.set(None);
        set_editing.set(Some(material));
        set_show_form.set(true);
    };

    let toggle_supplier = move |id: i64| {
        set_selected_suppliers.update(|ids| {
            if let Some(pos) = ids.iter().position(|&x| x == id) {
                ids.remove(pos);
            } else {
                ids.push(id);
            }
        });
    };

    let on_submit = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if name.get().trim().is_empty() || unit.get().trim().is_empty() {
                set_form_error.set(Some("Name and unit are required".to_string()));
                return;
            }
            if stock.get() < 0.0 || min_stock.get() < 0.0 {
                set_form_error.set(Some("Stock values cannot be negative".to_string()));
                return;
            }

            let payload = RawMaterialRequest {
                name: name.get_untracked().trim().to_string(),
                stock: stock.get_untracked(),
                min_stock: min_stock.get_untracked(),
                unit: unit.get_untracked().trim().to_string(),
                supplier_ids: selected_suppliers.get_untracked(),
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
                        toasts.success("Material saved");
                        set_show_form.set(false);
                        load();
                    }
                    Err(e) => set_form_error.set(Some(e.user_message("Failed to save material"))),
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
                match api.delete(target.id).await {
                    Ok(()) => {
                        toasts.success("Material deleted");
                        load();
                    }
                    Err(e) => toasts.error(e.user_message("Failed to delete material")),
                }
                set_pending_delete.set(None);
            });
        }
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Raw materials"</h1>
                <button class="btn btn-primary" on:click=open_create>"Add material"</button>
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
                                    <th>"Name"</th>
                                    <th>"Stock"</th>
                                    <th>"Min. stock"</th>
                                    <th>"Unit"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || materials.get() key=|m| m.id let:material>
                                    {
                                        let low = material.is_below_min_stock();
                                        let edit_target = material.clone();
                                        let delete_target = material.clone();
                                        view! {
                                            <tr class=if low { "bg-warning/10" } else { "" }>
                                                <td class="font-medium">
                                                    {material.name.clone()}
                                                    <Show when=move || low>
                                                        <span class="badge badge-warning badge-sm ml-2">"Low stock"</span>
                                                    </Show>
                                                </td>
                                                <td>{material.stock}</td>
                                                <td>{material.min_stock}</td>
                                                <td>{material.unit.clone()}</td>
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
                        <Show when=move || materials.get().is_empty()>
                            <p class="text-center text-base-content/60 p-8">"No raw materials yet."</p>
                        </Show>
                    </Show>
                </div>
            </div>

            <Show when=move || show_form.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">
                            {move || if editing.get().is_some() { "Edit material" } else { "New material" }}
                        </h3>
                        <form class="space-y-4 mt-4" on:submit=on_submit.clone()>
                            <Show when=move || form_error.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="material-name">
                                    <span class="label-text">"Name"</span>
                                </label>
                                <input
                                    id="material-name"
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=name
                                    on:input=move |ev| set_name.set(event_target_value(&ev))
                                    required
                                />
                            </div>
                            <div class="grid grid-cols-3 gap-4">
                                <div class="form-control">
                                    <label class="label" for="material-stock">
                                        <span class="label-text">"Stock"</span>
                                    </label>
                                    <input
                                        id="material-stock"
                                        type="number"
                                        step="any"
                                        min="0"
                                        class="input input-bordered"
                                        prop:value=move || stock.get().to_string()
                                        on:input=move |ev| {
                                            set_stock.set(event_target_value(&ev).parse().unwrap_or(0.0));
                                        }
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="material-min-stock">
                                        <span class="label-text">"Min. stock"</span>
                                    </label>
                                    <input
                                        id="material-min-stock"
                                        type="number"
                                        step="any"
                                        min="0"
                                        class="input input-bordered"
                                        prop:value=move || min_stock.get().to_string()
                                        on:input=move |ev| {
                                            set_min_stock.set(event_target_value(&ev).parse().unwrap_or(0.0));
                                        }
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="material-unit">
                                        <span class="label-text">"Unit"</span>
                                    </label>
                                    <input
                                        id="material-unit"
                                        type="text"
                                        class="input input-bordered"
                                        prop:value=unit
                                        on:input=move |ev| set_unit.set(event_target_value(&ev))
                                        required
                                    />
                                </div>
                            </div>

                            <div class="form-control">
                                <span class="label-text mb-2">"Suppliers"</span>
                                <div class="max-h-40 overflow-y-auto space-y-1 border border-base-300 rounded-lg p-2">
                                    <For each=move || suppliers.get() key=|s| s.id let:supplier>
                                        {
                                            let id = supplier.id;
                                            view! {
                                                <label class="label cursor-pointer justify-start gap-3">
                                                    <input
                                                        type="checkbox"
                                                        class="checkbox checkbox-sm"
                                                        prop:checked=move || selected_suppliers.get().contains(&id)
                                                        on:change=move |_| toggle_supplier(id)
                                                    />
                                                    <span class="label-text">{supplier.name.clone()}</span>
                                                </label>
                                            }
                                        }
                                    </For>
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
                        <h3 class="font-bold text-lg">"Delete material"</h3>
                        <p class="py-4">
                            "Delete "
                            <span class="font-semibold">
                                {move || pending_delete.get().map(|m| m.name).unwrap_or_default()}
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
