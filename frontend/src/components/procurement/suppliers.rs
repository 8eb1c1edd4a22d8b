//! 供应商管理页：列表 + 新建/编辑模态框 + 删除确认

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::procurement::{Supplier, SupplierRequest};

use crate::api::SupplierApi;
use crate::toast::use_toasts;

#[component]
pub fn SuppliersPage() -> impl IntoView {
    let toasts = use_toasts();
    let api = SupplierApi::new(crate::use_api_core());

    let (suppliers, set_suppliers) = signal(Vec::<Supplier>::new());
    let (loading, set_loading) = signal(true);
    // None = 新建；Some = 编辑目标
    let (editing, set_editing) = signal(Option::<Supplier>::None);
    let (show_form, set_show_form) = signal(false);
    let (pending_delete, set_pending_delete) = signal(Option::<Supplier>::None);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.find_all().await {
                    Ok(data) => set_suppliers.set(data),
                    Err(e) => toasts.error(e.user_message("Failed to load suppliers")),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    // --- 表单字段 ---
    let (name, set_name) = signal(String::new());
    let (contact, set_contact) = signal(String::new());
    let (rating, set_rating) = signal(3u8);
    let (lead_time, set_lead_time) = signal(7u32);
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let open_create = move |_| {
        set_editing.set(None);
        set_name.set(String::new());
        set_contact.set(String::new());
        set_rating.set(3);
        set_lead_time.set(7);
        set_form_error.set(None);
        set_show_form.set(true);
    };

    let open_edit = move |supplier: Supplier| {
        set_name.set(supplier.name.clone());
        set_contact.set(supplier.contact.clone());
        set_rating.set(supplier.rating);
        set_lead_time.set(supplier.lead_time);
        set_form_error.set(None);
        set_editing.set(Some(supplier));
        set_show_form.set(true);
    };

    let on_submit = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if name.get().trim().is_empty() || contact.get().trim().is_empty() {
                set_form_error.set(Some("Name and contact are required".to_string()));
                return;
            }
            if !(1..=5).contains(&rating.get()) {
                set_form_error.set(Some("Rating must be between 1 and 5".to_string()));
                return;
            }

            let payload = SupplierRequest {
                name: name.get_untracked().trim().to_string(),
                contact: contact.get_untracked().trim().to_string(),
                rating: rating.get_untracked(),
                lead_time: lead_time.get_untracked(),
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
                        toasts.success("Supplier saved");
                        set_show_form.set(false);
                        load();
                    }
                    Err(e) => set_form_error.set(Some(e.user_message("Failed to save supplier"))),
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
                        toasts.success("Supplier deleted");
                        load();
                    }
                    Err(e) => toasts.error(e.user_message("Failed to delete supplier")),
                }
                set_pending_delete.set(None);
            });
        }
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Suppliers"</h1>
                <button class="btn btn-primary" on:click=open_create>"Add supplier"</button>
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
                                    <th>"Contact"</th>
                                    <th>"Rating"</th>
                                    <th>"Lead time (days)"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || suppliers.get() key=|s| s.id let:supplier>
                                    {
                                        let edit_target = supplier.clone();
                                        let delete_target = supplier.clone();
                                        let rating_value = supplier.rating;
                                        view! {
                                            <tr>
                                                <td class="font-medium">{supplier.name.clone()}</td>
                                                <td>{supplier.contact.clone()}</td>
                                                <td>
                                                    <div class="rating rating-sm pointer-events-none">
                                                        {(1..=5u8).map(|star| view! {
                                                            <input
                                                                type="radio"
                                                                class="mask mask-star-2 bg-warning"
                                                                prop:checked=move || star == rating_value
                                                                disabled
                                                            />
                                                        }).collect_view()}
                                                    </div>
                                                </td>
                                                <td>{supplier.lead_time}</td>
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
                        <Show when=move || suppliers.get().is_empty()>
                            <p class="text-center text-base-content/60 p-8">"No suppliers yet."</p>
                        </Show>
                    </Show>
                </div>
            </div>

            // 新建/编辑模态框
            <Show when=move || show_form.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">
                            {move || if editing.get().is_some() { "Edit supplier" } else { "New supplier" }}
                        </h3>
                        <form class="space-y-4 mt-4" on:submit=on_submit.clone()>
                            <Show when=move || form_error.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="supplier-name">
                                    <span class="label-text">"Name"</span>
                                </label>
                                <input
                                    id="supplier-name"
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=name
                                    on:input=move |ev| set_name.set(event_target_value(&ev))
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="supplier-contact">
                                    <span class="label-text">"Contact"</span>
                                </label>
                                <input
                                    id="supplier-contact"
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=contact
                                    on:input=move |ev| set_contact.set(event_target_value(&ev))
                                    required
                                />
                            </div>
                            <div class="grid grid-cols-2 gap-4">
                                <div class="form-control">
                                    <label class="label" for="supplier-rating">
                                        <span class="label-text">"Rating (1-5)"</span>
                                    </label>
                                    <input
                                        id="supplier-rating"
                                        type="number"
                                        min="1"
                                        max="5"
                                        class="input input-bordered"
                                        prop:value=move || rating.get().to_string()
                                        on:input=move |ev| {
                                            set_rating.set(event_target_value(&ev).parse().unwrap_or(3));
                                        }
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="supplier-lead-time">
                                        <span class="label-text">"Lead time (days)"</span>
                                    </label>
                                    <input
                                        id="supplier-lead-time"
                                        type="number"
                                        min="0"
                                        class="input input-bordered"
                                        prop:value=move || lead_time.get().to_string()
                                        on:input=move |ev| {
                                            set_lead_time.set(event_target_value(&ev).parse().unwrap_or(0));
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

            // 删除确认
            <Show when=move || pending_delete.get().is_some()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">"Delete supplier"</h3>
                        <p class="py-4">
                            "Delete "
                            <span class="font-semibold">
                                {move || pending_delete.get().map(|s| s.name).unwrap_or_default()}
                            </span>
                            "? This cannot be undone."
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
