//! 客户管理页
//!
//! 唯一由状态切片驱动的列表页：搜索/排序/分页全部进 `CustomerStore`，
//! 变更成功后由 store 重新加载当前页。删除被 409 拒绝时列表保持不动，
//! 后端消息原文提示。

use leptos::prelude::*;

use fabriq_shared::delivery::{Customer, CustomerRequest};

use crate::api::CustomerApi;
use crate::components::header::NavLink;
use crate::state::CustomerStore;
use crate::toast::use_toasts;

/// 可排序的表头单元格
#[component]
fn SortableHeader(
    store: CustomerStore,
    field: &'static str,
    label: &'static str,
) -> impl IntoView {
    let state = store.state();

    let indicator = move || {
        let sort = state.get().query.sort;
        if sort.is_field(field) {
            match sort.direction {
                fabriq_shared::SortDirection::Asc => " ↑",
                fabriq_shared::SortDirection::Desc => " ↓",
            }
        } else {
            ""
        }
    };

    view! {
        <th
            class="cursor-pointer select-none hover:bg-base-200"
            on:click=move |_| store.toggle_sort(field)
        >
            {label}{indicator}
        </th>
    }
}

#[component]
pub fn CustomersPage() -> impl IntoView {
    let toasts = use_toasts();
    let store = CustomerStore::new(CustomerApi::new(crate::use_api_core()));
    let state = store.state();

    store.load(fabriq_shared::PageQuery::default());

    let (editing, set_editing) = signal(Option::<Customer>::None);
    let (show_form, set_show_form) = signal(false);
    let (pending_delete, set_pending_delete) = signal(Option::<Customer>::None);

    // --- 表单字段 ---
    let (name, set_name) = signal(String::new());
    let (address, set_address) = signal(String::new());
    let (city, set_city) = signal(String::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);

    let open_create = move |_| {
        set_editing.set(None);
        set_name.set(String::new());
        set_address.set(String::new());
        set_city.set(String::new());
        set_form_error.set(None);
        set_show_form.set(true);
    };

    let open_edit = move |customer: Customer| {
        set_name.set(customer.name.clone());
        set_address.set(customer.address.clone());
        set_city.set(customer.city.clone());
        set_form_error.set(None);
        set_editing.set(Some(customer));
        set_show_form.set(true);
    };

    let on_submit = {
        let store = store.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if name.get().trim().is_empty()
                || address.get().trim().is_empty()
                || city.get().trim().is_empty()
            {
                set_form_error.set(Some("All fields are required".to_string()));
                return;
            }

            let request = CustomerRequest {
                name: name.get_untracked().trim().to_string(),
                address: address.get_untracked().trim().to_string(),
                city: city.get_untracked().trim().to_string(),
            };

            let on_done = move |result: Result<(), crate::api::ApiError>| {
                match result {
                    Ok(()) => {
                        toasts.success("Customer saved");
                        set_show_form.set(false);
                    }
                    Err(e) => set_form_error.set(Some(e.user_message("Failed to save customer"))),
                }
            };

            match editing.get_untracked() {
                Some(existing) => store.update(existing.id, request, on_done),
                None => store.create(request, on_done),
            }
        }
    };

    let confirm_delete = {
        let store = store.clone();
        move |_| {
            let Some(target) = pending_delete.get_untracked() else {
                return;
            };
            store.delete(target.id, move |result| {
                match result {
                    Ok(()) => toasts.success("Customer deleted"),
                    Err(e) => toasts.error(e.user_message("Failed to delete customer")),
                }
                set_pending_delete.set(None);
            });
        }
    };

    let search_store = store.clone();
    let prev_store = store.clone();
    let next_store = store.clone();

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Customers"</h1>
                <button class="btn btn-primary" on:click=open_create>"Add customer"</button>
            </div>

            <div class="flex items-center gap-4">
                <label class="input input-bordered flex items-center gap-2 flex-1 max-w-md">
                    <input
                        type="text"
                        class="grow"
                        placeholder="Search by name or city..."
                        prop:value=move || state.get().query.search
                        on:input=move |ev| search_store.set_search(event_target_value(&ev))
                    />
                    <span class="text-base-content/40">"🔍"</span>
                </label>
                <span class="text-sm text-base-content/60">
                    {move || format!("{} customers", state.get().total_elements)}
                </span>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body p-0">
                    <Show
                        when=move || !state.get().loading
                        fallback=|| view! {
                            <div class="flex justify-center p-12">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                    >
                        <table class="table">
                            <thead>
                                <tr>
                                    <SortableHeader store=store.clone() field="name" label="Name" />
                                    <th>"Address"</th>
                                    <SortableHeader store=store.clone() field="city" label="City" />
                                    <th>"Orders"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || state.get().customers key=|c| c.id let:customer>
                                    {
                                        let edit_target = customer.clone();
                                        let delete_target = customer.clone();
                                        let has_active = customer.has_active_orders;
                                        let detail_path = format!("/delivery/customers/{}", customer.id);
                                        view! {
                                            <tr>
                                                <td class="font-medium">
                                                    <NavLink to=detail_path>
                                                        <span class="link link-hover">{customer.name.clone()}</span>
                                                    </NavLink>
                                                </td>
                                                <td>{customer.address.clone()}</td>
                                                <td>{customer.city.clone()}</td>
                                                <td>
                                                    <span class="badge badge-ghost">{customer.orders_count}</span>
                                                    <Show when=move || has_active>
                                                        <span class="badge badge-info badge-sm ml-1">"active"</span>
                                                    </Show>
                                                </td>
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
                        <Show when=move || state.get().customers.is_empty()>
                            <p class="text-center text-base-content/60 p-8">"No customers found."</p>
                        </Show>
                    </Show>
                </div>
            </div>

            // 分页
            <div class="flex justify-center">
                <div class="join">
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || state.get().query.page == 0
                        on:click=move |_| {
                            let page = state.get_untracked().query.page;
                            prev_store.go_to_page(page.saturating_sub(1));
                        }
                    >"«"</button>
                    <button class="join-item btn btn-sm btn-disabled">
                        {move || {
                            let s = state.get();
                            format!("Page {} of {}", s.query.page + 1, s.total_pages.max(1))
                        }}
                    </button>
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || {
                            let s = state.get();
                            s.query.page + 1 >= s.total_pages.max(1)
                        }
                        on:click=move |_| {
                            let page = state.get_untracked().query.page;
                            next_store.go_to_page(page + 1);
                        }
                    >"»"</button>
                </div>
            </div>

            <Show when=move || show_form.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">
                            {move || if editing.get().is_some() { "Edit customer" } else { "New customer" }}
                        </h3>
                        <form class="space-y-4 mt-4" on:submit=on_submit.clone()>
                            <Show when=move || form_error.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="customer-name">
                                    <span class="label-text">"Name"</span>
                                </label>
                                <input
                                    id="customer-name"
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=name
                                    on:input=move |ev| set_name.set(event_target_value(&ev))
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="customer-address">
                                    <span class="label-text">"Address"</span>
                                </label>
                                <input
                                    id="customer-address"
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=address
                                    on:input=move |ev| set_address.set(event_target_value(&ev))
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="customer-city">
                                    <span class="label-text">"City"</span>
                                </label>
                                <input
                                    id="customer-city"
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=city
                                    on:input=move |ev| set_city.set(event_target_value(&ev))
                                    required
                                />
                            </div>

                            <div class="modal-action">
                                <button
                                    type="button"
                                    class="btn btn-ghost"
                                    on:click=move |_| set_show_form.set(false)
                                >"Cancel"</button>
                                <button
                                    class="btn btn-primary"
                                    disabled=move || state.get().is_mutating()
                                >
                                    {move || if state.get().is_mutating() {
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
                        <h3 class="font-bold text-lg">"Delete customer"</h3>
                        <p class="py-4">
                            "Delete "
                            <span class="font-semibold">
                                {move || pending_delete.get().map(|c| c.name).unwrap_or_default()}
                            </span>
                            "?"
                        </p>
                        <Show when=move || pending_delete.get().map(|c| c.has_active_orders).unwrap_or(false)>
                            <div role="alert" class="alert alert-warning text-sm py-2">
                                <span>"This customer has active orders; the server will refuse the deletion."</span>
                            </div>
                        </Show>
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
