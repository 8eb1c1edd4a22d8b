//! 配送单页
//!
//! 为已有订单安排配送；成本由后端按里程与单价计算。

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::delivery::{Delivery, DeliveryRequest, Order};

use crate::api::{DeliveryApi, OrderApi};
use crate::toast::use_toasts;

#[component]
pub fn DeliveriesPage() -> impl IntoView {
    let toasts = use_toasts();
    let api = DeliveryApi::new(crate::use_api_core());
    let order_api = OrderApi::new(crate::use_api_core());

    let (deliveries, set_deliveries) = signal(Vec::<Delivery>::new());
    let (orders, set_orders) = signal(Vec::<Order>::new());
    let (loading, set_loading) = signal(true);
    let (show_form, set_show_form) = signal(false);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.find_all().await {
                    Ok(data) => set_deliveries.set(data),
                    Err(e) => toasts.error(e.user_message("Failed to load deliveries")),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    {
        let order_api = order_api.clone();
        spawn_local(async move {
            match order_api.find_all().await {
                Ok(data) => {
                    // 只有活跃订单可以安排配送
                    set_orders.set(data.into_iter().filter(|o| o.status.is_active()).collect());
                }
                Err(e) => toasts.error(e.user_message("Failed to load orders")),
            }
        });
    }

    // --- 表单字段 ---
    let (order_id, set_order_id) = signal(0i64);
    let (distance_km, set_distance_km) = signal(0.0f64);
    let (cost_per_km, set_cost_per_km) = signal(1.0f64);
    let (vehicle, set_vehicle) = signal(String::new());
    let (driver, set_driver) = signal(String::new());
    let (delivery_date, set_delivery_date) = signal(String::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let open_create = move |_| {
        set_order_id.set(0);
        set_distance_km.set(0.0);
        set_cost_per_km.set(1.0);
        set_vehicle.set(String::new());
        set_driver.set(String::new());
        set_delivery_date.set(String::new());
        set_form_error.set(None);
        set_show_form.set(true);
    };

    let on_submit = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if order_id.get() == 0 {
                set_form_error.set(Some("Choose an order".to_string()));
                return;
            }
            if distance_km.get() <= 0.0 || cost_per_km.get() <= 0.0 {
                set_form_error.set(Some("Distance and cost must be positive".to_string()));
                return;
            }
            if vehicle.get().trim().is_empty() || driver.get().trim().is_empty() {
                set_form_error.set(Some("Vehicle and driver are required".to_string()));
                return;
            }
            let Ok(date) = delivery_date.get().parse::<NaiveDate>() else {
                set_form_error.set(Some("Delivery date is required".to_string()));
                return;
            };

            let payload = DeliveryRequest {
                order_id: order_id.get_untracked(),
                distance_km: distance_km.get_untracked(),
                cost_per_km: cost_per_km.get_untracked(),
                vehicle: vehicle.get_untracked().trim().to_string(),
                driver: driver.get_untracked().trim().to_string(),
                delivery_date: date,
            };

            set_saving.set(true);
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                match api.create(&payload).await {
                    Ok(_) => {
                        toasts.success("Delivery scheduled");
                        set_show_form.set(false);
                        load();
                    }
                    Err(e) => set_form_error.set(Some(e.user_message("Failed to schedule delivery"))),
                }
                set_saving.set(false);
            });
        }
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Deliveries"</h1>
                <button class="btn btn-primary" on:click=open_create>"Schedule delivery"</button>
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
                                    <th>"Order"</th>
                                    <th>"Date"</th>
                                    <th>"Vehicle"</th>
                                    <th>"Driver"</th>
                                    <th>"Cost"</th>
                                    <th>"Status"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=move || deliveries.get() key=|d| d.id let:delivery>
                                    <tr>
                                        <td class="font-medium">{format!("#{}", delivery.order_id)}</td>
                                        <td>{delivery.delivery_date.to_string()}</td>
                                        <td>{delivery.vehicle.clone()}</td>
                                        <td>{delivery.driver.clone()}</td>
                                        <td>{format!("{:.2}", delivery.total_cost)}</td>
                                        <td>
                                            <span class="badge badge-ghost">{delivery.status.label()}</span>
                                        </td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                        <Show when=move || deliveries.get().is_empty()>
                            <p class="text-center text-base-content/60 p-8">"No deliveries yet."</p>
                        </Show>
                    </Show>
                </div>
            </div>

            <Show when=move || show_form.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">"Schedule delivery"</h3>
                        <form class="space-y-4 mt-4" on:submit=on_submit.clone()>
                            <Show when=move || form_error.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="delivery-order">
                                    <span class="label-text">"Order"</span>
                                </label>
                                <select
                                    id="delivery-order"
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        set_order_id.set(event_target_value(&ev).parse().unwrap_or(0));
                                    }
                                >
                                    <option value="0" selected=move || order_id.get() == 0>
                                        "Choose an order..."
                                    </option>
                                    <For each=move || orders.get() key=|o| o.id let:order>
                                        <option
                                            value=order.id.to_string()
                                            selected=move || order_id.get() == order.id
                                        >
                                            {format!(
                                                "#{} — {} × {} for {}",
                                                order.id, order.product.name, order.quantity, order.customer.name
                                            )}
                                        </option>
                                    </For>
                                </select>
                            </div>

                            <div class="grid grid-cols-2 gap-4">
                                <div class="form-control">
                                    <label class="label" for="delivery-distance">
                                        <span class="label-text">"Distance (km)"</span>
                                    </label>
                                    <input
                                        id="delivery-distance"
                                        type="number"
                                        step="any"
                                        min="0"
                                        class="input input-bordered"
                                        prop:value=move || distance_km.get().to_string()
                                        on:input=move |ev| {
                                            set_distance_km.set(event_target_value(&ev).parse().unwrap_or(0.0));
                                        }
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="delivery-cost">
                                        <span class="label-text">"Cost per km"</span>
                                    </label>
                                    <input
                                        id="delivery-cost"
                                        type="number"
                                        step="any"
                                        min="0"
                                        class="input input-bordered"
                                        prop:value=move || cost_per_km.get().to_string()
                                        on:input=move |ev| {
                                            set_cost_per_km.set(event_target_value(&ev).parse().unwrap_or(0.0));
                                        }
                                    />
                                </div>
                            </div>

                            <div class="grid grid-cols-2 gap-4">
                                <div class="form-control">
                                    <label class="label" for="delivery-vehicle">
                                        <span class="label-text">"Vehicle"</span>
                                    </label>
                                    <input
                                        id="delivery-vehicle"
                                        type="text"
                                        class="input input-bordered"
                                        prop:value=vehicle
                                        on:input=move |ev| set_vehicle.set(event_target_value(&ev))
                                        required
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="delivery-driver">
                                        <span class="label-text">"Driver"</span>
                                    </label>
                                    <input
                                        id="delivery-driver"
                                        type="text"
                                        class="input input-bordered"
                                        prop:value=driver
                                        on:input=move |ev| set_driver.set(event_target_value(&ev))
                                        required
                                    />
                                </div>
                            </div>

                            <div class="form-control">
                                <label class="label" for="delivery-date">
                                    <span class="label-text">"Delivery date"</span>
                                </label>
                                <input
                                    id="delivery-date"
                                    type="date"
                                    class="input input-bordered"
                                    prop:value=delivery_date
                                    on:input=move |ev| set_delivery_date.set(event_target_value(&ev))
                                    required
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
                                        view! { <span class="loading loading-spinner"></span> "Scheduling..." }.into_any()
                                    } else {
                                        "Schedule".into_any()
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
