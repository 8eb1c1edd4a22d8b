//! 配送域 DTO：客户、订单、配送单
//!
//! 订单内嵌客户与产品子对象；状态枚举的线上取值沿用后端的法语命名。

use crate::production::Product;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// 客户 (Customer)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    /// 列表视图附带的订单统计
    #[serde(default)]
    pub orders_count: u32,
    #[serde(default)]
    pub has_active_orders: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub address: String,
    pub city: String,
}

// =========================================================
// 订单 (Order)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "EN_PREPARATION")]
    EnPreparation,
    #[serde(rename = "EN_ROUTE")]
    EnRoute,
    #[serde(rename = "LIVREE")]
    Livree,
    #[serde(rename = "ANNULEE")]
    Annulee,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::EnPreparation => "In preparation",
            OrderStatus::EnRoute => "En route",
            OrderStatus::Livree => "Delivered",
            OrderStatus::Annulee => "Cancelled",
        }
    }

    /// 活跃订单会阻止其客户被删除
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::EnPreparation | OrderStatus::EnRoute)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub quantity: u32,
    pub product_total_price: f64,
    pub status: OrderStatus,
    pub customer: Customer,
    pub product: Product,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

// =========================================================
// 配送单 (Delivery)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    #[serde(rename = "PLANIFIEE")]
    Planifiee,
    #[serde(rename = "EN_COURS")]
    EnCours,
    #[serde(rename = "LIVREE")]
    Livree,
}

impl DeliveryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Planifiee => "Planned",
            DeliveryStatus::EnCours => "In progress",
            DeliveryStatus::Livree => "Delivered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: i64,
    pub order_id: i64,
    pub total_cost: f64,
    pub delivery_date: NaiveDate,
    pub status: DeliveryStatus,
    pub vehicle: String,
    pub driver: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    pub order_id: i64,
    pub distance_km: f64,
    pub cost_per_km: f64,
    pub vehicle: String,
    pub driver: String,
    pub delivery_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_wire_values_stay_french() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::EnPreparation).unwrap(),
            "\"EN_PREPARATION\""
        );
        let status: OrderStatus = serde_json::from_str("\"ANNULEE\"").unwrap();
        assert_eq!(status, OrderStatus::Annulee);
    }

    #[test]
    fn active_statuses_block_customer_deletion() {
        assert!(OrderStatus::EnPreparation.is_active());
        assert!(OrderStatus::EnRoute.is_active());
        assert!(!OrderStatus::Livree.is_active());
        assert!(!OrderStatus::Annulee.is_active());
    }

    #[test]
    fn customer_defaults_order_stats_when_absent() {
        let json = r#"{"id":1,"name":"Dupont","address":"1 rue A","city":"Lyon"}"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.orders_count, 0);
        assert!(!customer.has_active_orders);
    }

    #[test]
    fn delivery_request_serializes_camel_case_date() {
        let request = DeliveryRequest {
            order_id: 7,
            distance_km: 12.5,
            cost_per_km: 2.0,
            vehicle: "Truck 3".to_string(),
            driver: "K. Leroy".to_string(),
            delivery_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        };
        let out = serde_json::to_value(&request).unwrap();
        assert_eq!(out["orderId"], 7);
        assert_eq!(out["deliveryDate"], "2026-03-01");
    }
}
