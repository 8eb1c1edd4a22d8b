//! 采购域 DTO：供应商、原材料、采购订单

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// 供应商 (Supplier)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact: String,
    /// 1-5 评分
    pub rating: u8,
    /// 交货周期（天）
    pub lead_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRequest {
    pub name: String,
    pub contact: String,
    pub rating: u8,
    pub lead_time: u32,
}

// =========================================================
// 原材料 (Raw Material)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    pub id: i64,
    pub name: String,
    pub stock: f64,
    pub min_stock: f64,
    pub unit: String,
    #[serde(default)]
    pub supplier_ids: Vec<i64>,
}

impl RawMaterial {
    /// 库存低于最小阈值时需要补货提示
    pub fn is_below_min_stock(&self) -> bool {
        self.stock < self.min_stock
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialRequest {
    pub name: String,
    pub stock: f64,
    pub min_stock: f64,
    pub unit: String,
    pub supplier_ids: Vec<i64>,
}

/// `/api/suppliers/with-materials` 的响应：供应商及其可供原料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierWithMaterials {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub rating: u8,
    pub lead_time: u32,
    #[serde(default)]
    pub raw_materials: Vec<MaterialRef>,
}

/// 供应目录里的原料引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRef {
    pub id: i64,
    pub name: String,
}

// =========================================================
// 采购订单 (Supply Order)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuantity {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyOrder {
    pub id: i64,
    pub date: NaiveDate,
    pub status: String,
    pub supplier: Supplier,
    #[serde(default)]
    pub raw_materials: Vec<MaterialQuantity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyOrderLine {
    pub raw_material_id: i64,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyOrderRequest {
    pub supplier_id: i64,
    pub lines: Vec<SupplyOrderLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_material_low_stock_threshold() {
        let mut material = RawMaterial {
            id: 1,
            name: "Steel".to_string(),
            stock: 5.0,
            min_stock: 10.0,
            unit: "kg".to_string(),
            supplier_ids: vec![2],
        };
        assert!(material.is_below_min_stock());
        material.stock = 10.0;
        assert!(!material.is_below_min_stock());
    }

    #[test]
    fn supply_order_embeds_supplier_and_lines() {
        let json = r#"{
            "id": 4,
            "date": "2026-02-10",
            "status": "EN_ATTENTE",
            "supplier": {"id": 2, "name": "AcierPro", "contact": "a@b.c", "rating": 4, "leadTime": 7},
            "rawMaterials": [{"id": 9, "name": "Steel", "quantity": 120.0}]
        }"#;
        let order: SupplyOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.supplier.lead_time, 7);
        assert_eq!(order.raw_materials[0].quantity, 120.0);
    }
}
