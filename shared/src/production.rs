//! 生产域 DTO：产品、物料清单 (BOM)、生产订单
//!
//! 注意：扁平的 BOM 列表响应不携带产品/原料的外键 id，只有名称与库存；
//! 编辑预填时应通过产品详情内嵌的 `BomLine`（携带 `rawMaterialId`）解析 id，
//! 而不是按名称匹配（重名时有歧义）。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// 产品 (Product)
// =========================================================

/// 产品详情内嵌的 BOM 行（携带外键 id）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomLine {
    pub id: i64,
    pub raw_material_id: i64,
    pub raw_material_name: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub cost: f64,
    pub production_time: u32,
    pub stock: u32,
    #[serde(default)]
    pub bill_of_materials: Vec<BomLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub cost: f64,
    pub production_time: u32,
    pub stock: u32,
}

// =========================================================
// 物料清单 (Bill of Materials)
// =========================================================

/// 扁平列表响应：无外键 id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOfMaterial {
    pub bill_of_material_id: i64,
    pub product_name: String,
    pub product_stock: u32,
    pub raw_material_name: String,
    pub raw_material_stock: u32,
    pub quantity_per_product: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOfMaterialRequest {
    pub product_id: i64,
    pub raw_material_id: i64,
    pub quantity_per_product: f64,
}

// =========================================================
// 生产订单 (Production Order)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionOrderStatus {
    #[serde(rename = "EN_ATTENTE")]
    EnAttente,
    #[serde(rename = "EN_PRODUCTION")]
    EnProduction,
    #[serde(rename = "TERMINE")]
    Termine,
    #[serde(rename = "BLOQUE")]
    Bloque,
}

impl ProductionOrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProductionOrderStatus::EnAttente => "Pending",
            ProductionOrderStatus::EnProduction => "In production",
            ProductionOrderStatus::Termine => "Finished",
            ProductionOrderStatus::Bloque => "Blocked",
        }
    }
}

/// 生产订单的物料需求行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequirement {
    pub raw_material_id: i64,
    pub raw_material_name: String,
    pub quantity_per_unit: f64,
    pub total_quantity_needed: f64,
    pub current_stock: f64,
}

impl MaterialRequirement {
    /// 当前库存是否足以覆盖需求
    pub fn is_covered(&self) -> bool {
        self.current_stock >= self.total_quantity_needed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrder {
    pub id: i64,
    pub status: ProductionOrderStatus,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub production_estimated_time: u32,
    pub product_id: i64,
    pub product_name: String,
    pub product_cost: f64,
    #[serde(default)]
    pub bill_of_materials: Vec<MaterialRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrderRequest {
    pub product_id: i64,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductionOrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_bom_response_has_no_foreign_keys() {
        let json = r#"{
            "billOfMaterialId": 3,
            "productName": "Chair",
            "productStock": 12,
            "rawMaterialName": "Oak plank",
            "rawMaterialStock": 40,
            "quantityPerProduct": 4.0
        }"#;
        let bom: BillOfMaterial = serde_json::from_str(json).unwrap();
        assert_eq!(bom.bill_of_material_id, 3);
        assert_eq!(bom.quantity_per_product, 4.0);
    }

    #[test]
    fn product_embeds_bom_lines_with_ids() {
        let json = r#"{
            "id": 1,
            "name": "Chair",
            "cost": 45.0,
            "productionTime": 3,
            "stock": 12,
            "billOfMaterials": [
                {"id": 3, "rawMaterialId": 9, "rawMaterialName": "Oak plank", "quantity": 4.0}
            ]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.bill_of_materials[0].raw_material_id, 9);
    }

    #[test]
    fn material_requirement_coverage() {
        let line = MaterialRequirement {
            raw_material_id: 1,
            raw_material_name: "Steel".to_string(),
            quantity_per_unit: 2.0,
            total_quantity_needed: 20.0,
            current_stock: 15.0,
        };
        assert!(!line.is_covered());
    }

    #[test]
    fn production_order_dates_use_iso_strings() {
        let request = ProductionOrderRequest {
            product_id: 1,
            quantity: 10,
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 8).unwrap(),
            status: None,
        };
        let out = serde_json::to_value(&request).unwrap();
        assert_eq!(out["startDate"], "2026-04-01");
        assert!(out.get("status").is_none());
    }
}
