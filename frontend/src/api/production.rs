//! 生产端点客户端：产品与物料清单 (BOM)

use std::rc::Rc;

use fabriq_shared::production::{
    BillOfMaterial, BillOfMaterialRequest, Product, ProductRequest,
};

use send_wrapper::SendWrapper;

use super::client::{ApiCore, ApiError};

#[derive(Clone)]
pub struct ProductApi {
    core: SendWrapper<Rc<ApiCore>>,
}

impl ProductApi {
    pub fn new(core: Rc<ApiCore>) -> Self {
        Self {
            core: SendWrapper::new(core),
        }
    }

    // --- 产品 ---

    pub async fn find_all_products(&self) -> Result<Vec<Product>, ApiError> {
        self.core.get("/api/products").await
    }

    pub async fn create_product(&self, payload: &ProductRequest) -> Result<Product, ApiError> {
        self.core.post("/api/products", payload).await
    }

    pub async fn update_product(
        &self,
        id: i64,
        payload: &ProductRequest,
    ) -> Result<Product, ApiError> {
        self.core.put(&format!("/api/products/{}", id), payload).await
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.core.delete(&format!("/api/products/{}", id)).await
    }

    // --- 物料清单 ---

    pub async fn find_all_boms(&self) -> Result<Vec<BillOfMaterial>, ApiError> {
        self.core.get("/api/bill-of-materials").await
    }

    pub async fn create_bom(
        &self,
        payload: &BillOfMaterialRequest,
    ) -> Result<BillOfMaterial, ApiError> {
        self.core.post("/api/bill-of-materials", payload).await
    }

    pub async fn update_bom(
        &self,
        id: i64,
        payload: &BillOfMaterialRequest,
    ) -> Result<BillOfMaterial, ApiError> {
        self.core
            .put(&format!("/api/bill-of-materials/{}", id), payload)
            .await
    }

    pub async fn delete_bom(&self, id: i64) -> Result<(), ApiError> {
        self.core
            .delete(&format!("/api/bill-of-materials/{}", id))
            .await
    }
}
