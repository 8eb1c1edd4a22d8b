//! 供应商端点客户端

use std::rc::Rc;

use fabriq_shared::procurement::{Supplier, SupplierRequest, SupplierWithMaterials};
use send_wrapper::SendWrapper;

use super::client::{ApiCore, ApiError};

#[derive(Clone)]
pub struct SupplierApi {
    core: SendWrapper<Rc<ApiCore>>,
}

impl SupplierApi {
    pub fn new(core: Rc<ApiCore>) -> Self {
        Self {
            core: SendWrapper::new(core),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Supplier>, ApiError> {
        self.core.get("/api/suppliers").await
    }

    pub async fn create(&self, payload: &SupplierRequest) -> Result<Supplier, ApiError> {
        self.core.post("/api/suppliers", payload).await
    }

    pub async fn update(&self, id: i64, payload: &SupplierRequest) -> Result<Supplier, ApiError> {
        self.core.put(&format!("/api/suppliers/{}", id), payload).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.core.delete(&format!("/api/suppliers/{}", id)).await
    }

    /// 采购下单表单需要的目录：供应商及其可供原料
    pub async fn with_materials(&self) -> Result<Vec<SupplierWithMaterials>, ApiError> {
        self.core.get("/api/suppliers/with-materials").await
    }
}
