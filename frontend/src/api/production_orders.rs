//! 生产订单端点客户端

use std::rc::Rc;

use fabriq_shared::production::{ProductionOrder, ProductionOrderRequest};
use send_wrapper::SendWrapper;

use super::client::{ApiCore, ApiError};

#[derive(Clone)]
pub struct ProductionOrderApi {
    core: SendWrapper<Rc<ApiCore>>,
}

impl ProductionOrderApi {
    pub fn new(core: Rc<ApiCore>) -> Self {
        Self {
            core: SendWrapper::new(core),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<ProductionOrder>, ApiError> {
        self.core.get("/api/production-orders").await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<ProductionOrder, ApiError> {
        self.core.get(&format!("/api/production-orders/{}", id)).await
    }

    pub async fn create(
        &self,
        payload: &ProductionOrderRequest,
    ) -> Result<ProductionOrder, ApiError> {
        self.core.post("/api/production-orders", payload).await
    }

    pub async fn update(
        &self,
        id: i64,
        payload: &ProductionOrderRequest,
    ) -> Result<ProductionOrder, ApiError> {
        self.core
            .put(&format!("/api/production-orders/{}", id), payload)
            .await
    }

    /// 删除；运行中的生产订单由后端以业务错误拒绝
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.core
            .delete(&format!("/api/production-orders/{}", id))
            .await
    }

    pub async fn cancel(&self, id: i64) -> Result<(), ApiError> {
        self.core
            .put_no_content(&format!("/api/production-orders/cancel/{}", id))
            .await
    }
}
