//! 采购订单端点客户端

use std::rc::Rc;

use fabriq_shared::procurement::{SupplyOrder, SupplyOrderRequest};
use send_wrapper::SendWrapper;

use super::client::{ApiCore, ApiError};

#[derive(Clone)]
pub struct SupplyOrderApi {
    core: SendWrapper<Rc<ApiCore>>,
}

impl SupplyOrderApi {
    pub fn new(core: Rc<ApiCore>) -> Self {
        Self {
            core: SendWrapper::new(core),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<SupplyOrder>, ApiError> {
        self.core.get("/api/supply-orders").await
    }

    pub async fn create(&self, payload: &SupplyOrderRequest) -> Result<SupplyOrder, ApiError> {
        self.core.post("/api/supply-orders", payload).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.core.delete(&format!("/api/supply-orders/{}", id)).await
    }

    /// 标记收货；后端据此入库原材料
    pub async fn mark_received(&self, id: i64) -> Result<SupplyOrder, ApiError> {
        self.core.put_empty(&format!("/api/supply-orders/{}", id)).await
    }
}
