//! 订单端点客户端

use std::rc::Rc;

use fabriq_shared::delivery::{Order, OrderRequest};
use send_wrapper::SendWrapper;

use super::client::{ApiCore, ApiError};

#[derive(Clone)]
pub struct OrderApi {
    core: SendWrapper<Rc<ApiCore>>,
}

impl OrderApi {
    pub fn new(core: Rc<ApiCore>) -> Self {
        Self {
            core: SendWrapper::new(core),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Order>, ApiError> {
        self.core.get("/api/orders").await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Order, ApiError> {
        self.core.get(&format!("/api/orders/{}", id)).await
    }

    pub async fn create(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        self.core.post("/api/orders", request).await
    }

    pub async fn update(&self, id: i64, request: &OrderRequest) -> Result<Order, ApiError> {
        self.core.put(&format!("/api/orders/{}", id), request).await
    }

    /// 取消订单（状态转移由后端校验）
    pub async fn cancel(&self, id: i64) -> Result<Order, ApiError> {
        self.core.put_empty(&format!("/api/orders/cancel/{}", id)).await
    }
}
