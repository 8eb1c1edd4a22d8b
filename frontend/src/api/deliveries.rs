//! 配送单端点客户端

use std::rc::Rc;

use fabriq_shared::delivery::{Delivery, DeliveryRequest};
use send_wrapper::SendWrapper;

use super::client::{ApiCore, ApiError};

#[derive(Clone)]
pub struct DeliveryApi {
    core: SendWrapper<Rc<ApiCore>>,
}

impl DeliveryApi {
    pub fn new(core: Rc<ApiCore>) -> Self {
        Self {
            core: SendWrapper::new(core),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Delivery>, ApiError> {
        self.core.get("/api/deliveries").await
    }

    /// 创建配送单；总成本由后端按距离与单价计算
    pub async fn create(&self, request: &DeliveryRequest) -> Result<Delivery, ApiError> {
        self.core.post("/api/deliveries", request).await
    }
}
