//! 客户端点客户端
//!
//! 列表端点支持分页/排序/搜索，返回分页响应。

use std::rc::Rc;

use fabriq_shared::delivery::{Customer, CustomerRequest};
use fabriq_shared::{PageQuery, PageResponse};
use send_wrapper::SendWrapper;

use super::client::{ApiCore, ApiError};

#[derive(Clone)]
pub struct CustomerApi {
    core: SendWrapper<Rc<ApiCore>>,
}

impl CustomerApi {
    pub fn new(core: Rc<ApiCore>) -> Self {
        Self {
            core: SendWrapper::new(core),
        }
    }

    pub async fn search(&self, query: &PageQuery) -> Result<PageResponse<Customer>, ApiError> {
        let path = format!("/api/customers?{}", query.to_query_string());
        self.core.get(&path).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Customer, ApiError> {
        self.core.get(&format!("/api/customers/{}", id)).await
    }

    pub async fn create(&self, request: &CustomerRequest) -> Result<Customer, ApiError> {
        self.core.post("/api/customers", request).await
    }

    pub async fn update(&self, id: i64, request: &CustomerRequest) -> Result<Customer, ApiError> {
        self.core
            .put(&format!("/api/customers/{}", id), request)
            .await
    }

    /// 删除客户；有活跃订单时后端以 409 拒绝
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.core.delete(&format!("/api/customers/{}", id)).await
    }
}
