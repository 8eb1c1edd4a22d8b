//! 原材料端点客户端

use std::rc::Rc;

use fabriq_shared::procurement::{RawMaterial, RawMaterialRequest};
use send_wrapper::SendWrapper;

use super::client::{ApiCore, ApiError};

#[derive(Clone)]
pub struct MaterialApi {
    core: SendWrapper<Rc<ApiCore>>,
}

impl MaterialApi {
    pub fn new(core: Rc<ApiCore>) -> Self {
        Self {
            core: SendWrapper::new(core),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<RawMaterial>, ApiError> {
        self.core.get("/api/raw-materials").await
    }

    pub async fn create(&self, payload: &RawMaterialRequest) -> Result<RawMaterial, ApiError> {
        self.core.post("/api/raw-materials", payload).await
    }

    pub async fn update(
        &self,
        id: i64,
        payload: &RawMaterialRequest,
    ) -> Result<RawMaterial, ApiError> {
        self.core
            .put(&format!("/api/raw-materials/{}", id), payload)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.core.delete(&format!("/api/raw-materials/{}", id)).await
    }
}
