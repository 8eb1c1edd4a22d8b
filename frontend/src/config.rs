//! 前端配置
//!
//! 后端地址默认指向本地开发环境，可通过 LocalStorage 的
//! `api_base_url` 键覆盖（部署时由运维脚本写入）。

use crate::web::KeyValueStore;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const STORAGE_API_BASE_URL_KEY: &str = "api_base_url";

/// 解析后端基础地址
pub fn api_base_url(store: &dyn KeyValueStore) -> String {
    store
        .get(STORAGE_API_BASE_URL_KEY)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::MemoryStore;

    #[test]
    fn falls_back_to_default_when_unset_or_empty() {
        let store = MemoryStore::default();
        assert_eq!(api_base_url(&store), DEFAULT_API_BASE_URL);

        store.set(STORAGE_API_BASE_URL_KEY, "");
        assert_eq!(api_base_url(&store), DEFAULT_API_BASE_URL);

        store.set(STORAGE_API_BASE_URL_KEY, "https://erp.example.com");
        assert_eq!(api_base_url(&store), "https://erp.example.com");
    }
}
