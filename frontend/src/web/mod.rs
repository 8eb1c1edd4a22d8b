//! 原生 Web API 封装模块
//!
//! 此模块提供对浏览器原生 API 的轻量级封装，并以 trait 形式暴露接口，
//! 使会话与 API 层可以在非 wasm 目标下用内存替身进行测试。

mod http;
pub mod route;
pub mod router;
mod storage;
mod timer;

pub use http::{FetchHttpClient, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
pub use storage::{KeyValueStore, LocalStorage};
pub use timer::Timeout;
