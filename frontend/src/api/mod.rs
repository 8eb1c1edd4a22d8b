//! API 客户端层
//!
//! 每个后端资源一个客户端（方法与端点一一对应），全部经由 `ApiCore` 发送：
//! - 出站请求自动附加 `Authorization: Bearer <access>`（刷新调用除外）
//! - 收到 401 时走单飞刷新协议，成功后用新令牌重放一次
//! - 非 2xx 响应解析后端的 `{"message": ...}` 错误体，原样上抛
//!
//! 客户端会被视图闭包与 Context 持有，而 Leptos 0.8 要求两者 `Send + Sync`；
//! CSR 只有一个线程，`Rc` 构成的核心经 `SendWrapper` 跨过该边界。

mod auth;
mod client;
mod customers;
mod deliveries;
mod materials;
mod orders;
mod production;
mod production_orders;
mod refresh;
mod suppliers;
mod supply_orders;

#[cfg(test)]
mod tests;

pub use auth::AuthApi;
pub use client::{ApiCore, ApiError};
pub use customers::CustomerApi;
pub use deliveries::DeliveryApi;
pub use materials::MaterialApi;
pub use orders::OrderApi;
pub use production::ProductApi;
pub use production_orders::ProductionOrderApi;
pub use refresh::{RefreshError, RefreshGate};
pub use suppliers::SupplierApi;
pub use supply_orders::SupplyOrderApi;
