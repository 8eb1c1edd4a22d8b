//! fabriq 共享数据层
//!
//! 前端与测试共用的纯数据 crate：
//! - 各资源的请求/响应 DTO（字段与后端 REST 接口的 JSON 一一对应，camelCase）
//! - 访问令牌 claims 解码
//! - 分页/排序参数模型

pub mod auth;
pub mod claims;
pub mod date;
pub mod delivery;
pub mod page;
pub mod procurement;
pub mod production;

pub use auth::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, UserResponse};
pub use claims::{AccessClaims, ClaimsError};
pub use date::Timestamp;
pub use page::{PageQuery, PageResponse, SortDirection, SortSpec};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 授权请求头名称
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// Bearer 方案前缀
pub const BEARER_PREFIX: &str = "Bearer ";

/// 管理员角色（所有后台管理路由要求此角色）
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// 普通用户角色
pub const ROLE_USER: &str = "ROLE_USER";
