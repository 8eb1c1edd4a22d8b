//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义应用的所有路由、其认证/角色要求，以及 returnUrl 的往返编码。

use fabriq_shared::ROLE_ADMIN;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页（公开）
    #[default]
    Home,
    /// 登录页面
    Login,
    /// 注册页面
    Register,
    /// 无权限提示页
    Unauthorized,
    /// 个人资料（需要登录，不限角色）
    Profile,

    // --- 采购 (Admin) ---
    Suppliers,
    Materials,
    SupplyOrders,

    // --- 生产 (Admin) ---
    Products,
    BillOfMaterials,
    ProductionOrders,

    // --- 配送 (Admin) ---
    Customers,
    CustomerDetail(i64),
    Orders,
    Deliveries,

    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path（不含查询串）解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split('?').next().unwrap_or(path);
        match path {
            "/" | "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/unauthorized" => Self::Unauthorized,
            "/profile" => Self::Profile,
            "/procurement/suppliers" => Self::Suppliers,
            "/procurement/materials" => Self::Materials,
            "/procurement/orders" => Self::SupplyOrders,
            "/production/products" => Self::Products,
            "/production/bill-of-materials" => Self::BillOfMaterials,
            "/production/production-orders" => Self::ProductionOrders,
            "/delivery/customers" => Self::Customers,
            "/delivery/orders" => Self::Orders,
            "/delivery/deliveries" => Self::Deliveries,
            other => {
                if let Some(id) = other
                    .strip_prefix("/delivery/customers/")
                    .and_then(|rest| rest.parse::<i64>().ok())
                {
                    Self::CustomerDetail(id)
                } else {
                    Self::NotFound
                }
            }
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Unauthorized => "/unauthorized".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Suppliers => "/procurement/suppliers".to_string(),
            Self::Materials => "/procurement/materials".to_string(),
            Self::SupplyOrders => "/procurement/orders".to_string(),
            Self::Products => "/production/products".to_string(),
            Self::BillOfMaterials => "/production/bill-of-materials".to_string(),
            Self::ProductionOrders => "/production/production-orders".to_string(),
            Self::Customers => "/delivery/customers".to_string(),
            Self::CustomerDetail(id) => format!("/delivery/customers/{}", id),
            Self::Orders => "/delivery/orders".to_string(),
            Self::Deliveries => "/delivery/deliveries".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Home | Self::Login | Self::Register | Self::Unauthorized | Self::NotFound
        )
    }

    /// 该路由要求的角色集（空集 = 登录即可）
    pub fn required_roles(&self) -> &'static [&'static str] {
        match self {
            Self::Suppliers
            | Self::Materials
            | Self::SupplyOrders
            | Self::Products
            | Self::BillOfMaterials
            | Self::ProductionOrders
            | Self::Customers
            | Self::CustomerDetail(_)
            | Self::Orders
            | Self::Deliveries => &[ROLE_ADMIN],
            _ => &[],
        }
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 认证失败时的重定向目标，保留原始路径供登录后跳回
    pub fn login_redirect_for(original: &AppRoute) -> String {
        format!("/login?returnUrl={}", urlencode(&original.to_path()))
    }

    /// 从 `?returnUrl=...` 查询串中解出登录后的目标路径
    pub fn return_url_from_query(query: &str) -> Option<String> {
        query
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("returnUrl="))
            .map(urldecode)
            .filter(|p| p.starts_with('/'))
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn urldecode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_roundtrip() {
        for route in [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Profile,
            AppRoute::Suppliers,
            AppRoute::Materials,
            AppRoute::SupplyOrders,
            AppRoute::Products,
            AppRoute::BillOfMaterials,
            AppRoute::ProductionOrders,
            AppRoute::Customers,
            AppRoute::CustomerDetail(42),
            AppRoute::Orders,
            AppRoute::Deliveries,
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
        assert_eq!(
            AppRoute::from_path("/delivery/customers/abc"),
            AppRoute::NotFound
        );
    }

    #[test]
    fn admin_sections_require_admin_role() {
        assert_eq!(AppRoute::Customers.required_roles(), &[ROLE_ADMIN]);
        assert_eq!(AppRoute::Profile.required_roles(), &[] as &[&str]);
        assert!(AppRoute::Profile.requires_auth());
        assert!(!AppRoute::Home.requires_auth());
    }

    #[test]
    fn login_redirect_preserves_return_url() {
        let redirect = AppRoute::login_redirect_for(&AppRoute::Customers);
        assert_eq!(redirect, "/login?returnUrl=/delivery/customers");

        let back = AppRoute::return_url_from_query("?returnUrl=/delivery/customers");
        assert_eq!(back.as_deref(), Some("/delivery/customers"));
    }

    #[test]
    fn return_url_rejects_external_targets() {
        assert_eq!(
            AppRoute::return_url_from_query("?returnUrl=http%3A%2F%2Fevil.example"),
            None
        );
        assert_eq!(AppRoute::return_url_from_query("?other=1"), None);
    }

    #[test]
    fn from_path_ignores_query_string() {
        assert_eq!(
            AppRoute::from_path("/login?returnUrl=/profile"),
            AppRoute::Login
        );
    }
}
