//! 路由守卫 - 纯授权决策
//!
//! 守卫本身是一个纯函数：读取会话状态与目标路由，返回放行/拒绝/先刷新
//! 三种决策之一。所有副作用（History 跳转、发起刷新请求）由路由服务执行。
//!
//! 决策规则：
//! - 公开路由放行；已认证用户访问登录页时重定向回首页
//! - 已认证且角色相交 → 放行；角色不足 → 拒绝并跳转无权限页
//! - 访问令牌过期但刷新令牌可用 → 要求先刷新再重新评估
//! - 两个令牌均不可用 → 拒绝并跳转登录页，携带 returnUrl

use crate::session::SessionStore;
use crate::web::route::AppRoute;

/// 拒绝原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// 未认证（或会话已不可恢复）
    NotAuthenticated,
    /// 已认证但缺少要求的角色
    MissingRole,
    /// 已认证用户不应停留在登录页
    AlreadyAuthenticated,
}

/// 守卫决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// 放行
    Allow,
    /// 拒绝，并重定向到给定路径
    Deny { redirect: String, reason: DenyReason },
    /// 访问令牌过期但可刷新：先执行单飞刷新，成功后重新评估
    Refresh,
}

/// 评估一次导航请求
pub fn evaluate(session: &SessionStore, target: &AppRoute) -> RouteDecision {
    if !target.requires_auth() {
        if target.should_redirect_when_authenticated() && session.is_authenticated() {
            return RouteDecision::Deny {
                redirect: AppRoute::Home.to_path(),
                reason: DenyReason::AlreadyAuthenticated,
            };
        }
        return RouteDecision::Allow;
    }

    if session.is_authenticated() {
        let required = target.required_roles();
        if required.is_empty() || session.has_any_role(required) {
            return RouteDecision::Allow;
        }
        return RouteDecision::Deny {
            redirect: AppRoute::Unauthorized.to_path(),
            reason: DenyReason::MissingRole,
        };
    }

    if session.can_refresh() {
        return RouteDecision::Refresh;
    }

    RouteDecision::Deny {
        redirect: AppRoute::login_redirect_for(target),
        reason: DenyReason::NotAuthenticated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{forge_token, session_at};
    use fabriq_shared::AuthResponse;

    fn login_as(session: &crate::session::SessionStore, roles: &[&str], access_ttl: i64) {
        let token = forge_token("tester", roles, None);
        session.save_tokens(&AuthResponse {
            access_token: token,
            refresh_token: "refresh-1".to_string(),
            expires_in: access_ttl,
            refresh_expires_in: 1_000_000,
        });
    }

    #[test]
    fn public_routes_always_allowed() {
        let (session, _) = session_at(0);
        assert_eq!(evaluate(&session, &AppRoute::Home), RouteDecision::Allow);
        assert_eq!(evaluate(&session, &AppRoute::Login), RouteDecision::Allow);
        assert_eq!(
            evaluate(&session, &AppRoute::Register),
            RouteDecision::Allow
        );
    }

    #[test]
    fn authenticated_user_is_bounced_off_login_page() {
        let (session, _) = session_at(0);
        login_as(&session, &["ROLE_USER"], 10_000);
        assert_eq!(
            evaluate(&session, &AppRoute::Login),
            RouteDecision::Deny {
                redirect: "/".to_string(),
                reason: DenyReason::AlreadyAuthenticated,
            }
        );
    }

    #[test]
    fn role_matrix() {
        let (session, _) = session_at(0);
        login_as(&session, &["ROLE_USER"], 10_000);
        assert_eq!(
            evaluate(&session, &AppRoute::Customers),
            RouteDecision::Deny {
                redirect: "/unauthorized".to_string(),
                reason: DenyReason::MissingRole,
            }
        );
        // Profile has no role requirement
        assert_eq!(evaluate(&session, &AppRoute::Profile), RouteDecision::Allow);

        let (session, _) = session_at(0);
        login_as(&session, &["ROLE_ADMIN", "ROLE_USER"], 10_000);
        assert_eq!(
            evaluate(&session, &AppRoute::Customers),
            RouteDecision::Allow
        );
    }

    #[test]
    fn stale_access_with_live_refresh_asks_for_refresh() {
        let (session, clock) = session_at(0);
        login_as(&session, &["ROLE_ADMIN"], 10_000);
        clock.advance(20_000);
        assert_eq!(
            evaluate(&session, &AppRoute::Customers),
            RouteDecision::Refresh
        );
    }

    #[test]
    fn both_tokens_expired_redirects_to_login_with_return_url() {
        let (session, clock) = session_at(0);
        login_as(&session, &["ROLE_ADMIN"], 10_000);
        clock.advance(2_000_000);
        assert_eq!(
            evaluate(&session, &AppRoute::Customers),
            RouteDecision::Deny {
                redirect: "/login?returnUrl=/delivery/customers".to_string(),
                reason: DenyReason::NotAuthenticated,
            }
        );
    }
}
