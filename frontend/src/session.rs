//! 会话模块 - 令牌生命周期的唯一拥有者
//!
//! 四个存储键（访问令牌、刷新令牌、两个过期时间戳）只允许本模块读写。
//! 过期检测是惰性的：在请求/导航时比较持久化的过期时间戳与注入时钟的
//! "现在"，不设定时器。
//!
//! 状态机：未认证 / 已认证-新鲜（访问令牌有效）/ 已认证-过期（仅刷新令牌
//! 有效）。刷新成功回到新鲜态；刷新失败或刷新令牌过期则清空会话。

use std::rc::Rc;

use async_trait::async_trait;
use fabriq_shared::{AccessClaims, AuthResponse, Timestamp};

use crate::web::KeyValueStore;

// =========================================================
// 存储键 (Storage Keys)
// =========================================================

pub const KEY_ACCESS_TOKEN: &str = "access_token";
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";
pub const KEY_ACCESS_EXPIRES_AT: &str = "access_token_expires_at";
pub const KEY_REFRESH_EXPIRES_AT: &str = "refresh_token_expires_at";

// =========================================================
// 时钟抽象
// =========================================================

/// 当前时间来源；测试中注入固定时钟
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// 浏览器时钟
#[derive(Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(js_sys::Date::now() as i64)
    }
}

// =========================================================
// 会话刷新接口
// =========================================================

/// 路由守卫触发刷新时使用的接口；由 API 核心实现（单飞协调）
#[async_trait(?Send)]
pub trait TokenRefresher {
    /// 尝试用刷新令牌换取新令牌对；失败时会话已被清空
    async fn refresh_session(&self) -> bool;
}

// =========================================================
// 当前用户
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub roles: Vec<String>,
}

// =========================================================
// 会话存储
// =========================================================

#[derive(Clone)]
pub struct SessionStore {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
}

impl SessionStore {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// 持久化登录/刷新响应中的令牌对
    ///
    /// 访问令牌的过期时间优先取其自身的 `exp` claim；解码失败时退回
    /// `now + expiresIn`。刷新令牌不透明，只能依赖相对的 `refreshExpiresIn`。
    pub fn save_tokens(&self, response: &AuthResponse) {
        let now = self.clock.now();

        let access_exp = AccessClaims::decode(&response.access_token)
            .ok()
            .and_then(|claims| claims.exp)
            .unwrap_or(now + response.expires_in);
        let refresh_exp = now + response.refresh_expires_in;

        self.store.set(KEY_ACCESS_TOKEN, &response.access_token);
        self.store.set(KEY_REFRESH_TOKEN, &response.refresh_token);
        self.store
            .set(KEY_ACCESS_EXPIRES_AT, &access_exp.to_string());
        self.store
            .set(KEY_REFRESH_EXPIRES_AT, &refresh_exp.to_string());
    }

    /// 清空全部会话状态（登出或刷新失败）
    pub fn purge(&self) {
        self.store.remove(KEY_ACCESS_TOKEN);
        self.store.remove(KEY_REFRESH_TOKEN);
        self.store.remove(KEY_ACCESS_EXPIRES_AT);
        self.store.remove(KEY_REFRESH_EXPIRES_AT);
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(KEY_ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(KEY_REFRESH_TOKEN)
    }

    pub fn access_expires_at(&self) -> Option<Timestamp> {
        self.store
            .get(KEY_ACCESS_EXPIRES_AT)
            .and_then(|s| Timestamp::parse(&s))
    }

    pub fn refresh_expires_at(&self) -> Option<Timestamp> {
        self.store
            .get(KEY_REFRESH_EXPIRES_AT)
            .and_then(|s| Timestamp::parse(&s))
    }

    /// 访问令牌存在且未过期
    ///
    /// 过期时间缺失视为已过期：过期的访问令牌绝不允许附加到请求上。
    pub fn is_authenticated(&self) -> bool {
        match (self.access_token(), self.access_expires_at()) {
            (Some(token), Some(exp)) => !token.is_empty() && !exp.is_past(self.clock.now()),
            _ => false,
        }
    }

    /// 刷新令牌存在且未过期
    pub fn can_refresh(&self) -> bool {
        match (self.refresh_token(), self.refresh_expires_at()) {
            (Some(token), Some(exp)) => !token.is_empty() && !exp.is_past(self.clock.now()),
            _ => false,
        }
    }

    /// 从访问令牌解码当前用户；令牌缺失或不可解码时为 None
    pub fn current_user(&self) -> Option<User> {
        let token = self.access_token()?;
        let claims = AccessClaims::decode(&token).ok()?;
        Some(User {
            username: claims.sub,
            roles: claims.roles,
        })
    }

    /// 用户角色集与要求角色集是否相交
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        self.current_user()
            .map(|user| user.roles.iter().any(|r| required.contains(&r.as_str())))
            .unwrap_or(false)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    // =========================================================
    // Shared test doubles
    // =========================================================

    /// In-memory KeyValueStore used across the frontend test suite
    #[derive(Default)]
    pub struct MemoryStore {
        entries: RefCell<HashMap<String, String>>,
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.entries.borrow_mut().remove(key);
        }
    }

    /// Fixed clock the tests can wind forward
    #[derive(Default)]
    pub struct TestClock {
        now: RefCell<i64>,
    }

    impl TestClock {
        pub fn at(ms: i64) -> Self {
            Self {
                now: RefCell::new(ms),
            }
        }

        pub fn advance(&self, ms: i64) {
            *self.now.borrow_mut() += ms;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Timestamp {
            Timestamp::new(*self.now.borrow())
        }
    }

    pub fn forge_token(sub: &str, roles: &[&str], exp_secs: Option<i64>) -> String {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        let payload = match exp_secs {
            Some(exp) => serde_json::json!({"sub": sub, "roles": roles, "exp": exp}),
            None => serde_json::json!({"sub": sub, "roles": roles}),
        };
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.sig",
            URL_SAFE_NO_PAD.encode(payload.to_string())
        )
    }

    pub fn session_at(now_ms: i64) -> (SessionStore, Rc<TestClock>) {
        let clock = Rc::new(TestClock::at(now_ms));
        let session = SessionStore::new(Rc::new(MemoryStore::default()), clock.clone());
        (session, clock)
    }

    fn auth_response(access: &str, expires_in: i64, refresh_expires_in: i64) -> AuthResponse {
        AuthResponse {
            access_token: access.to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_in,
            refresh_expires_in,
        }
    }

    // =========================================================
    // Tests
    // =========================================================

    #[test]
    fn save_tokens_prefers_exp_claim_over_relative_expiry() {
        let (session, _) = session_at(1_000_000);
        // exp claim at 2_000 secs = 2_000_000 ms, relative would be 1_000_000 + 99
        let token = forge_token("admin", &["ROLE_ADMIN"], Some(2_000));
        session.save_tokens(&auth_response(&token, 99, 500_000));

        assert_eq!(
            session.access_expires_at(),
            Some(Timestamp::from_secs(2_000))
        );
        assert_eq!(
            session.refresh_expires_at(),
            Some(Timestamp::new(1_500_000))
        );
    }

    #[test]
    fn save_tokens_falls_back_to_relative_expiry_for_opaque_tokens() {
        let (session, _) = session_at(1_000_000);
        session.save_tokens(&auth_response("opaque-token", 900_000, 2_000_000));
        assert_eq!(
            session.access_expires_at(),
            Some(Timestamp::new(1_900_000))
        );
    }

    #[test]
    fn expired_timestamp_defeats_present_token() {
        let (session, clock) = session_at(1_000_000);
        let token = forge_token("admin", &["ROLE_ADMIN"], Some(1_500));
        session.save_tokens(&auth_response(&token, 500_000, 5_000_000));
        assert!(session.is_authenticated());

        // Wind past the access expiry but not the refresh expiry
        clock.advance(600_000);
        assert!(session.access_token().is_some());
        assert!(!session.is_authenticated());
        assert!(session.can_refresh());
    }

    #[test]
    fn purge_clears_all_four_keys() {
        let (session, _) = session_at(0);
        let token = forge_token("u", &["ROLE_USER"], Some(10));
        session.save_tokens(&auth_response(&token, 1_000, 1_000));
        session.purge();

        assert_eq!(session.access_token(), None);
        assert_eq!(session.refresh_token(), None);
        assert_eq!(session.access_expires_at(), None);
        assert_eq!(session.refresh_expires_at(), None);
        assert!(!session.is_authenticated());
        assert!(!session.can_refresh());
    }

    #[test]
    fn current_user_decodes_roles() {
        let (session, _) = session_at(0);
        let token = forge_token("marie", &["ROLE_ADMIN", "ROLE_USER"], Some(10));
        session.save_tokens(&auth_response(&token, 1_000, 1_000));

        let user = session.current_user().unwrap();
        assert_eq!(user.username, "marie");
        assert!(session.has_any_role(&["ROLE_ADMIN"]));
        assert!(!session.has_any_role(&["ROLE_SUPERVISOR"]));
    }

    #[test]
    fn missing_expiry_key_means_unauthenticated() {
        // Simulate a half-written session: token present, expiry absent
        let store = MemoryStore::default();
        store.set(KEY_ACCESS_TOKEN, "tok");
        let session = SessionStore::new(Rc::new(store), Rc::new(TestClock::at(0)));
        assert!(!session.is_authenticated());
    }
}
