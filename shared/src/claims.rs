//! 访问令牌 claims 解码
//!
//! 访问令牌是三段式的 claims 载体（header.payload.signature）。客户端不做
//! 签名校验——那是后端的职责——只解码 payload 取出用户名、角色与过期时间。
//! `roles` 在线上有两种形态：裸字符串数组，或携带 `authority` 字段的对象数组。

use crate::date::Timestamp;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

// =========================================================
// 错误类型
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// 令牌不是三段式结构
    MalformedToken,
    /// payload 段不是合法的 base64url
    InvalidBase64,
    /// payload 不是预期的 JSON 外形
    InvalidJson(String),
}

impl std::fmt::Display for ClaimsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimsError::MalformedToken => write!(f, "token is not a three-part claims token"),
            ClaimsError::InvalidBase64 => write!(f, "token payload is not valid base64url"),
            ClaimsError::InvalidJson(msg) => write!(f, "token payload is not valid JSON: {}", msg),
        }
    }
}

impl std::error::Error for ClaimsError {}

// =========================================================
// Claims 模型
// =========================================================

/// 角色 claim 的两种线上形态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RoleClaim {
    Name(String),
    Authority { authority: String },
}

impl RoleClaim {
    fn into_name(self) -> String {
        match self {
            RoleClaim::Name(name) => name,
            RoleClaim::Authority { authority } => authority,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: String,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    roles: Vec<RoleClaim>,
}

/// 解码后的访问令牌 payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    /// 用户名（subject）
    pub sub: String,
    /// 过期时间；令牌未携带 `exp` 时为 None
    pub exp: Option<Timestamp>,
    /// 归一化后的角色名列表
    pub roles: Vec<String>,
}

impl AccessClaims {
    /// 解码令牌的 payload 段
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|_| token.matches('.').count() == 2)
            .ok_or(ClaimsError::MalformedToken)?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| ClaimsError::InvalidBase64)?;

        let raw: RawClaims = serde_json::from_slice(&bytes)
            .map_err(|e| ClaimsError::InvalidJson(e.to_string()))?;

        Ok(Self {
            sub: raw.sub,
            // JWT 的 exp 以秒计
            exp: raw.exp.map(Timestamp::from_secs),
            roles: raw.roles.into_iter().map(RoleClaim::into_name).collect(),
        })
    }

    /// 用户角色集与要求角色集是否相交
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        self.roles.iter().any(|r| required.contains(&r.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::json;

    fn forge(payload: serde_json::Value) -> String {
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", body)
    }

    #[test]
    fn decodes_string_roles() {
        let token = forge(json!({
            "sub": "admin",
            "exp": 1_700_000_000,
            "roles": ["ROLE_ADMIN", "ROLE_USER"]
        }));
        let claims = AccessClaims::decode(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, Some(Timestamp::from_secs(1_700_000_000)));
        assert_eq!(claims.roles, vec!["ROLE_ADMIN", "ROLE_USER"]);
    }

    #[test]
    fn decodes_authority_object_roles() {
        let token = forge(json!({
            "sub": "jdoe",
            "roles": [{"authority": "ROLE_USER"}]
        }));
        let claims = AccessClaims::decode(&token).unwrap();
        assert_eq!(claims.roles, vec!["ROLE_USER"]);
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn role_intersection() {
        let token = forge(json!({"sub": "u", "roles": ["ROLE_USER"]}));
        let claims = AccessClaims::decode(&token).unwrap();
        assert!(!claims.has_any_role(&["ROLE_ADMIN"]));

        let token = forge(json!({"sub": "a", "roles": ["ROLE_ADMIN", "ROLE_USER"]}));
        let claims = AccessClaims::decode(&token).unwrap();
        assert!(claims.has_any_role(&["ROLE_ADMIN"]));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(
            AccessClaims::decode("no-dots"),
            Err(ClaimsError::MalformedToken)
        );
        assert_eq!(
            AccessClaims::decode("a.%%%.c"),
            Err(ClaimsError::InvalidBase64)
        );
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("not json"));
        assert!(matches!(
            AccessClaims::decode(&not_json),
            Err(ClaimsError::InvalidJson(_))
        ));
    }
}
