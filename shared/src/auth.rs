//! 认证协议 DTO
//!
//! 与 `/api/auth/*` 及 `/api/users/register` 的请求/响应一一对应。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 注册请求；`role` 由后端校验为 ADMIN/USER/MANAGER 之一
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub role: String,
}

/// 登录与刷新共用的响应外形
///
/// `expires_in` / `refresh_expires_in` 为相对毫秒数；访问令牌自身的
/// `exp` claim 优先于 `expires_in`（刷新令牌不透明，只能依赖相对值）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_uses_camel_case_wire_names() {
        let json = r#"{
            "accessToken": "a.b.c",
            "refreshToken": "r",
            "expiresIn": 900000,
            "refreshExpiresIn": 86400000
        }"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "a.b.c");
        assert_eq!(response.refresh_expires_in, 86_400_000);

        let out = serde_json::to_value(&response).unwrap();
        assert!(out.get("accessToken").is_some());
        assert!(out.get("access_token").is_none());
    }

    #[test]
    fn register_request_omits_absent_names() {
        let request = RegisterRequest {
            username: "jdoe".to_string(),
            password: "secret".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: None,
            last_name: None,
            role: "USER".to_string(),
        };
        let out = serde_json::to_value(&request).unwrap();
        assert!(out.get("firstName").is_none());
        assert_eq!(out["email"], "jdoe@example.com");
        assert_eq!(out["role"], "USER");
    }
}
