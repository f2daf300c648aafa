//! Session domain models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::user::UserProfile;

/// Storage key holding the raw bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the serialized user profile
pub const USER_KEY: &str = "user";

/// Authentication state as seen by the navigation guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

impl AuthState {
    pub fn is_authenticated(self) -> bool {
        self == AuthState::Authenticated
    }
}

/// Snapshot of the current session
///
/// `user` is only expected when `token` is set; login writes both and
/// logout clears both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

/// Credentials posted to the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Payload returned by a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl LoginResponse {
    /// Token, unless missing or empty
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_counts_as_missing() {
        let resp: LoginResponse = serde_json::from_str(r#"{"token":"","user":null}"#).unwrap();
        assert_eq!(resp.token(), None);

        let resp: LoginResponse = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert_eq!(resp.token(), None);
        assert_eq!(resp.extra["message"], "ok");
    }

    #[test]
    fn test_login_request_body() {
        let body = serde_json::to_value(LoginRequest { email: "a@b.com", password: "pw" }).unwrap();
        assert_eq!(body, serde_json::json!({"email": "a@b.com", "password": "pw"}));
    }
}
