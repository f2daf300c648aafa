//! Session store - token and profile of the signed-in user
//!
//! The store is the only writer of the session. Everything else reads it
//! through the accessors: the navigation guard asks for `auth_state()`, the
//! API clients ask for `auth_header()`.

use std::sync::Arc;

use reqwest::Method;

use crate::adapters::http::ApiClient;
use crate::domain::result::{Error, Result};
use crate::domain::session::{LoginRequest, TOKEN_KEY, USER_KEY};
use crate::domain::{AuthState, LoginResponse, Session, UserProfile};
use crate::ports::KeyValueStore;

const LOGIN_FAILED: &str = "Login failed";

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    api: ApiClient,
    token: Option<String>,
}

impl SessionStore {
    /// Create a store, restoring any token persisted by an earlier session
    pub fn new(storage: Arc<dyn KeyValueStore>, api: ApiClient) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored token, starting signed out");
                None
            }
        };
        Self { storage, api, token }
    }

    /// Exchange credentials for a token and persist the session
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse> {
        tracing::info!(email, "logging in");

        let request = self
            .api
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest { email, password });
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = login_error_message(&body);
            tracing::info!(status = status.as_u16(), %message, "login rejected");
            return Err(Error::Auth(message));
        }

        let body = response.text().await?;
        let payload: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(error = %e, "login response is not valid JSON");
            Error::auth("Invalid response from server")
        })?;

        let token = payload
            .token()
            .ok_or_else(|| Error::auth("No token received"))?
            .to_string();
        let profile = payload
            .user
            .clone()
            .unwrap_or_else(|| UserProfile::from_email(email));

        // Token goes last: a stored token must always have a stored profile
        self.storage.set(USER_KEY, &serde_json::to_string(&profile)?)?;
        if let Err(e) = self.storage.set(TOKEN_KEY, &token) {
            if let Err(cleanup) = self.storage.remove(USER_KEY) {
                tracing::warn!(error = %cleanup, "failed to clear stored profile");
            }
            return Err(e);
        }
        self.token = Some(token);

        tracing::info!(email, "logged in");
        Ok(payload)
    }

    /// Forget the session locally. No request is sent to the backend.
    pub fn logout(&mut self) {
        self.token = None;
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear stored session value");
            }
        }
        tracing::info!("logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn auth_state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Stored profile; an unreadable profile counts as no profile
    pub fn user(&self) -> Option<UserProfile> {
        match self.read_profile() {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring stored user profile");
                None
            }
        }
    }

    /// `Authorization` header value for the current token.
    ///
    /// Always produced, even when signed out (`"Bearer "`), so it says
    /// nothing about whether the session is valid.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token.as_deref().unwrap_or_default())
    }

    pub fn snapshot(&self) -> Session {
        Session {
            token: self.token.clone(),
            user: self.token.as_ref().and_then(|_| self.user()),
        }
    }

    /// HTTP client this session logs in with
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn read_profile(&self) -> Result<Option<UserProfile>> {
        let Some(raw) = self.storage.get(USER_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::StorageParse(format!("user profile: {}", e)))
    }
}

/// Human-readable reason from a failed login response body.
///
/// JSON bodies use their `error` field, then `message`; any other body is
/// used verbatim. Empty results fall back to a generic message.
fn login_error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .map(|json| {
            ["error", "message"]
                .iter()
                .find_map(|field| {
                    json.get(field)
                        .and_then(|v| v.as_str())
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                })
                .unwrap_or_default()
        });

    let message = match from_json {
        Some(message) => message,
        None => body.trim().to_string(),
    };

    if message.is_empty() {
        LOGIN_FAILED.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn store_with(entries: &[(&str, &str)]) -> (Arc<MemoryStore>, SessionStore) {
        let storage = Arc::new(MemoryStore::with_entries(entries.iter().copied()));
        let api = ApiClient::new("http://localhost:8080/api").unwrap();
        let session = SessionStore::new(storage.clone(), api);
        (storage, session)
    }

    #[test]
    fn test_login_error_message_prefers_error_field() {
        assert_eq!(
            login_error_message(r#"{"error":"Invalid credentials","message":"x"}"#),
            "Invalid credentials"
        );
        assert_eq!(login_error_message(r#"{"message":"Account locked"}"#), "Account locked");
    }

    #[test]
    fn test_login_error_message_fallbacks() {
        assert_eq!(login_error_message("Service Unavailable"), "Service Unavailable");
        assert_eq!(login_error_message(""), "Login failed");
        assert_eq!(login_error_message(r#"{"detail":"nope"}"#), "Login failed");
        assert_eq!(login_error_message(r#"{"error":""}"#), "Login failed");
    }

    #[test]
    fn test_restores_persisted_token() {
        let (_, session) = store_with(&[("token", "T0"), ("user", r#"{"email":"a@b.com"}"#)]);
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("T0"));
        assert_eq!(session.auth_header(), "Bearer T0");
        assert_eq!(session.user().unwrap().email, "a@b.com");
        assert_eq!(session.auth_state(), AuthState::Authenticated);
    }

    #[test]
    fn test_empty_persisted_token_is_signed_out() {
        let (_, session) = store_with(&[("token", "")]);
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(session.auth_header(), "Bearer ");
    }

    #[test]
    fn test_unparseable_profile_is_absent() {
        let (_, session) = store_with(&[("token", "T0"), ("user", "{not json")]);
        assert!(session.user().is_none());
        assert!(matches!(session.read_profile(), Err(Error::StorageParse(_))));
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let (storage, mut session) = store_with(&[("token", "T0"), ("user", "{}")]);
        session.logout();
        assert!(!session.is_authenticated());
        assert!(storage.is_empty());
        assert_eq!(session.snapshot(), Session::default());

        // Logging out twice is harmless
        session.logout();
        assert!(!session.is_authenticated());
    }
}
