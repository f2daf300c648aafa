//! Navigation guard
//!
//! Pure decision functions: given a route's access tag and the current
//! authentication state, allow the navigation or redirect it.

use serde::Serialize;

use crate::domain::{Access, AuthState};

use super::router::RouterConfig;

/// Outcome of the guard for one navigation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "lowercase")]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

/// Decide whether a route with `access` may be entered in `state`
pub fn evaluate(access: Access, state: AuthState, config: &RouterConfig) -> GuardDecision {
    match (access, state) {
        (Access::RequiresAuth, AuthState::Unauthenticated) => {
            GuardDecision::Redirect(config.login_route.clone())
        }
        (Access::RequiresGuest, AuthState::Authenticated) => {
            GuardDecision::Redirect(config.landing_route.clone())
        }
        _ => GuardDecision::Proceed,
    }
}

/// Where `/` leads right now
pub fn root_redirect(state: AuthState, config: &RouterConfig) -> &str {
    match state {
        AuthState::Authenticated => &config.landing_route,
        AuthState::Unauthenticated => &config.login_route,
    }
}
