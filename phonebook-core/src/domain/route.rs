//! Route descriptors and path matching

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Access-control tag attached to every route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Access {
    /// Only reachable with a session
    RequiresAuth,
    /// Only reachable without a session (the login page)
    RequiresGuest,
    Public,
}

/// Screens the application can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Dashboard,
    Users,
    UserDetail,
    UserEdit,
    UserList,
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            View::Login => "login",
            View::Dashboard => "dashboard",
            View::Users => "users",
            View::UserDetail => "user-detail",
            View::UserEdit => "user-edit",
            View::UserList => "user-list",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a route leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    View(View),
    /// Resolved at navigation time from the session: landing route when
    /// signed in, login route otherwise
    RootRedirect,
}

/// One row of the route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub pattern: String,
    pub target: RouteTarget,
    pub access: Access,
}

impl RouteDescriptor {
    pub fn new(pattern: impl Into<String>, target: RouteTarget, access: Access) -> Self {
        Self {
            pattern: pattern.into(),
            target,
            access,
        }
    }

    pub fn view(pattern: impl Into<String>, view: View, access: Access) -> Self {
        Self::new(pattern, RouteTarget::View(view), access)
    }

    /// Match a normalized path against this route's pattern.
    ///
    /// `:name` segments capture exactly one non-empty segment.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let pattern_segments = segments(&self.pattern);
        let path_segments = segments(path);
        if pattern_segments.len() != path_segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (expected, actual) in pattern_segments.iter().zip(path_segments.iter()) {
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), (*actual).to_string());
            } else if expected != actual {
                return None;
            }
        }
        Some(params)
    }
}

/// Strip query string, fragment and redundant slashes: `/users/42/?tab=x` -> `/users/42`
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let joined = segments(path).join("/");
    format!("/{}", joined)
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
