//! Route table and route resolution
//!
//! The table is fixed once the router is built. Resolution walks a path
//! through the table and the guard until it reaches a view, following
//! redirects along the way.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::route::normalize_path;
use crate::domain::{Access, AuthState, RouteDescriptor, RouteTarget, View};

use super::guard::{self, GuardDecision};

/// Upper bound on redirects followed for a single navigation
const MAX_REDIRECTS: usize = 8;

/// Routes the guard sends users to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    /// Where signed-in users land (root path, guest-only pages)
    #[serde(default = "default_landing_route")]
    pub landing_route: String,
    /// Where signed-out users are sent
    #[serde(default = "default_login_route")]
    pub login_route: String,
}

fn default_landing_route() -> String {
    "/dashboard".to_string()
}

fn default_login_route() -> String {
    "/login".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            landing_route: default_landing_route(),
            login_route: default_login_route(),
        }
    }
}

/// A path matched against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDescriptor,
    pub path: String,
    pub params: HashMap<String, String>,
}

/// Final result of resolving one navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Render {
        path: String,
        view: View,
        params: HashMap<String, String>,
    },
    NotFound {
        path: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Path as asked for, normalized
    pub requested: String,
    /// Every intermediate redirect target, in order
    pub redirects: Vec<String>,
    pub outcome: NavigationOutcome,
}

impl Resolution {
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }

    /// Path the navigation ended on
    pub fn final_path(&self) -> &str {
        match &self.outcome {
            NavigationOutcome::Render { path, .. } | NavigationOutcome::NotFound { path } => path,
        }
    }

    pub fn view(&self) -> Option<View> {
        match &self.outcome {
            NavigationOutcome::Render { view, .. } => Some(*view),
            NavigationOutcome::NotFound { .. } => None,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        match &self.outcome {
            NavigationOutcome::Render { params, .. } => params.get(name).map(String::as_str),
            NavigationOutcome::NotFound { .. } => None,
        }
    }
}

/// The application's route table
pub fn default_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("/", RouteTarget::RootRedirect, Access::Public),
        RouteDescriptor::view("/login", View::Login, Access::RequiresGuest),
        RouteDescriptor::view("/dashboard", View::Dashboard, Access::RequiresAuth),
        RouteDescriptor::view("/users", View::Users, Access::RequiresAuth),
        RouteDescriptor::view("/users/:id", View::UserDetail, Access::RequiresAuth),
        RouteDescriptor::view("/users/:id/edit", View::UserEdit, Access::RequiresAuth),
        RouteDescriptor::view("/userlist", View::UserList, Access::RequiresAuth),
    ]
}

#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<RouteDescriptor>,
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self::with_routes(default_routes(), config)
    }

    pub fn with_routes(routes: Vec<RouteDescriptor>, config: RouterConfig) -> Self {
        Self { routes, config }
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// First route whose pattern matches `path`
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        self.routes.iter().find_map(|route| {
            route.matches(&path).map(|params| RouteMatch {
                route,
                path: path.clone(),
                params,
            })
        })
    }

    /// Resolve a navigation to `path` for the given authentication state
    pub fn resolve(&self, path: &str, state: AuthState) -> Result<Resolution> {
        let requested = normalize_path(path);
        let mut redirects: Vec<String> = Vec::new();
        let mut current = requested.clone();

        loop {
            let Some(matched) = self.match_path(&current) else {
                return Ok(Resolution {
                    requested,
                    redirects,
                    outcome: NavigationOutcome::NotFound { path: current },
                });
            };

            let next = match matched.route.target {
                RouteTarget::RootRedirect => guard::root_redirect(state, &self.config).to_string(),
                RouteTarget::View(view) => match guard::evaluate(matched.route.access, state, &self.config) {
                    GuardDecision::Proceed => {
                        return Ok(Resolution {
                            requested,
                            redirects,
                            outcome: NavigationOutcome::Render {
                                path: matched.path,
                                view,
                                params: matched.params,
                            },
                        });
                    }
                    GuardDecision::Redirect(to) => to,
                },
            };

            let next = normalize_path(&next);
            tracing::debug!(from = %current, to = %next, ?state, "navigation redirected");

            if next == requested || redirects.contains(&next) || redirects.len() >= MAX_REDIRECTS {
                return Err(Error::Navigation(format!(
                    "redirect loop while resolving '{}' (via {})",
                    requested,
                    redirects.join(" -> ")
                )));
            }
            redirects.push(next.clone());
            current = next;
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}
