//! Navigator - current location plus history
//!
//! Every navigation is resolved through the router (and so the guard)
//! against the session's state at that moment. Only the final location of a
//! resolution is committed, so an unauthorized route is never current.

use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::domain::result::Result;
use crate::domain::View;

use super::router::{NavigationOutcome, Resolution, Router};
use super::session::SessionStore;

/// Locations kept for `back`; the oldest are dropped first
pub const MAX_HISTORY: usize = 50;

/// A committed location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub view: View,
    pub params: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    router: Router,
    current: Option<Location>,
    history: VecDeque<Location>,
}

impl Navigator {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            current: None,
            history: VecDeque::new(),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Navigate to `path`. The newest navigation always wins.
    pub fn push(&mut self, path: &str, session: &SessionStore) -> Result<Resolution> {
        let resolution = self.router.resolve(path, session.auth_state())?;
        if let Some(location) = location_of(&resolution) {
            if let Some(previous) = self.current.replace(location) {
                if self.history.len() == MAX_HISTORY {
                    self.history.pop_front();
                }
                self.history.push_back(previous);
            }
        }
        Ok(resolution)
    }

    /// Return to the previous location, running the guard again.
    ///
    /// `None` when there is no history.
    pub fn back(&mut self, session: &SessionStore) -> Result<Option<Resolution>> {
        let Some(previous) = self.history.pop_back() else {
            return Ok(None);
        };
        let resolution = self.router.resolve(&previous.path, session.auth_state())?;
        if let Some(location) = location_of(&resolution) {
            self.current = Some(location);
        }
        Ok(Some(resolution))
    }

    /// Re-run the guard on the current location, e.g. after logout
    pub fn refresh(&mut self, session: &SessionStore) -> Result<Option<Resolution>> {
        let Some(path) = self.current.as_ref().map(|l| l.path.clone()) else {
            return Ok(None);
        };
        let resolution = self.router.resolve(&path, session.auth_state())?;
        if let Some(location) = location_of(&resolution) {
            self.current = Some(location);
        }
        Ok(Some(resolution))
    }
}

fn location_of(resolution: &Resolution) -> Option<Location> {
    match &resolution.outcome {
        NavigationOutcome::Render { path, view, params } => Some(Location {
            path: path.clone(),
            view: *view,
            params: params.clone(),
        }),
        NavigationOutcome::NotFound { .. } => None,
    }
}
