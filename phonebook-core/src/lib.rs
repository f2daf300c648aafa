//! Phonebook Core - session, navigation guard and REST clients
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Users, phones, session and route descriptors
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Session store, router and guard, API clients
//! - **adapters**: Concrete implementations (file and memory storage, HTTP)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::{ApiClient, FileStore};
use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{
    Access, AuthState, LoginResponse, NewPhone, NewUser, PasswordChange, Phone, PhoneUpdate,
    PhotoUpload, RouteDescriptor, Session, User, UserProfile, UserUpdate, View,
};

/// Main context for phonebook operations
///
/// Owns the session and everything that reads it. Views borrow the session
/// from here; nothing else holds session state.
pub struct PhonebookContext {
    pub config: Config,
    pub session: SessionStore,
    pub navigator: Navigator,
    pub users: UsersApi,
    pub phones: PhonesApi,
}

impl PhonebookContext {
    /// Context persisting its session under `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let storage = Arc::new(FileStore::in_dir(data_dir));
        Self::with_storage(config, storage)
    }

    /// Context over any storage backend, e.g. `MemoryStore` in tests
    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::new(config.effective_api_base_url())?;

        let session = SessionStore::new(storage, api.clone());
        let navigator = Navigator::new(Router::new(config.router.clone()));
        let users = UsersApi::new(api.clone());
        let phones = PhonesApi::new(api);

        Ok(Self {
            config,
            session,
            navigator,
            users,
            phones,
        })
    }

    /// Navigate to `path` with the current session
    pub fn navigate(&mut self, path: &str) -> Result<Resolution> {
        self.navigator.push(path, &self.session)
    }

    /// Log in, then move a pending login page on to the landing route
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse> {
        let payload = self.session.login(email, password).await?;
        self.navigator.refresh(&self.session)?;
        Ok(payload)
    }

    /// Log out, then re-check the current page against the guard
    pub fn logout(&mut self) -> Result<()> {
        self.session.logout();
        self.navigator.refresh(&self.session)?;
        Ok(())
    }
}
