//! Service layer
//!
//! The session store, the router with its guard and navigator, and the
//! REST clients that run on top of the session.

pub mod guard;
pub mod logging;
mod navigation;
pub mod router;
mod phones;
mod session;
mod users;

pub use guard::GuardDecision;
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use navigation::{Location, Navigator, MAX_HISTORY};
pub use phones::PhonesApi;
pub use router::{NavigationOutcome, Resolution, Router, RouterConfig};
pub use session::SessionStore;
pub use users::UsersApi;
