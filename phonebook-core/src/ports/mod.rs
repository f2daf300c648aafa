//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The session store
//! depends only on these traits, not on concrete implementations.

mod storage;

pub use storage::KeyValueStore;
