//! Adapter implementations
//!
//! Adapters implement the ports with concrete technologies:
//! - JSON file on disk for the KeyValueStore port
//! - In-memory map for the KeyValueStore port (tests, ephemeral sessions)
//! - reqwest HTTP client for the backend REST API

pub mod file_store;
pub mod http;
pub mod memory;

pub use file_store::FileStore;
pub use http::ApiClient;
pub use memory::MemoryStore;
