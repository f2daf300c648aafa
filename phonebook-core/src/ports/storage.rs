//! Key-value storage port
//!
//! Durable client-side storage for the session. Values are plain strings;
//! callers serialize structured data themselves.

use crate::domain::result::Result;

/// Key-value persistence abstraction
///
/// Implementations must make a `set` visible to every later `get` on the
/// same store, including across process restarts for durable backends.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never set or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
