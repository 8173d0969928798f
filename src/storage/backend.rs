//! Storage backend abstraction.
//!
//! The console persists exactly one thing, the admin access token. The trait is
//! still a general string key-value store so the admin state does not care
//! whether it is backed by a file or by memory.

use crate::domain::error::Result;

/// Minimal persistent key-value store.
///
/// # Implementations
///
/// - [`crate::storage::JsonKeyValueStore`]: JSON file with atomic writes
/// - [`crate::storage::MemoryKeyValueStore`]: in-process map for tests and
///   as a fallback when the data directory is not writable
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn remove(&mut self, key: &str) -> Result<()>;
}
