//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait: a string key/value store with the
//! same surface as a browser's local storage. The client keeps only small
//! records in it (currently the signed-in session), so the trait stays minimal.

use crate::domain::error::Result;

/// Abstraction over persistent key/value storage backends.
///
/// # Implementations
///
/// - [`crate::storage::JsonStorage`]: JSON file with atomic writes (default)
///
/// # Examples
///
/// ```no_run
/// use movie_mania::storage::{JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/movie-mania/storage.json"))?;
/// storage.set_item("theme", "dark")?;
/// assert_eq!(storage.get_item("theme")?.as_deref(), Some("dark"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Returns the value stored under `key`, or `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}
