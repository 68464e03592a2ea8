//! Durable key-value storage.
//!
//! The editor persists a handful of string values (the signed-in user, the project list) under
//! fixed keys. Backends implement [`KeyValueStore`]; the rest of the crate only ever talks to
//! the trait, so tests can swap in [`MemoryStore`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Key holding the signed-in user as JSON `{"email": ...}`.
pub const USER_KEY: &str = "app_user";
/// Key holding the saved projects as a JSON array.
pub const PROJECTS_KEY: &str = "my_projects";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Quota exceeded: {needed} bytes needed, {quota} available")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// String-valued key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Remove a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;
}
