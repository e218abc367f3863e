//! Key-Value Storage Module
//!
//! Asynchronous string store the media caches persist into. The device
//! storage itself is an external collaborator; this module defines the
//! interface and two implementations.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StorageError;

/// Opaque get/set/remove string store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, None if absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
