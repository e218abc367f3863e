use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::KeyValueStore;
use crate::error::StorageError;

/// Store keeping one file per key in a directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// reader never observes a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    ///
    /// Bytes outside `[A-Za-z0-9._-]` are written as `%XX`. `%` itself is
    /// escaped, so distinct keys always get distinct files.
    fn item_path(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("%{byte:02X}"));
            }
        }
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.item_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                Err(StorageError::Corrupt(err.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.item_path(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), "Storage slot written");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.item_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
