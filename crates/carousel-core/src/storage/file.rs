//! File-based storage for native platforms.

use super::{BoxFuture, KeyValueStore, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const VALUE_EXTENSION: &str = "json";

/// Stores each key as a file in a directory.
pub struct FileStore {
    /// Directory holding one file per key.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// File path for a key. Characters outside `[A-Za-z0-9_-]` become `_`.
    fn value_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.{}", safe_key, VALUE_EXTENSION))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let path = self.value_path(key);
        Box::pin(async move {
            match fs::read_to_string(&path) {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(StorageError::Io(format!("Failed to read {}: {}", path.display(), e))),
            }
        })
    }

    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.value_path(key);
        let value = value.to_string();
        Box::pin(async move {
            // Write then rename so a failed write never truncates the previous value.
            let tmp = path.with_extension("tmp");
            fs::write(&tmp, value)
                .and_then(|_| fs::rename(&tmp, &path))
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.value_path(key);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_set_get() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        block_on(store.set("app_user", r#"{"email":"a@b.c"}"#)).unwrap();
        let value = block_on(store.get("app_user")).unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"email":"a@b.c"}"#));
    }

    #[test]
    fn test_file_store_missing() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert_eq!(block_on(store.get("nope")).unwrap(), None);
    }

    #[test]
    fn test_file_store_overwrite_and_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        block_on(store.set("k", "one")).unwrap();
        block_on(store.set("k", "two")).unwrap();
        assert_eq!(block_on(store.get("k")).unwrap().as_deref(), Some("two"));

        block_on(store.remove("k")).unwrap();
        block_on(store.remove("k")).unwrap();
        assert_eq!(block_on(store.get("k")).unwrap(), None);
    }

    #[test]
    fn test_file_store_sanitizes_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        block_on(store.set("a/b:c*d", "v")).unwrap();
        assert_eq!(block_on(store.get("a/b:c*d")).unwrap().as_deref(), Some("v"));
        assert!(dir.path().join("a_b_c_d.json").exists());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data").join("store");
        let store = FileStore::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.base_path(), nested.as_path());
    }
}
