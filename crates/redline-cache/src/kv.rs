//! Key-Value store wrapper with automatic serialization.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};

use crate::CacheError;

const FILE_EXTENSION: &str = "json";

/// Type-safe cache backed by an in-memory map or a directory of JSON files.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Clones share the same underlying store.
#[derive(Debug, Clone)]
pub struct Cache {
    backend: Arc<Backend>,
}

#[derive(Debug)]
enum Backend {
    Memory(Mutex<HashMap<String, Vec<u8>>>),
    Directory(PathBuf),
}

impl Cache {
    /// Open a process-local store. Contents are lost when the last clone drops.
    pub fn in_memory() -> Self {
        Self {
            backend: Arc::new(Backend::Memory(Mutex::new(HashMap::new()))),
        }
    }

    /// Open a store persisted as one JSON file per key under `dir`.
    ///
    /// The directory is created if it does not exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir(".redline/state")?;
    /// ```
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", dir.display(), e)))?;
        tracing::debug!(dir = %dir.display(), "opened directory store");
        Ok(Self {
            backend: Arc::new(Backend::Directory(dir)),
        })
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get the raw stored bytes for a key.
    ///
    /// Useful when the stored shape has to be inspected before choosing a type.
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self.backend.as_ref() {
            Backend::Memory(map) => Ok(lock(map)?.get(key).cloned()),
            Backend::Directory(dir) => match fs::read(file_for(dir, key)?) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(CacheError::StoreError(e.to_string())),
            },
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        match self.backend.as_ref() {
            Backend::Memory(map) => {
                lock(map)?.insert(key.to_string(), bytes);
                Ok(())
            }
            Backend::Directory(dir) => {
                let path = file_for(dir, key)?;
                // Write then rename so a crash never leaves a half-written record.
                let tmp = path.with_extension("tmp");
                fs::write(&tmp, &bytes).map_err(|e| CacheError::StoreError(e.to_string()))?;
                fs::rename(&tmp, &path).map_err(|e| CacheError::StoreError(e.to_string()))
            }
        }
    }

    /// Delete a value from the cache. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self.backend.as_ref() {
            Backend::Memory(map) => {
                lock(map)?.remove(key);
                Ok(())
            }
            Backend::Directory(dir) => match fs::remove_file(file_for(dir, key)?) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(CacheError::StoreError(e.to_string())),
            },
        }
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        match self.backend.as_ref() {
            Backend::Memory(map) => Ok(lock(map)?.contains_key(key)),
            Backend::Directory(dir) => Ok(file_for(dir, key)?.is_file()),
        }
    }

    /// Get all keys in the cache, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = match self.backend.as_ref() {
            Backend::Memory(map) => lock(map)?.keys().cloned().collect::<Vec<_>>(),
            Backend::Directory(dir) => {
                let entries = fs::read_dir(dir).map_err(|e| CacheError::StoreError(e.to_string()))?;
                let mut keys = Vec::new();
                for entry in entries {
                    let entry = entry.map_err(|e| CacheError::StoreError(e.to_string()))?;
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                        continue;
                    }
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        keys.push(decode_key(stem));
                    }
                }
                keys
            }
        };
        keys.sort();
        Ok(keys)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, CacheError> {
    mutex
        .lock()
        .map_err(|_| CacheError::StoreError("store lock poisoned".to_string()))
}

/// Map a key onto a file inside `dir`.
///
/// `:` is the namespace separator and is not portable in file names, so it is
/// escaped. Path separators and leading dots are rejected outright.
fn file_for(dir: &Path, key: &str) -> Result<PathBuf, CacheError> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\', '%'])
        || key.chars().any(char::is_control)
    {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    let name = format!("{}.{}", key.replace(':', "%3A"), FILE_EXTENSION);
    Ok(dir.join(name))
}

fn decode_key(stem: &str) -> String {
    stem.replace("%3A", ":")
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use redline_cache::cache_key;
///
/// let key = cache_key!("cart", "user123");
/// assert_eq!(key, "cart:user123");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        name: String,
        qty: u32,
    }

    fn record() -> Record {
        Record {
            name: "Chain lube".to_string(),
            qty: 2,
        }
    }

    #[test]
    fn test_memory_roundtrip() {
        let cache = Cache::in_memory();
        cache.set("cart:1", &record()).unwrap();

        let got: Option<Record> = cache.get("cart:1").unwrap();
        assert_eq!(got, Some(record()));
        assert!(cache.exists("cart:1").unwrap());
    }

    #[test]
    fn test_memory_missing_key() {
        let cache = Cache::in_memory();
        let got: Option<Record> = cache.get("cart:missing").unwrap();
        assert!(got.is_none());
        assert!(cache.delete("cart:missing").is_ok());
    }

    #[test]
    fn test_clones_share_store() {
        let cache = Cache::in_memory();
        let other = cache.clone();
        cache.set("orders:last", &record()).unwrap();
        assert!(other.exists("orders:last").unwrap());
    }

    #[test]
    fn test_directory_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let cache = Cache::open_dir(dir.path()).unwrap();
            cache.set("cart:abc", &record()).unwrap();
        }

        let reopened = Cache::open_dir(dir.path()).unwrap();
        let got: Option<Record> = reopened.get("cart:abc").unwrap();
        assert_eq!(got, Some(record()));
        assert_eq!(reopened.keys().unwrap(), vec!["cart:abc".to_string()]);
    }

    #[test]
    fn test_directory_delete() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::open_dir(dir.path()).unwrap();
        cache.set("cart:abc", &record()).unwrap();
        cache.delete("cart:abc").unwrap();
        assert!(!cache.exists("cart:abc").unwrap());
        assert!(cache.keys().unwrap().is_empty());
    }

    #[test]
    fn test_directory_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::open_dir(dir.path()).unwrap();
        let result = cache.set("../escape", &record());
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_get_wrong_shape_is_error() {
        let cache = Cache::in_memory();
        cache.set("cart:1", &"just a string").unwrap();
        let got: Result<Option<Record>, _> = cache.get("cart:1");
        assert!(matches!(got, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("cart", "abc"), "cart:abc");
        assert_eq!(cache_key!("order", "user", 42), "order:user:42");
    }
}
