//! Persistent key/value storage with namespace scoping.
//!
//! The dashboard keeps several unrelated concerns in one flat key space:
//! cached API responses, the auth token, theme preference, favorite module
//! ids, read-alert ids, one-time confirmation flags. [`Storage`] is the flat
//! store; [`ScopedStorage`] prefixes every key with a namespace so each
//! concern can enumerate and clear its own keys without touching the rest.
//!
//! # Example
//!
//! ```
//! use informar_core::storage::{ScopedStorage, Storage};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(Storage::new());
//! let prefs = ScopedStorage::new(Arc::clone(&storage), "prefs");
//! prefs.set("theme", "dark").unwrap();
//! assert_eq!(storage.get("prefs:theme"), Some("dark".to_string()));
//! ```

use crate::error::CoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Flat string key/value store.
///
/// Values persist for the lifetime of the store; callers that need real
/// persistence hold the store for the session, mirroring browser
/// `localStorage` semantics.
#[derive(Debug, Default)]
pub struct Storage {
    entries: Mutex<HashMap<String, String>>,
}

impl Storage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    /// Set a value.
    pub fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::StorageAccess)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove a value. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::StorageAccess)?
            .remove(key);
        Ok(())
    }

    /// Check whether a key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|m| m.contains_key(key))
            .unwrap_or(false)
    }

    /// All keys currently present.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Keys starting with the given prefix.
    #[must_use]
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .lock()
            .map(|m| {
                m.keys()
                    .filter(|k| k.starts_with(prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove every key starting with the given prefix, returning the count.
    ///
    /// Keys outside the prefix are untouched; this is the primitive behind
    /// the cache's selective clear.
    pub fn remove_prefix(&self, prefix: &str) -> Result<usize, CoreError> {
        let mut entries = self.entries.lock().map_err(|_| CoreError::StorageAccess)?;
        let keys: Vec<String> = entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        for key in &keys {
            entries.remove(key);
        }
        Ok(keys.len())
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage view with automatic key prefixing.
///
/// A scope named `cache` stores `foo` under `cache:foo`. [`ScopedStorage::clear`]
/// removes only keys in the scope.
#[derive(Debug, Clone)]
pub struct ScopedStorage {
    inner: Arc<Storage>,
    prefix: String,
}

impl ScopedStorage {
    /// Create a scoped view over shared storage.
    #[must_use]
    pub fn new(storage: Arc<Storage>, prefix: impl Into<String>) -> Self {
        Self {
            inner: storage,
            prefix: prefix.into(),
        }
    }

    /// The namespace prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    /// Get a value from the scope.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(&self.prefixed(key))
    }

    /// Set a value in the scope.
    pub fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.inner.set(&self.prefixed(key), value)
    }

    /// Remove a value from the scope.
    pub fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.inner.remove(&self.prefixed(key))
    }

    /// Check whether a key exists in the scope.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(&self.prefixed(key))
    }

    /// Keys in the scope, with the prefix stripped.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let full_prefix = format!("{}:", self.prefix);
        self.inner
            .keys_with_prefix(&full_prefix)
            .into_iter()
            .map(|k| k[full_prefix.len()..].to_string())
            .collect()
    }

    /// Remove every key in the scope, leaving other scopes untouched.
    pub fn clear(&self) -> Result<usize, CoreError> {
        self.inner.remove_prefix(&format!("{}:", self.prefix))
    }

    /// Get a value and deserialize it from JSON.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        match self.get(key) {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Serialize a value as JSON and store it.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_set_get() {
        let storage = Storage::new();
        storage.set("key", "value").unwrap();
        assert_eq!(storage.get("key"), Some("value".to_string()));
    }

    #[test]
    fn test_storage_miss() {
        let storage = Storage::new();
        assert_eq!(storage.get("missing"), None);
    }

    #[test]
    fn test_storage_remove() {
        let storage = Storage::new();
        storage.set("key", "value").unwrap();
        storage.remove("key").unwrap();
        assert!(!storage.contains("key"));
    }

    #[test]
    fn test_remove_prefix_is_selective() {
        let storage = Storage::new();
        storage.set("cache:a", "1").unwrap();
        storage.set("cache:b", "2").unwrap();
        storage.set("access_token", "secret").unwrap();
        storage.set("theme", "dark").unwrap();

        let removed = storage.remove_prefix("cache:").unwrap();
        assert_eq!(removed, 2);
        assert!(!storage.contains("cache:a"));
        assert!(!storage.contains("cache:b"));
        assert_eq!(storage.get("access_token"), Some("secret".to_string()));
        assert_eq!(storage.get("theme"), Some("dark".to_string()));
    }

    #[test]
    fn test_scoped_prefixing() {
        let storage = Arc::new(Storage::new());
        let scoped = ScopedStorage::new(Arc::clone(&storage), "favorites");
        scoped.set("modules", "[\"zombie\"]").unwrap();
        assert!(storage.contains("favorites:modules"));
        assert_eq!(scoped.keys(), vec!["modules".to_string()]);
    }

    #[test]
    fn test_scoped_clear_leaves_neighbors() {
        let storage = Arc::new(Storage::new());
        let cache = ScopedStorage::new(Arc::clone(&storage), "cache");
        let prefs = ScopedStorage::new(Arc::clone(&storage), "prefs");
        cache.set("summary", "{}").unwrap();
        prefs.set("theme", "dark").unwrap();

        cache.clear().unwrap();
        assert!(!cache.contains("summary"));
        assert_eq!(prefs.get("theme"), Some("dark".to_string()));
    }

    #[test]
    fn test_scoped_json_round_trip() {
        let storage = Arc::new(Storage::new());
        let scoped = ScopedStorage::new(storage, "alerts");
        scoped.set_json("read", &vec![1u64, 2, 3]).unwrap();
        let read: Option<Vec<u64>> = scoped.get_json("read").unwrap();
        assert_eq!(read, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_scoped_json_corrupt_value() {
        let storage = Arc::new(Storage::new());
        let scoped = ScopedStorage::new(storage, "alerts");
        scoped.set("read", "{not json").unwrap();
        let read: Result<Option<Vec<u64>>, _> = scoped.get_json("read");
        assert!(read.is_err());
    }
}
