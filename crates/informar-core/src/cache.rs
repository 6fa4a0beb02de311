//! TTL cache for API responses.
//!
//! Several widgets on one page read the same endpoints within a render
//! cycle; the cache memoizes those responses for a short window (5 minutes
//! by default) so each endpoint is fetched once. Entries are persisted
//! through a [`ScopedStorage`] namespace and evicted lazily: an expired
//! entry leaves storage only when next looked up by key, or when
//! [`ResponseCache::clear`] wipes the cache namespace. There is no
//! background sweep.
//!
//! Clearing is selective by construction: only keys under the cache's own
//! namespace are removed, so the auth token, theme preference and other
//! neighbors in the same flat store survive.

use crate::error::CoreError;
use crate::storage::ScopedStorage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Default entry lifetime: 5 minutes.
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;

/// Millisecond clock source, injectable for tests.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-advanced clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current time.
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    /// Advance the clock.
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// One persisted cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    value: Value,
    expiry: u64,
}

/// Storage-backed TTL cache keyed by endpoint path.
pub struct ResponseCache {
    storage: ScopedStorage,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache over the given namespace scope.
    #[must_use]
    pub fn new(storage: ScopedStorage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Store a value with the given TTL in milliseconds.
    pub fn set(&self, key: &str, value: Value, ttl_ms: u64) -> Result<(), CoreError> {
        let entry = CacheEntry {
            value,
            expiry: self.clock.now_ms().saturating_add(ttl_ms),
        };
        self.storage.set_json(key, &entry)
    }

    /// Store a value with the default 5-minute TTL.
    pub fn set_default(&self, key: &str, value: Value) -> Result<(), CoreError> {
        self.set(key, value, DEFAULT_TTL_MS)
    }

    /// Look up a value, evicting it if expired.
    ///
    /// A malformed persisted entry is treated as a miss: it is logged,
    /// removed, and the caller falls through to a network fetch.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        let entry: CacheEntry = match self.storage.get_json(key) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt cache entry");
                let _ = self.storage.remove(key);
                return None;
            }
        };
        if self.clock.now_ms() > entry.expiry {
            let _ = self.storage.remove(key);
            return None;
        }
        Some(entry.value)
    }

    /// Check whether a key is present and fresh, without touching storage.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        match self.storage.get_json::<CacheEntry>(key) {
            Ok(Some(entry)) => self.clock.now_ms() <= entry.expiry,
            _ => false,
        }
    }

    /// Remove a single entry.
    pub fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.storage.remove(key)
    }

    /// Remove every entry in the cache namespace.
    ///
    /// Unrelated keys in the same backing store (auth token, theme,
    /// favorites) are untouched.
    pub fn clear(&self) -> Result<usize, CoreError> {
        self.storage.clear()
    }

    /// Keys currently present in the cache namespace, fresh or not.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.storage.keys()
    }
}
