//! Keyed issue cache with freshness tracking.
//!
//! Entries are keyed by `(namespace, collection)` and hold the shared issue
//! list plus the instant it was fetched. Writes follow a single writer per
//! key: a writer claims the key, fetches and stores. The claim is released
//! when its guard drops.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::issue::{CollectionId, IssueRecord};

/// Cache key: application namespace plus collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: Arc<str>,
    pub collection: CollectionId,
}

/// Whether a cached entry is still within its time to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Cache lookup result.
#[derive(Debug, Clone)]
pub struct Cached {
    pub issues: Arc<[IssueRecord]>,
    pub freshness: Freshness,
}

#[derive(Debug)]
struct CacheEntry {
    issues: Arc<[IssueRecord]>,
    fetched_at: Instant,
}

/// Issue lists keyed by collection.
#[derive(Debug)]
pub struct SheetCache {
    namespace: Arc<str>,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    writers: Arc<Mutex<HashSet<CacheKey>>>,
}

/// Writer slot of one key, released on drop.
#[derive(Debug)]
pub struct WriteClaim {
    writers: Arc<Mutex<HashSet<CacheKey>>>,
    key: CacheKey,
}

impl Drop for WriteClaim {
    fn drop(&mut self) {
        self.writers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

impl SheetCache {
    pub fn new(namespace: impl Into<Arc<str>>, ttl: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            ttl,
            entries: RwLock::new(HashMap::new()),
            writers: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Builds the key of a collection in this cache's namespace.
    pub fn key(&self, collection: &CollectionId) -> CacheKey {
        CacheKey {
            namespace: Arc::clone(&self.namespace),
            collection: collection.clone(),
        }
    }

    /// Returns the cached list and its freshness, if present.
    pub async fn get(&self, key: &CacheKey) -> Option<Cached> {
        let entries = self.entries.read().await;
        entries.get(key).map(|entry| Cached {
            issues: Arc::clone(&entry.issues),
            freshness: if entry.fetched_at.elapsed() < self.ttl {
                Freshness::Fresh
            } else {
                Freshness::Stale
            },
        })
    }

    /// Stores a freshly fetched list, replacing any previous entry.
    pub async fn insert(&self, key: CacheKey, issues: Arc<[IssueRecord]>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                issues,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Claims the single writer slot of a key.
    ///
    /// Returns `None` if another writer already holds it. The slot is freed
    /// when the returned claim drops.
    pub fn claim(&self, key: &CacheKey) -> Option<WriteClaim> {
        let mut writers = self.writers.lock().unwrap_or_else(PoisonError::into_inner);
        writers.insert(key.clone()).then(|| WriteClaim {
            writers: Arc::clone(&self.writers),
            key: key.clone(),
        })
    }

    /// Whether a writer currently holds the key.
    pub fn is_claimed(&self, key: &CacheKey) -> bool {
        self.writers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
