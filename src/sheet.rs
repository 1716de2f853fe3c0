//! Cheatsheet page controller.
//!
//! Loads the issue list of a collection through the keyed cache, revalidates
//! stale entries in the background and resolves which entry the `_id` query
//! parameter selects.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::anchor::anchor_id;
use crate::cache::{CacheKey, Freshness, SheetCache};
use crate::github::IssueSource;
use crate::issue::{CollectionId, IssueRecord};

/// Loads issue lists for sheet pages.
pub struct SheetService<S> {
    source: Arc<S>,
    cache: Arc<SheetCache>,
}

impl<S> Clone for SheetService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S: IssueSource> SheetService<S> {
    pub fn new(source: S, cache: SheetCache) -> Self {
        Self {
            source: Arc::new(source),
            cache: Arc::new(cache),
        }
    }

    pub fn cache(&self) -> &SheetCache {
        &self.cache
    }

    /// Returns the issue list to render for a collection.
    ///
    /// A fresh cache entry is returned as is. A stale entry is returned
    /// immediately while one background refetch replaces it. On a miss the
    /// list is fetched before returning and seeds the cache. A failed fetch
    /// yields an empty list and is not cached.
    pub async fn issues(&self, collection: &CollectionId) -> Arc<[IssueRecord]> {
        let key = self.cache.key(collection);

        match self.cache.get(&key).await {
            Some(cached) if cached.freshness == Freshness::Fresh => cached.issues,
            Some(cached) => {
                self.spawn_revalidation(key);
                cached.issues
            }
            None => self.initial_load(key).await,
        }
    }

    /// Fetches a missing collection before the first render.
    ///
    /// Only the request holding the writer claim seeds the cache. The claim
    /// is freed even if this future is dropped mid-fetch.
    async fn initial_load(&self, key: CacheKey) -> Arc<[IssueRecord]> {
        let claim = self.cache.claim(&key);
        match self.source.fetch_issues(&key.collection).await {
            Ok(issues) => {
                info!(collection = %key.collection, count = issues.len(), "loaded collection");
                let issues: Arc<[IssueRecord]> = issues.into();
                if claim.is_some() {
                    self.cache.insert(key, Arc::clone(&issues)).await;
                }
                issues
            }
            Err(e) => {
                warn!(collection = %key.collection, error = %e, "failed to load collection");
                Vec::new().into()
            }
        }
    }

    /// Starts one background refetch of a stale key.
    ///
    /// Does nothing while another writer holds the key.
    fn spawn_revalidation(&self, key: CacheKey) {
        let Some(claim) = self.cache.claim(&key) else {
            debug!(collection = %key.collection, "revalidation already in flight");
            return;
        };

        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            let _claim = claim;
            match source.fetch_issues(&key.collection).await {
                Ok(issues) => {
                    debug!(collection = %key.collection, count = issues.len(), "revalidated collection");
                    cache.insert(key, issues.into()).await;
                }
                Err(e) => {
                    warn!(collection = %key.collection, error = %e, "revalidation failed, keeping stale entry");
                }
            }
        });
    }
}

/// Finds the issue whose anchor id equals the active selector.
///
/// A selector that matches nothing is not an error.
pub fn active_issue<'a>(
    collection: &CollectionId,
    issues: &'a [IssueRecord],
    selector: Option<&str>,
) -> Option<&'a IssueRecord> {
    let selector = selector?;
    issues
        .iter()
        .find(|issue| anchor_id(collection, issue) == selector)
}

/// Returns the DOM id the page should scroll to after rendering.
///
/// Only a selector that matches a rendered entry yields a target.
pub fn scroll_target(
    collection: &CollectionId,
    issues: &[IssueRecord],
    selector: Option<&str>,
) -> Option<String> {
    active_issue(collection, issues, selector).map(|issue| anchor_id(collection, issue))
}
