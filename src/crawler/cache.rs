//! Link status caching
//!
//! The cache memoizes the checked [`Link`] for each absolute target URL so a
//! run issues at most one network check per distinct URL. Entries live for
//! the whole run.

use crate::state::Link;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// A cached check result with the time it was produced
#[derive(Debug, Clone)]
pub struct CachedLink {
    /// The checked link
    pub link: Link,

    /// When the check completed
    pub checked_at: DateTime<Utc>,
}

impl CachedLink {
    pub fn new(link: Link) -> Self {
        Self {
            link,
            checked_at: Utc::now(),
        }
    }

    /// Returns how long ago the check completed
    pub fn age(&self) -> Duration {
        Utc::now() - self.checked_at
    }
}

/// Per-run cache of link check results keyed by target URL
///
/// Each key owns a [`OnceCell`], so concurrent callers of
/// [`StatusCache::get_or_check`] for the same URL share a single check.
#[derive(Debug, Default)]
pub struct StatusCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CachedLink>>>>,
}

impl StatusCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, url: &str) -> Arc<OnceCell<CachedLink>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Looks up the cached link for a URL
    pub fn get(&self, url: &str) -> Option<Link> {
        self.get_entry(url).map(|cached| cached.link)
    }

    /// Looks up the cached entry (link plus check time) for a URL
    pub fn get_entry(&self, url: &str) -> Option<CachedLink> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(url).and_then(|cell| cell.get().cloned())
    }

    /// Stores a link for a URL
    ///
    /// The first stored value wins; later puts for the same URL are ignored.
    /// Returns true if the value was stored.
    pub fn put(&self, url: &str, link: Link) -> bool {
        self.cell(url).set(CachedLink::new(link)).is_ok()
    }

    /// Returns the cached link for a URL, running `check` to produce it if absent
    ///
    /// Only one `check` runs per URL; concurrent callers wait for it and
    /// receive the same link.
    pub async fn get_or_check<F, Fut>(&self, url: &str, check: F) -> Link
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Link>,
    {
        let cell = self.cell(url);
        cell.get_or_init(|| async move { CachedLink::new(check().await) })
            .await
            .link
            .clone()
    }

    /// Number of URLs with a completed check
    pub fn len(&self) -> usize {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
