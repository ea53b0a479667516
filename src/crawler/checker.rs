//! Link status checking
//!
//! The checker consults the [`StatusCache`] before touching the network and
//! fills it after every check, so each distinct target URL costs at most one
//! request per run.

use crate::crawler::cache::StatusCache;
use crate::crawler::fetcher::describe_error;
use crate::state::{Link, ResolvedUrl, Status};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Checks link targets with lightweight HEAD requests
pub struct LinkChecker {
    client: Client,
    cache: Arc<StatusCache>,
    requests: AtomicUsize,
}

impl LinkChecker {
    /// Creates a checker that shares the given cache
    pub fn new(client: Client, cache: Arc<StatusCache>) -> Self {
        Self {
            client,
            cache,
            requests: AtomicUsize::new(0),
        }
    }

    /// Returns the cache this checker reads and fills
    pub fn cache(&self) -> &StatusCache {
        &self.cache
    }

    /// Number of network requests issued so far
    pub fn requests_issued(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    /// Checks a target found on `source`
    ///
    /// A cached link for the target is returned unchanged. Otherwise a HEAD
    /// request is sent to the target's final URL; the response code becomes
    /// the status and the post-redirect URL becomes the new final URL.
    /// Transport failures and non-HTTP schemes yield [`Status::Invalid`].
    ///
    /// # Arguments
    ///
    /// * `source` - The page the reference was found on
    /// * `target` - The resolved reference
    pub async fn check(&self, source: &ResolvedUrl, target: &ResolvedUrl) -> Link {
        let key = target.key().to_string();

        if let Some(cached) = self.cache.get_entry(&key) {
            tracing::debug!(
                "Cache hit for {}: {} (checked {}ms ago)",
                key,
                cached.link.status,
                cached.age().num_milliseconds()
            );
            return cached.link;
        }

        self.cache
            .get_or_check(&key, || self.request_status(source, target))
            .await
    }

    async fn request_status(&self, source: &ResolvedUrl, target: &ResolvedUrl) -> Link {
        if !matches!(target.final_url.scheme(), "http" | "https") {
            tracing::debug!(
                "Unsupported scheme '{}' for {}",
                target.final_url.scheme(),
                target.final_url
            );
            return Link::new(Status::Invalid, source.clone(), target.clone());
        }

        self.requests.fetch_add(1, Ordering::Relaxed);

        match self.client.head(target.final_url.clone()).send().await {
            Ok(response) => {
                let status = Status::Http(response.status().as_u16());
                let checked = target.with_final(response.url().clone());
                tracing::debug!(
                    "Checked {} -> {} (code {})",
                    target.final_url,
                    status,
                    status.code()
                );
                Link::new(status, source.clone(), checked)
            }
            Err(e) => {
                tracing::debug!(
                    "Check failed for {} ({}): {}",
                    target.final_url,
                    describe_error(&e),
                    e
                );
                Link::new(Status::Invalid, source.clone(), target.clone())
            }
        }
    }
}
