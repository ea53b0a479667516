//! Resolved URLs and checked links

use crate::state::Status;
use url::Url;

/// A reference resolved to absolute form
///
/// Created by the resolver and never mutated afterwards. A checked link
/// carries a new value whose `final_url` is the post-redirect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// The page URL the reference was resolved against
    pub base: String,

    /// The absolute form after reference resolution
    pub resolved: Url,

    /// The URL actually requested (no fragment; post-redirect once checked)
    pub final_url: Url,
}

impl ResolvedUrl {
    /// Creates a resolved URL whose final form is the resolved URL minus its fragment
    pub fn new(base: impl Into<String>, resolved: Url) -> Self {
        let mut final_url = resolved.clone();
        final_url.set_fragment(None);

        Self {
            base: base.into(),
            resolved,
            final_url,
        }
    }

    /// Returns a copy with a different final URL (after following redirects)
    pub fn with_final(&self, final_url: Url) -> Self {
        Self {
            base: self.base.clone(),
            resolved: self.resolved.clone(),
            final_url,
        }
    }

    /// The key used for caching and deduplication
    pub fn key(&self) -> &str {
        self.final_url.as_str()
    }
}

/// A checked reference from one page to a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Outcome of the check
    pub status: Status,

    /// The page the reference was found on
    pub source: ResolvedUrl,

    /// The reference target
    pub target: ResolvedUrl,
}

impl Link {
    pub fn new(status: Status, source: ResolvedUrl, target: ResolvedUrl) -> Self {
        Self {
            status,
            source,
            target,
        }
    }

    /// Returns true if this link should be reported
    pub fn is_broken(&self) -> bool {
        !self.status.is_acceptable()
    }
}
