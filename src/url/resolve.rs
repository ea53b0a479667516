use crate::state::ResolvedUrl;
use url::Url;

/// How a resolved reference is handled by the crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Absolute URL that should be checked over the network
    Crawlable,
    /// `tel:` reference, recorded without a check
    Phone,
    /// `mailto:` reference, recorded without a check
    Mailto,
    /// Unparseable or empty reference, dropped
    Invalid,
}

/// The result of resolving a raw reference against a base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Crawlable(ResolvedUrl),
    Phone(ResolvedUrl),
    Mailto(ResolvedUrl),
    Invalid,
}

impl Resolution {
    /// Returns the classification of this resolution
    pub fn classification(&self) -> Classification {
        match self {
            Self::Crawlable(_) => Classification::Crawlable,
            Self::Phone(_) => Classification::Phone,
            Self::Mailto(_) => Classification::Mailto,
            Self::Invalid => Classification::Invalid,
        }
    }

    /// Returns the resolved URL, if the reference parsed
    pub fn target(&self) -> Option<&ResolvedUrl> {
        match self {
            Self::Crawlable(target) | Self::Phone(target) | Self::Mailto(target) => Some(target),
            Self::Invalid => None,
        }
    }
}

/// Resolves a raw attribute value against the page it was found on
///
/// # Resolution Rules
///
/// 1. Empty or whitespace-only references are `Invalid`
/// 2. The reference is parsed, relative references are resolved against `base`;
///    a parse error is `Invalid`
/// 3. `tel:` URLs are `Phone`, `mailto:` URLs are `Mailto`, whatever their body
/// 4. A hierarchical URL whose path has a malformed percent escape (`%` not
///    followed by two hex digits) is `Invalid`; queries and fragments may hold
///    a bare `%`
/// 5. Everything else is `Crawlable`
///
/// Never panics; a bad reference degrades to `Invalid` so the crawl continues.
///
/// # Examples
///
/// ```
/// use sumi_blc::url::{resolve, Classification};
/// use url::Url;
///
/// let base = Url::parse("http://site.test/docs/").unwrap();
///
/// let about = resolve(&base, "../about");
/// assert_eq!(about.classification(), Classification::Crawlable);
/// assert_eq!(about.target().unwrap().resolved.as_str(), "http://site.test/about");
///
/// assert_eq!(resolve(&base, "mailto:x@y.test").classification(), Classification::Mailto);
/// assert_eq!(resolve(&base, "%%%invalid%%%").classification(), Classification::Invalid);
/// ```
pub fn resolve(base: &Url, raw: &str) -> Resolution {
    if raw.trim().is_empty() {
        return Resolution::Invalid;
    }

    let resolved = match Url::options().base_url(Some(base)).parse(raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Failed to parse reference {:?}: {}", raw, e);
            return Resolution::Invalid;
        }
    };

    if resolved.as_str().is_empty() {
        return Resolution::Invalid;
    }

    match resolved.scheme() {
        "tel" => return Resolution::Phone(ResolvedUrl::new(base.as_str(), resolved)),
        "mailto" => return Resolution::Mailto(ResolvedUrl::new(base.as_str(), resolved)),
        _ => {}
    }

    if !resolved.cannot_be_a_base() && has_malformed_escape(resolved.path()) {
        tracing::debug!("Malformed percent escape in reference {:?}", raw);
        return Resolution::Invalid;
    }

    Resolution::Crawlable(ResolvedUrl::new(base.as_str(), resolved))
}

/// Returns true if a `%` is not followed by two hex digits
fn has_malformed_escape(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}
