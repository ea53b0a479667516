//! HTTP client construction and page fetching
//!
//! This module handles the GET side of the crawl:
//! - Building the shared HTTP client with the configured user agent
//! - Fetching page bodies for link extraction
//! - Folding transport and HTTP failures into a [`FetchResult`]

use crate::config::UserAgentConfig;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single request
pub const MAX_REDIRECTS: usize = 10;

/// Result of fetching a page
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty if absent)
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to [`MAX_REDIRECTS`] hops so both page fetches
/// and link checks see the post-redirect URL.
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout_secs` - Per-request timeout in seconds
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_blc::config::UserAgentConfig;
/// use sumi_blc::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "sumi-blc".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
/// };
///
/// let client = build_http_client(&config, 30).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Describes a transport error for logging
pub fn describe_error(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_redirect() {
        "redirect limit exceeded"
    } else if error.is_request() {
        "request error"
    } else {
        "transport error"
    }
}

/// Returns true if a Content-Type value denotes an HTML document
///
/// A missing header is treated as HTML.
pub fn is_html(content_type: &str) -> bool {
    content_type.is_empty() || content_type.to_ascii_lowercase().contains("html")
}

fn content_type(response: &Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Fetches a page body for link extraction
///
/// # Request Flow
///
/// | Condition | Result |
/// |-----------|--------|
/// | Transport failure | `NetworkError` |
/// | Non-2xx status | `HttpError` |
/// | Non-HTML Content-Type | `ContentMismatch` |
/// | Body read failure | `NetworkError` |
/// | Otherwise | `Success` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The page URL to fetch
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::NetworkError {
                error: format!("{}: {}", describe_error(&e), e),
            }
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = content_type(&response);
    if !is_html(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    let final_url = response.url().clone();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: format!("{}: {}", describe_error(&e), e),
        },
    }
}
