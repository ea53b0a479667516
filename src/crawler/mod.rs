//! Crawler module for page fetching and link checking
//!
//! This module contains the core crawling logic, including:
//! - HTML tag events and link extraction
//! - The per-run link status cache
//! - HEAD-based link checking
//! - The breadth-first frontier
//! - Overall crawl coordination

mod cache;
mod checker;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use cache::{CachedLink, StatusCache};
pub use checker::LinkChecker;
pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{
    build_http_client, describe_error, fetch_page, is_html, FetchResult, MAX_REDIRECTS,
};
pub use frontier::Frontier;
pub use parser::{
    extract_links, tag_events, ElementAttributeTable, LinkExtractor, TableLevel, TagEvent,
};
