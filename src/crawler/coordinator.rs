//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop that ties the other
//! crawler pieces together:
//! - Draining the [`Frontier`] one page at a time
//! - Fetching pages and extracting their references
//! - Resolving and checking every reference
//! - Feeding same-host targets back into the frontier
//! - Accumulating the checked links into a [`CrawlReport`]

use crate::config::Config;
use crate::crawler::cache::StatusCache;
use crate::crawler::checker::LinkChecker;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{extract_links, tag_events, ElementAttributeTable};
use crate::state::{Link, ResolvedUrl, Status};
use crate::url::{is_same_host, resolve, Resolution};
use crate::BlcError;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::io::Write;
use std::sync::Arc;
use url::Url;

/// Outcome of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed URL the crawl started from
    pub seed: Url,

    /// Every recorded link, in discovery order
    pub links: Vec<Link>,

    /// Number of pages dequeued and fetched
    pub pages_crawled: usize,

    /// Number of link-check requests sent over the network
    pub requests_issued: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Links whose status is not acceptable, in discovery order
    pub fn broken_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.is_broken())
    }

    pub fn has_broken_links(&self) -> bool {
        self.broken_links().next().is_some()
    }

    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    seed: Url,
    client: Client,
    checker: LinkChecker,
    frontier: Frontier,
    table: ElementAttributeTable,
    links: Vec<Link>,
    pages_crawled: usize,
    progress: Box<dyn Write + Send + Sync>,
}

/// Parses and validates the seed URL
///
/// The seed must be absolute, have a host and resolve as crawlable;
/// anything else is fatal.
fn parse_seed(seed: &str) -> Result<Url, BlcError> {
    let seed = seed.trim();
    let url = Url::parse(seed).map_err(|e| BlcError::InvalidSeed {
        url: seed.to_string(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none() {
        return Err(BlcError::InvalidSeed {
            url: seed.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    match resolve(&url, seed) {
        Resolution::Crawlable(_) => Ok(url),
        other => Err(BlcError::InvalidSeed {
            url: seed.to_string(),
            reason: format!("not crawlable ({:?})", other.classification()),
        }),
    }
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seed` - The URL the crawl starts from
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(BlcError::InvalidSeed)` - The seed is not a crawlable absolute URL with a host
    /// * `Err(BlcError::Reqwest)` - The HTTP client could not be built
    pub fn new(config: Config, seed: &str) -> Result<Self, BlcError> {
        Self::with_cache(config, seed, Arc::new(StatusCache::new()))
    }

    /// Creates a coordinator that checks links through an existing cache
    pub fn with_cache(
        config: Config,
        seed: &str,
        cache: Arc<StatusCache>,
    ) -> Result<Self, BlcError> {
        let seed = parse_seed(seed)?;

        let client = build_http_client(&config.user_agent, config.crawler.request_timeout)?;
        let checker = LinkChecker::new(client.clone(), cache);
        let frontier = Frontier::new(seed.as_str());
        let table = ElementAttributeTable::preset(config.crawler.element_table);

        Ok(Self {
            config,
            seed,
            client,
            checker,
            frontier,
            table,
            links: Vec::new(),
            pages_crawled: 0,
            progress: Box::new(std::io::stdout()),
        })
    }

    /// Redirects the per-page progress lines (stdout by default)
    pub fn with_progress(mut self, progress: Box<dyn Write + Send + Sync>) -> Self {
        self.progress = progress;
        self
    }

    /// The parsed seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Runs the main crawl loop
    ///
    /// Pages are visited in strict breadth-first order until the frontier is
    /// empty or the configured page limit is reached. Per-page and per-link
    /// failures are absorbed into link statuses; only writing progress output
    /// can fail.
    pub async fn run(&mut self) -> Result<CrawlReport, BlcError> {
        let started_at = Utc::now();
        tracing::info!("Starting crawl from {}", self.seed);

        while let Some(raw) = self.frontier.dequeue() {
            if self.page_limit_reached() {
                tracing::info!(
                    "Page limit of {} reached, {} URLs left in frontier",
                    self.config.crawler.max_pages,
                    self.frontier.len() + 1
                );
                break;
            }

            let page = match resolve(&self.seed, &raw) {
                Resolution::Crawlable(page) => page,
                other => {
                    tracing::debug!(
                        "Skipping non-crawlable frontier entry {} ({:?})",
                        raw,
                        other.classification()
                    );
                    continue;
                }
            };

            if !self.frontier.mark_visited(&page.resolved) {
                tracing::debug!("Already crawled {}", page.resolved);
                continue;
            }

            writeln!(
                self.progress,
                "[{}]: Crawling {}",
                self.frontier.len() + 1,
                page.resolved
            )?;

            self.crawl_page(page).await;
            self.pages_crawled += 1;
        }

        let report = CrawlReport {
            seed: self.seed.clone(),
            links: std::mem::take(&mut self.links),
            pages_crawled: self.pages_crawled,
            requests_issued: self.checker.requests_issued(),
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl completed: {} pages, {} links, {} requests in {}ms",
            report.pages_crawled,
            report.links.len(),
            report.requests_issued,
            report.duration().num_milliseconds()
        );

        Ok(report)
    }

    fn page_limit_reached(&self) -> bool {
        let limit = self.config.crawler.max_pages as usize;
        limit > 0 && self.pages_crawled >= limit
    }

    /// Fetches one page, checks its links and enqueues same-host targets
    async fn crawl_page(&mut self, page: ResolvedUrl) {
        tracing::debug!("Crawling page {}", page.resolved);

        let (page, body) = match fetch_page(&self.client, &page.final_url).await {
            FetchResult::Success {
                final_url, body, ..
            } => {
                if final_url != page.final_url && !self.frontier.mark_visited(&final_url) {
                    tracing::debug!(
                        "{} redirected to already crawled {}",
                        page.resolved,
                        final_url
                    );
                    return;
                }
                (page.with_final(final_url), body)
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!(
                    "Not extracting links from {}: content type {}",
                    page.resolved,
                    content_type
                );
                return;
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Failed to crawl {}: HTTP {}", page.resolved, status_code);
                return;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to crawl {}: {}", page.resolved, error);
                return;
            }
        };

        let references: Vec<String> = extract_links(tag_events(&body), &self.table).collect();
        tracing::debug!("Found {} references on {}", references.len(), page.resolved);

        let resolutions: Vec<Resolution> = references
            .iter()
            .map(|raw| resolve(&page.final_url, raw))
            .collect();

        let links = self.check_all(&page, resolutions).await;

        for link in &links {
            let target = &link.target.final_url;
            if matches!(target.scheme(), "http" | "https") && is_same_host(target, &self.seed) {
                tracing::trace!("Adding to frontier: {}", target);
                self.frontier.enqueue(target.as_str());
            }
        }

        self.links.extend(links);
    }

    /// Turns resolved references into links, checking crawlable targets
    ///
    /// Up to `max-concurrent-checks` checks run at once; the output keeps the
    /// order of the input. Invalid references are dropped.
    async fn check_all(&self, page: &ResolvedUrl, resolutions: Vec<Resolution>) -> Vec<Link> {
        let checker = &self.checker;
        let limit = self.config.crawler.max_concurrent_checks.max(1) as usize;

        stream::iter(resolutions)
            .map(|resolution| async move {
                match resolution {
                    Resolution::Crawlable(target) => Some(checker.check(page, &target).await),
                    Resolution::Phone(target) => {
                        Some(Link::new(Status::Phone, page.clone(), target))
                    }
                    Resolution::Mailto(target) => {
                        Some(Link::new(Status::Mailto, page.clone(), target))
                    }
                    Resolution::Invalid => {
                        tracing::debug!("Dropping invalid reference on {}", page.resolved);
                        None
                    }
                }
            })
            .buffered(limit)
            .filter_map(|link| async move { link })
            .collect()
            .await
    }
}

/// Runs a complete crawl from `seed`
///
/// # Example
///
/// ```no_run
/// use sumi_blc::config::Config;
/// use sumi_blc::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default(), "https://example.com/").await?;
/// println!("total links: {}", report.links.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, seed: &str) -> Result<CrawlReport, BlcError> {
    let mut coordinator = Coordinator::new(config, seed)?;
    coordinator.run().await
}
