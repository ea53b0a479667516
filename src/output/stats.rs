//! Statistics generation from a finished crawl
//!
//! This module provides functionality for summarizing a [`CrawlReport`]
//! and displaying the summary.

use crate::crawler::CrawlReport;
use crate::url::is_same_host;
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of recorded links
    pub total_links: usize,

    /// Number of links that would be reported
    pub broken_links: usize,

    /// Links whose checked target is on the seed's host
    pub internal_links: usize,

    /// Links whose checked target is on another host (or has none)
    pub external_links: usize,

    /// Number of distinct target URLs
    pub unique_targets: usize,

    /// Count of links by status label
    pub links_by_status: BTreeMap<&'static str, usize>,

    /// Number of pages crawled
    pub pages_crawled: usize,

    /// Number of link-check requests sent
    pub requests_issued: usize,

    /// Duration of the run in milliseconds
    pub duration_ms: i64,
}

impl CrawlStatistics {
    /// Computes statistics for a finished crawl
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut links_by_status = BTreeMap::new();
        let mut targets = HashSet::new();
        let mut internal_links = 0;

        for link in &report.links {
            *links_by_status.entry(link.status.label()).or_insert(0) += 1;
            targets.insert(link.target.key());
            if is_same_host(&link.target.final_url, &report.seed) {
                internal_links += 1;
            }
        }

        Self {
            total_links: report.links.len(),
            broken_links: report.broken_links().count(),
            internal_links,
            external_links: report.links.len() - internal_links,
            unique_targets: targets.len(),
            links_by_status,
            pages_crawled: report.pages_crawled,
            requests_issued: report.requests_issued,
            duration_ms: report.duration().num_milliseconds(),
        }
    }
}

/// Writes statistics in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `out` - Destination for the output
pub fn write_statistics<W: Write>(stats: &CrawlStatistics, mut out: W) -> io::Result<()> {
    writeln!(out, "=== Crawl Statistics ===\n")?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Pages crawled: {}", stats.pages_crawled)?;
    writeln!(out, "  Total links: {}", stats.total_links)?;
    writeln!(out, "  Unique targets: {}", stats.unique_targets)?;
    writeln!(
        out,
        "  Internal / external: {} / {}",
        stats.internal_links, stats.external_links
    )?;
    writeln!(out, "  Check requests: {}", stats.requests_issued)?;
    writeln!(out, "  Duration: {:.2}s", stats.duration_ms as f64 / 1000.0)?;
    writeln!(out)?;

    writeln!(out, "Links by Status:")?;
    // Sort by count (descending), then label
    let mut status_counts: Vec<_> = stats.links_by_status.iter().collect();
    status_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (label, count) in status_counts {
        let percentage = if stats.total_links > 0 {
            (*count as f64 / stats.total_links as f64) * 100.0
        } else {
            0.0
        };
        writeln!(out, "  {}: {} ({:.1}%)", label, count, percentage)?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Broken: {} / {} links",
        stats.broken_links, stats.total_links
    )?;
    out.flush()
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) -> io::Result<()> {
    let stdout = io::stdout();
    write_statistics(stats, stdout.lock())
}
