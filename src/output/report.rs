//! Broken-link report
//!
//! One `[<source>] <target> - <status>` line per link that is not acceptable,
//! in discovery order, followed by `total links: <n>`.

use crate::crawler::CrawlReport;
use crate::state::Link;
use std::io::{self, Write};

/// Formats a single report line for a link
pub fn format_link(link: &Link) -> String {
    format!(
        "[{}] {} - {}",
        link.source.resolved,
        link.target.resolved,
        link.status.label()
    )
}

/// Writes the broken-link report
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `out` - Destination for the report lines
pub fn write_report<W: Write>(report: &CrawlReport, mut out: W) -> io::Result<()> {
    for link in report.broken_links() {
        writeln!(out, "{}", format_link(link))?;
    }
    writeln!(out, "total links: {}", report.links.len())?;
    out.flush()
}

/// Writes the broken-link report to stdout
pub fn print_report(report: &CrawlReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_report(report, stdout.lock())
}
