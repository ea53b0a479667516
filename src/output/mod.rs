//! Output module for crawl reports and statistics
//!
//! This module handles:
//! - Printing the broken-link report and total link count
//! - Computing and printing run statistics

pub mod report;
pub mod stats;

pub use report::{format_link, print_report, write_report};
pub use stats::{print_statistics, write_statistics, CrawlStatistics};
