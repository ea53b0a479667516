//! URL handling module for Sumi-BLC
//!
//! This module resolves raw attribute values into absolute URLs, classifies
//! them (crawlable, phone, mail, invalid), and compares hosts for the
//! internal/external split.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::{extract_domain, is_same_host};
pub use resolve::{resolve, Classification, Resolution};
