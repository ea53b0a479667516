//! State module for the values a crawl produces
//!
//! # Components
//!
//! - `Status`: The closed set of outcomes for a checked link
//! - `ResolvedUrl`: A reference resolved against the page it was found on
//! - `Link`: A checked (source page, target) pair

mod link;
mod status;

// Re-export main types
pub use link::{Link, ResolvedUrl};
pub use status::{Status, INVALID_CODE, MAILTO_CODE, PHONE_CODE};
