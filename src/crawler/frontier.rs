//! Breadth-first crawl frontier
//!
//! A FIFO queue of raw URL strings paired with the set of pages already
//! crawled. Enqueue never deduplicates; callers skip visited URLs after
//! dequeuing them.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Work queue and visited set for one crawl
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be crawled, oldest first
    queue: VecDeque<String>,

    /// Fragment-less absolute URLs already crawled
    visited: HashSet<String>,
}

/// Returns the visited-set key for a URL (fragment removed)
fn visit_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);
    key.into()
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn new(seed: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(seed);
        frontier
    }

    /// Appends a URL to the back of the queue
    pub fn enqueue(&mut self, url: impl Into<String>) {
        self.queue.push_back(url.into());
    }

    /// Removes the oldest queued URL
    pub fn dequeue(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Records a page as crawled
    ///
    /// Returns false if it was already visited.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(visit_key(url))
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(&visit_key(url))
    }

    /// Number of queued URLs (duplicates included)
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct pages crawled
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
