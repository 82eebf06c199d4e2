//! Crawl frontier
//!
//! A FIFO queue of pending URLs plus the set of URLs already visited. One
//! frontier is created per crawl from a single seed and dropped when the
//! crawl returns.

use crate::url::has_fragment;
use std::collections::{HashSet, VecDeque};

/// Breadth-first frontier for a single crawl
#[derive(Debug, Default)]
pub struct CrawlFrontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl CrawlFrontier {
    /// Creates a frontier holding only the seed URL
    ///
    /// The seed is queued unconditionally; fragment URLs are filtered when
    /// popped, not here.
    pub fn new(seed: &str) -> Self {
        let mut frontier = Self::default();
        frontier.queue.push_back(seed.to_string());
        frontier.queued.insert(seed.to_string());
        frontier
    }

    /// Removes and returns the head of the queue
    pub fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Returns true if the URL should be skipped when popped
    pub fn should_skip(&self, url: &str) -> bool {
        self.is_visited(url) || has_fragment(url)
    }

    /// Records a visit. The visited set only grows.
    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Appends a link to the tail unless it was visited, is already queued,
    /// or carries a fragment
    ///
    /// # Returns
    ///
    /// * `true` - The link was queued
    /// * `false` - The link was filtered
    pub fn enqueue(&mut self, url: &str) -> bool {
        if has_fragment(url) || self.is_visited(url) || self.queued.contains(url) {
            tracing::trace!("Frontier skipped {}", url);
            return false;
        }

        self.queue.push_back(url.to_string());
        self.queued.insert(url.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = CrawlFrontier::new("http://a.test/");
        frontier.enqueue("http://a.test/1");
        frontier.enqueue("http://a.test/2");

        assert_eq!(frontier.pop().as_deref(), Some("http://a.test/"));
        assert_eq!(frontier.pop().as_deref(), Some("http://a.test/1"));
        assert_eq!(frontier.pop().as_deref(), Some("http://a.test/2"));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_enqueue_filters() {
        let mut frontier = CrawlFrontier::new("http://a.test/");
        frontier.mark_visited("http://a.test/seen");

        assert!(!frontier.enqueue("http://a.test/"));
        assert!(!frontier.enqueue("http://a.test/seen"));
        assert!(!frontier.enqueue("http://a.test/#top"));
        assert!(frontier.enqueue("http://a.test/new"));
        assert!(!frontier.enqueue("http://a.test/new"));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_requeue_after_pop_is_blocked_by_visit() {
        let mut frontier = CrawlFrontier::new("http://a.test/");
        let url = frontier.pop().unwrap();
        frontier.mark_visited(&url);

        assert!(frontier.is_empty());
        assert!(frontier.is_visited("http://a.test/"));
        assert!(!frontier.is_visited("http://a.test/other"));
        assert!(!frontier.enqueue("http://a.test/"));
        assert!(frontier.should_skip("http://a.test/"));
    }

    #[test]
    fn test_fragment_seed_is_skipped() {
        let frontier = CrawlFrontier::new("http://a.test/#menu");
        assert!(frontier.should_skip("http://a.test/#menu"));
        assert_eq!(frontier.visited_count(), 0);
    }
}
