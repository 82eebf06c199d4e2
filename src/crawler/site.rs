//! Breadth-first site crawler
//!
//! Walks one business website from a seed URL, fetching each page at most
//! once and collecting its text in visit order. The crawl is bounded by a
//! page budget and is strictly sequential.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::CrawlFrontier;
use url::Url;

/// Ordered text collected by one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedContent {
    /// `(url, text)` blocks in visit order
    pub blocks: Vec<(String, String)>,
}

impl AggregatedContent {
    /// Renders every block as `=== {url} ===\n{text}`, joined with newlines
    pub fn render(&self) -> String {
        self.blocks
            .iter()
            .map(|(url, text)| format!("=== {} ===\n{}", url, text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// URLs in the order they were visited
    pub fn visited_urls(&self) -> Vec<&str> {
        self.blocks.iter().map(|(url, _)| url.as_str()).collect()
    }

    /// Returns true if at least one page produced text
    pub fn has_text(&self) -> bool {
        self.blocks.iter().any(|(_, text)| !text.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

/// Bounded, same-site BFS over a business website
pub struct SiteCrawler<F: PageFetcher> {
    fetcher: F,
}

impl<F: PageFetcher> SiteCrawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawls from `seed_url`, visiting at most `max_pages` pages
    ///
    /// # Crawl Loop
    ///
    /// 1. Pop the head of the frontier
    /// 2. Skip it if already visited or it carries a fragment
    /// 3. Mark it visited and fetch it
    /// 4. Record its text, even when empty
    /// 5. Queue its unseen, fragment-free links at the tail
    ///
    /// The loop ends when the frontier empties or the budget is spent. The
    /// seed is queued in the same serialized form as discovered links, so
    /// `http://host` and `http://host/` are one page.
    pub async fn crawl(&self, seed_url: &str, max_pages: usize) -> AggregatedContent {
        let seed = Url::parse(seed_url)
            .map(String::from)
            .unwrap_or_else(|_| seed_url.to_string());
        let mut frontier = CrawlFrontier::new(&seed);
        let mut content = AggregatedContent::default();

        while frontier.visited_count() < max_pages {
            let Some(url) = frontier.pop() else {
                break;
            };

            if frontier.should_skip(&url) {
                tracing::trace!("Skipping {}", url);
                continue;
            }

            frontier.mark_visited(&url);
            tracing::debug!(
                url = %url,
                visited = frontier.visited_count(),
                budget = max_pages,
                "Fetching page"
            );

            let page = self.fetcher.fetch(&url).await;

            let mut queued = 0;
            for link in &page.links {
                if frontier.enqueue(link) {
                    queued += 1;
                }
            }
            tracing::trace!("{} new links queued from {}", queued, url);

            content.blocks.push((url, page.text));
        }

        tracing::info!(
            seed = %seed_url,
            pages = content.len(),
            "Crawl finished"
        );

        content
    }
}
