//! A single cached document bound to one URL

use dlfetch::{Fetch, Result};
use tracing::debug;

/// One slot's worth of cache: a URL plus its content once fetched.
///
/// Content is fetched on the first [`get`](CacheEntry::get) and never changes
/// afterwards. Only reads that find content already present count as
/// accesses, so the populating read does not skew eviction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    url: String,
    content: Option<String>,
    access_count: u64,
}

impl CacheEntry {
    /// Bind a URL. Nothing is fetched until the first read.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: None,
            access_count: 0,
        }
    }

    /// Read the content, fetching it through `fetcher` on first use
    ///
    /// # Arguments
    /// * `fetcher` - Used only when the content has not been fetched yet
    ///
    /// # Returns
    /// * `Result<&str>` - The memoized content, or the fetch error. A failed
    ///   fetch leaves the entry unfetched so a later call tries again.
    pub fn get<F: Fetch + ?Sized>(&mut self, fetcher: &F) -> Result<&str> {
        let content = match self.content.take() {
            Some(content) => {
                self.access_count += 1;
                debug!("Hit {} (accessed {} times)", self.url, self.access_count);
                content
            }
            None => {
                debug!("Miss {}, fetching", self.url);
                fetcher.fetch_text(&self.url)?
            }
        };

        Ok(self.content.insert(content).as_str())
    }

    /// Number of hits served so far
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// URL this entry is bound to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Peek at the content without fetching or counting an access
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Whether the first fetch has completed
    pub fn is_fetched(&self) -> bool {
        self.content.is_some()
    }
}
