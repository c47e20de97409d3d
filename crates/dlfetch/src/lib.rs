//! # dlfetch
//!
//! Fetch layer for the dlcache slot cache.
//!
//! ## Contents
//! - [`Fetch`]: the one operation the cache needs, "give me the text at this URL"
//! - [`HttpFetcher`]: blocking HTTP(S) implementation on top of reqwest
//! - [`FetchConfig`]: timeout, user agent and retry policy
//!
//! Retries are a property of the fetcher, not the cache. With the default
//! config a fetch is attempted exactly once.

#![warn(missing_docs)]

mod config;
mod error;
mod http;

pub use config::{FetchConfig, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
pub use error::{FetchError, Result};
pub use http::HttpFetcher;

/// Something that can turn a URL into text content.
pub trait Fetch {
    /// Fetch the full text body behind `url`.
    fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Closures work as fetchers, which keeps tests and benches off the network.
impl<F> Fetch for F
where
    F: Fn(&str) -> Result<String>,
{
    fn fetch_text(&self, url: &str) -> Result<String> {
        self(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetch_via<T: Fetch>(fetcher: T, url: &str) -> Result<String> {
        fetcher.fetch_text(url)
    }

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |url: &str| -> Result<String> { Ok(format!("body of {}", url)) };
        assert_eq!(fetch_via(&fetcher, "http://a").unwrap(), "body of http://a");
        assert_eq!(fetch_via(fetcher, "http://b").unwrap(), "body of http://b");
    }

    #[test]
    fn test_boxed_fetcher() {
        let fetcher: Box<dyn Fetch> = Box::new(|url: &str| -> Result<String> {
            Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "nope".to_string(),
            })
        });
        assert!(matches!(
            fetcher.fetch_text("x"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }
}
