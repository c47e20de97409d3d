//! Fetcher configuration

use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default pause between retry attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Settings for [`HttpFetcher`](crate::HttpFetcher)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Whole-request timeout (connect + body)
    pub timeout: Duration,

    /// Value sent in the `User-Agent` header
    pub user_agent: String,

    /// Extra attempts after a retryable failure (0 = single attempt)
    pub max_retries: u32,

    /// Delay between attempts
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("dlcache/", env!("CARGO_PKG_VERSION")).to_string(),
            max_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl FetchConfig {
    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry count and the delay between attempts
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Total attempts a single fetch may make
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
