//! Blocking HTTP fetcher
//!
//! One GET per attempt, body decoded as text. Only `http` and `https` URLs are
//! accepted; anything else fails before touching the network.

use std::thread;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::Fetch;

/// Fetcher backed by a reusable blocking reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a fetcher with the given configuration
    ///
    /// # Arguments
    /// * `config` - Timeout, user agent and retry policy
    ///
    /// # Returns
    /// * `Result<HttpFetcher>` - Ready-to-use fetcher
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, config })
    }

    /// Get the active configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn fetch_once(&self, url: &str, parsed: &Url) -> Result<String> {
        let response = self
            .client
            .get(parsed.clone())
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        let parsed = parse_url(url)?;
        let max_attempts = self.config.max_attempts();
        let mut attempt = 1;

        loop {
            debug!("GET {} (attempt {}/{})", url, attempt, max_attempts);

            match self.fetch_once(url, &parsed) {
                Ok(body) => {
                    debug!("Fetched {} bytes from {}", body.len(), url);
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        "Fetch of {} failed (attempt {}/{}), retrying after {:?}: {}",
                        url, attempt, max_attempts, self.config.retry_delay, e
                    );
                    attempt += 1;
                    thread::sleep(self.config.retry_delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
