// ABOUTME: Configuration for the fetch pipeline: FetchOptions and the ClientBuilder.
// ABOUTME: Defaults point at the IGP reported-events page with a 10 second timeout.

use std::time::Duration;

use crate::client::Client;
use crate::error::ScrapeError;

/// Site root used to resolve relative report links.
pub const BASE_URL: &str = "https://ultimosismo.igp.gob.pe";

/// Page listing the most recently reported events.
pub const TARGET_URL: &str = "https://ultimosismo.igp.gob.pe/ultimo-sismo/sismos-reportados";

/// Default bound on the page request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration options for the fetch client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub target_url: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            target_url: TARGET_URL.to_string(),
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("sismos/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: FetchOptions,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing options block.
    pub fn options(mut self, opts: FetchOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn target_url(mut self, url: impl Into<String>) -> Self {
        self.opts.target_url = url.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.opts.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Build the Client. Fails only if the base URL is unusable or the HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<Client, ScrapeError> {
        Client::new(self.opts)
    }
}
