// ABOUTME: Error types for fetching the source page and normalizing its rows.
// ABOUTME: ScrapeError fails a whole fetch; RowError only drops a single row.

use thiserror::Error;

/// Operation-level failure while retrieving the source page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The configured URL could not be parsed or has a non-HTTP scheme.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection, TLS or protocol failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    /// The response body exceeds the size cap.
    #[error("{url} returned a body larger than {limit} bytes")]
    TooLarge { url: String, limit: usize },

    /// The response body could not be read.
    #[error("failed to read body from {url}: {reason}")]
    Body { url: String, reason: String },
}

impl ScrapeError {
    /// Maps a reqwest error, separating timeouts from other transport failures.
    pub fn from_reqwest(url: impl Into<String>, err: reqwest::Error) -> Self {
        let url = url.into();
        if err.is_timeout() {
            ScrapeError::Timeout { url }
        } else {
            ScrapeError::Transport { url, source: err }
        }
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrapeError::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScrapeError::Timeout { .. })
    }

    /// Returns true if this is a non-2xx status error.
    pub fn is_status(&self) -> bool {
        matches!(self, ScrapeError::Status { .. })
    }
}

/// Why a single table row could not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row has no data cells at all (spacer or header-only row).
    #[error("row has no cells")]
    NoCells,

    /// The row's link cannot be resolved against the base URL.
    #[error("cannot resolve link {href:?}: {reason}")]
    InvalidLink { href: String, reason: String },
}
