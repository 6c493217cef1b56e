// ABOUTME: Error types for the persistence sinks and the keyed-store table client.
// ABOUTME: SinkError is what a sink reports; StoreError describes remote table failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the remote keyed store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, TLS or timeout failure.
    #[error("store request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The store rejected the request, e.g. throttling or a missing table.
    #[error("store returned HTTP {status} ({kind}): {message}")]
    Status {
        status: u16,
        kind: String,
        message: String,
    },

    /// Items were still unprocessed after the re-submission attempts.
    #[error("{remaining} items left unprocessed by the store")]
    Unprocessed { remaining: usize },

    /// The request or response body could not be (de)serialized.
    #[error("store payload error: {0}")]
    Encode(String),
}

impl StoreError {
    /// Returns true when the store signalled throttling.
    pub fn is_throttled(&self) -> bool {
        match self {
            StoreError::Status { kind, .. } => {
                kind.ends_with("ProvisionedThroughputExceededException")
                    || kind.ends_with("ThrottlingException")
                    || kind.ends_with("RequestLimitExceeded")
            }
            _ => false,
        }
    }
}

/// Failure persisting a record batch.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("csv error writing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Record at `index` exposes a different field set than the first record.
    #[error("record {index} has a different field set than the first record")]
    Heterogeneous { index: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}
