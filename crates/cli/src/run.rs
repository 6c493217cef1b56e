// ABOUTME: One collection run: fetch the latest records, then persist them with fallback.
// ABOUTME: Returns a status code, the sink used and the records for the caller to report.

use serde::Serialize;
use sismos_scrape::{Client, Record, ScrapeError};
use sismos_store::{
    persist_with_fallback, HttpTableClient, KeyedStoreSink, SinkError, SinkKind, TabularSink,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RunConfig;

/// Why a run could not complete.
#[derive(Debug, Error)]
pub enum RunError {
    /// The fetch options are unusable (bad base URL, client construction).
    #[error("invalid fetch configuration: {0}")]
    Config(#[from] ScrapeError),

    /// The CSV fallback could not be written.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Outcome of a completed run. A degraded fetch completes with `count == 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub sink: SinkKind,
    pub count: usize,
    pub body: Vec<Record>,
}

impl RunReport {
    pub fn new(sink: SinkKind, records: Vec<Record>) -> Self {
        Self {
            status_code: 200,
            sink,
            count: records.len(),
            body: records,
        }
    }
}

/// Runs fetch then persist.
pub fn run(config: &RunConfig) -> Result<RunReport, RunError> {
    let client = Client::builder().options(config.fetch.clone()).build()?;
    let records = client.fetch_latest(config.limit);
    persist(config, records)
}

/// Persists already fetched records according to `config`.
pub fn persist(config: &RunConfig, mut records: Vec<Record>) -> Result<RunReport, RunError> {
    let tabular = TabularSink::new(config.tabular_path());
    let keyed = keyed_sink(config);

    let sink = persist_with_fallback(&mut records, keyed.as_ref(), &tabular)?;
    info!(count = records.len(), sink = %sink, "run complete");
    Ok(RunReport::new(sink, records))
}

fn keyed_sink(config: &RunConfig) -> Option<KeyedStoreSink<HttpTableClient>> {
    let table = config.keyed_target()?;
    match HttpTableClient::new(&config.store) {
        Ok(client) => Some(KeyedStoreSink::new(client, table)),
        Err(err) => {
            warn!(error = %err, "cannot build store client, using csv only");
            None
        }
    }
}
