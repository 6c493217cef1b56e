// ABOUTME: Keyed-store sink: assigns random ids and writes the whole batch to a remote table.
// ABOUTME: Ids reach the caller's records only after the batch is fully accepted.

use sismos_scrape::Record;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::SinkError;
use crate::sink::{Sink, SinkKind};
use crate::table::TableClient;

/// Persists batches into a named remote table.
#[derive(Debug, Clone)]
pub struct KeyedStoreSink<C> {
    client: C,
    table: String,
}

impl<C: TableClient> KeyedStoreSink<C> {
    pub fn new(client: C, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

/// Gives every record without an id a fresh random UUID. Returns how many were assigned.
pub fn assign_ids(records: &mut [Record]) -> usize {
    let mut assigned = 0;
    for record in records.iter_mut().filter(|r| r.id.is_none()) {
        record.id = Some(Uuid::new_v4().to_string());
        assigned += 1;
    }
    assigned
}

impl<C: TableClient> Sink for KeyedStoreSink<C> {
    fn kind(&self) -> SinkKind {
        SinkKind::KeyedStore
    }

    fn persist(&self, records: &mut [Record]) -> Result<(), SinkError> {
        if records.is_empty() {
            info!(table = %self.table, "no records to write to store");
            return Ok(());
        }

        let mut staged = records.to_vec();
        assign_ids(&mut staged);

        if let Err(err) = self.client.batch_put(&self.table, &staged) {
            error!(table = %self.table, error = %err, "failed to write batch to store");
            return Err(err.into());
        }

        records.clone_from_slice(&staged);
        info!(count = records.len(), table = %self.table, "records saved to store");
        Ok(())
    }
}
