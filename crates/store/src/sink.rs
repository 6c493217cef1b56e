// ABOUTME: The Sink capability shared by the tabular file and the keyed store.
// ABOUTME: SinkKind names which backend ended up holding a batch.

use std::fmt;

use serde::Serialize;
use sismos_scrape::Record;

use crate::error::SinkError;

/// Which backend a batch was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    KeyedStore,
    Tabular,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SinkKind::KeyedStore => "keyed_store",
            SinkKind::Tabular => "tabular",
        };
        write!(f, "{}", s)
    }
}

/// A persistence backend for record batches.
///
/// An empty batch is always a successful no-op. Records are taken mutably
/// because a sink may attach write-time data (the keyed store's `id`); a sink
/// that fails must leave them as it found them.
pub trait Sink {
    fn kind(&self) -> SinkKind;

    fn persist(&self, records: &mut [Record]) -> Result<(), SinkError>;
}

impl<S: Sink + ?Sized> Sink for &S {
    fn kind(&self) -> SinkKind {
        (**self).kind()
    }

    fn persist(&self, records: &mut [Record]) -> Result<(), SinkError> {
        (**self).persist(records)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn kind(&self) -> SinkKind {
        (**self).kind()
    }

    fn persist(&self, records: &mut [Record]) -> Result<(), SinkError> {
        (**self).persist(records)
    }
}
