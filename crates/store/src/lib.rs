// ABOUTME: Persistence for scraped earthquake records.
// ABOUTME: Re-exports the Sink capability, the CSV and keyed-store sinks, and the fallback policy.

pub mod error;
pub mod keyed;
pub mod policy;
pub mod sink;
pub mod table;
pub mod tabular;

pub use crate::error::{SinkError, StoreError};
pub use crate::keyed::{assign_ids, KeyedStoreSink};
pub use crate::policy::persist_with_fallback;
pub use crate::sink::{Sink, SinkKind};
pub use crate::table::{HttpTableClient, StoreOptions, TableClient, DEFAULT_STORE_ENDPOINT};
pub use crate::tabular::{TabularSink, DEFAULT_TABULAR_PATH};
