// ABOUTME: Primary/fallback persistence: keyed store when configured, CSV file otherwise or on failure.
// ABOUTME: Only a failing tabular sink is surfaced to the caller.

use sismos_scrape::Record;
use tracing::{error, info, warn};

use crate::error::SinkError;
use crate::sink::{Sink, SinkKind};

/// Writes `records` with the keyed sink if one is given, falling back to `tabular`.
///
/// No retries and no third option: a keyed-store failure is logged and the
/// tabular sink gets the same records; a tabular failure is returned.
pub fn persist_with_fallback<K, T>(
    records: &mut [Record],
    keyed: Option<&K>,
    tabular: &T,
) -> Result<SinkKind, SinkError>
where
    K: Sink + ?Sized,
    T: Sink + ?Sized,
{
    if let Some(primary) = keyed {
        match primary.persist(records) {
            Ok(()) => {
                info!(sink = %primary.kind(), count = records.len(), "persisted");
                return Ok(primary.kind());
            }
            Err(err) => {
                warn!(sink = %primary.kind(), error = %err, "primary sink failed, falling back");
            }
        }
    }

    match tabular.persist(records) {
        Ok(()) => {
            info!(sink = %tabular.kind(), count = records.len(), "persisted");
            Ok(tabular.kind())
        }
        Err(err) => {
            error!(sink = %tabular.kind(), error = %err, "fallback sink failed");
            Err(err)
        }
    }
}
