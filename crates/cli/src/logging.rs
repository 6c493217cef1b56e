// ABOUTME: Process-wide tracing setup for the binary.
// ABOUTME: Libraries only emit events; this installs the subscriber once, writing to stderr.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogFormat;

const DEFAULT_FILTER: &str = "sismos_cli=info,sismos_scrape=info,sismos_store=info,warn";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// Calling it again is a no-op.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    let ansi = std::io::stderr().is_terminal();

    let _ = match format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_ansi(ansi).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
}
