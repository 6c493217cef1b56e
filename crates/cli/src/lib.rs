// ABOUTME: Entry layer for the earthquake collector: configuration, logging setup and the run contract.
// ABOUTME: The binary in main.rs is a thin shell over `run`.

pub mod config;
pub mod logging;
pub mod run;

pub use crate::config::{Args, LogFormat, RunConfig, DEFAULT_LIMIT};
pub use crate::logging::init_tracing;
pub use crate::run::{persist, run, RunError, RunReport};
