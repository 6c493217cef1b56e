// ABOUTME: Scraping library for the IGP reported-earthquakes page.
// ABOUTME: Re-exports the record model, row extractor, normalizer and fetch client.

//! Fetches the table of recently reported seismic events and turns each row
//! into a [`Record`].
//!
//! ```no_run
//! use sismos_scrape::Client;
//!
//! let client = Client::builder().build().expect("default options are valid");
//! for record in client.fetch_latest(10) {
//!     println!("{} {} {}", record.timestamp_text, record.magnitude_text, record.reference);
//! }
//! ```

pub mod client;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod options;
pub mod resource;

pub use crate::client::{records_from_html, Client};
pub use crate::error::{RowError, ScrapeError};
pub use crate::extract::extract_rows;
pub use crate::models::{RawRow, Record};
pub use crate::normalize::{normalize, normalize_reference, resolve_report_url};
pub use crate::options::{ClientBuilder, FetchOptions, BASE_URL, DEFAULT_TIMEOUT, TARGET_URL};
