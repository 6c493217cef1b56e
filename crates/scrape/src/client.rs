// ABOUTME: The fetch pipeline: GET the events page, extract rows, normalize up to a limit.
// ABOUTME: Transport failures are logged and yield no records; bad rows are skipped individually.

use tracing::{debug, info, warn};
use url::Url;

use crate::error::ScrapeError;
use crate::extract::extract_rows;
use crate::models::Record;
use crate::normalize::normalize;
use crate::options::{ClientBuilder, FetchOptions};
use crate::resource::fetch;

/// Blocking client for the reported-events page.
#[derive(Debug, Clone)]
pub struct Client {
    opts: FetchOptions,
    base_url: Url,
    http: reqwest::blocking::Client,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn new(opts: FetchOptions) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&opts.base_url)
            .map_err(|e| ScrapeError::invalid_url(&opts.base_url, e.to_string()))?;
        let http = reqwest::blocking::Client::builder()
            .user_agent(opts.user_agent.clone())
            .timeout(opts.timeout)
            .build()
            .map_err(|e| ScrapeError::from_reqwest(&opts.target_url, e))?;
        Ok(Self {
            opts,
            base_url,
            http,
        })
    }

    /// Fetches the page and returns at most `limit` records in page order.
    ///
    /// Never fails: a transport error, timeout or non-2xx status is logged and
    /// an empty collection is returned. Callers detect a degraded run by the
    /// record count.
    pub fn fetch_latest(&self, limit: usize) -> Vec<Record> {
        match self.try_fetch_latest(limit) {
            Ok(records) => records,
            Err(err) => {
                warn!(url = %self.opts.target_url, error = %err, "failed to download page");
                Vec::new()
            }
        }
    }

    /// Like [`Client::fetch_latest`] but surfaces the operation-level failure.
    pub fn try_fetch_latest(&self, limit: usize) -> Result<Vec<Record>, ScrapeError> {
        info!(url = %self.opts.target_url, limit, "fetching");
        let page = fetch(&self.http, &self.opts.target_url)?;
        debug!(
            final_url = %page.final_url,
            status = page.status,
            bytes = page.body.len(),
            "page downloaded"
        );
        Ok(records_from_html(&page.text(), &self.base_url, limit))
    }
}

/// Extracts and normalizes up to `limit` rows from an already downloaded page.
///
/// Rows that fail normalization are logged with their index and dropped; the
/// remaining records keep document order. Output depends only on the inputs.
pub fn records_from_html(html: &str, base_url: &Url, limit: usize) -> Vec<Record> {
    let rows = extract_rows(html);
    info!(rows = rows.len(), "rows found");

    rows.iter()
        .take(limit)
        .enumerate()
        .filter_map(|(i, row)| match normalize(row, base_url) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(row = i, error = %err, "skipping row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const BASE: &str = "https://ultimosismo.igp.gob.pe";

    const PAGE: &str = r#"<html><body>
        <table class="table"><thead><tr><th>Referencia</th><th>Reporte</th><th>Fecha</th><th>Magnitud</th></tr></thead>
        <tbody>
          <tr><td>27 km al S de Chilca</td><td><a href="/reporte/3">ver</a></td><td>16/10/2026 09:01</td><td>4.1</td></tr>
          <tr><td>12 km al O de Ica</td><td><a href="/reporte/2">ver</a></td><td>15/10/2026 22:40</td><td>3.8</td></tr>
          <tr><td>40 km al N de Tacna</td><td><a href="/reporte/1">ver</a></td><td>15/10/2026 03:15</td><td>5.0</td></tr>
        </tbody></table>
    </body></html>"#;

    fn client_for(server: &MockServer) -> Client {
        Client::builder()
            .target_url(server.url("/ultimo-sismo/sismos-reportados"))
            .base_url(BASE)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn fetch_latest_respects_limit_and_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/ultimo-sismo/sismos-reportados");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(PAGE);
        });

        let records = client_for(&server).fetch_latest(2);
        mock.assert();
        let refs: Vec<_> = records.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(refs, vec!["27 km al S de Chilca", "12 km al O de Ica"]);
        assert_eq!(
            records[0].report_url.as_deref(),
            Some("https://ultimosismo.igp.gob.pe/reporte/3")
        );
    }

    #[test]
    fn fetch_latest_returns_empty_on_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ultimo-sismo/sismos-reportados");
            then.status(500);
        });

        let client = client_for(&server);
        assert!(client.fetch_latest(10).is_empty());
        assert!(client.try_fetch_latest(10).unwrap_err().is_status());
    }

    #[test]
    fn zero_limit_yields_nothing() {
        let base = Url::parse(BASE).unwrap();
        assert!(records_from_html(PAGE, &base, 0).is_empty());
    }

    #[test]
    fn bad_rows_are_skipped_without_aborting() {
        let html = r#"<table class="table"><tbody>
            <tr><td>Lima</td><td></td><td>t1</td><td>4.0</td></tr>
            <tr></tr>
            <tr><td>Piura</td><td><a href="http://[::1">x</a></td><td>t2</td><td>4.5</td></tr>
            <tr><td>Cusco</td><td></td><td>t3</td></tr>
        </tbody></table>"#;
        let base = Url::parse(BASE).unwrap();
        let records = records_from_html(html, &base, 10);
        let refs: Vec<_> = records.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(refs, vec!["Lima", "Cusco"]);
        assert_eq!(records[1].magnitude_text, "");
    }

    #[test]
    fn empty_href_leaves_report_url_absent() {
        let html = r#"<table class="table"><tbody>
            <tr><td>Huaral</td><td><a href="">ver</a></td><td>t1</td><td>4.3</td></tr>
        </tbody></table>"#;
        let base = Url::parse(BASE).unwrap();
        let records = records_from_html(html, &base, 10);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].report_url, None);
    }
}
