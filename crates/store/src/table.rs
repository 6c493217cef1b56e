// ABOUTME: Client for the remote keyed table, speaking the DynamoDB JSON BatchWriteItem protocol.
// ABOUTME: Chunks batches to the service ceiling and re-submits unprocessed items a bounded number of times.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use sismos_scrape::Record;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Largest number of put requests the store accepts in one batch call.
pub const MAX_BATCH_ITEMS: usize = 25;

/// How many times items reported back as unprocessed are re-sent.
pub const MAX_UNPROCESSED_RETRIES: usize = 3;

pub const DEFAULT_STORE_ENDPOINT: &str = "http://localhost:8000";

const BATCH_WRITE_TARGET: &str = "DynamoDB_20120810.BatchWriteItem";
const AMZ_JSON: &str = "application/x-amz-json-1.0";

/// A remote table that accepts batched puts.
pub trait TableClient {
    /// Writes every item or fails. Chunks that already succeeded are not rolled back.
    fn batch_put(&self, table: &str, items: &[Record]) -> Result<(), StoreError>;
}

impl<T: TableClient + ?Sized> TableClient for &T {
    fn batch_put(&self, table: &str, items: &[Record]) -> Result<(), StoreError> {
        (**self).batch_put(table, items)
    }
}

/// Connection settings for the keyed store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub endpoint: String,
    /// `None` keeps the HTTP client's own default.
    pub timeout: Option<Duration>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STORE_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

/// Typed attribute value as the store encodes it on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    S(String),
    #[serde(rename = "NULL")]
    Null(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct WriteRequest {
    #[serde(rename = "PutRequest")]
    put_request: PutRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PutRequest {
    #[serde(rename = "Item")]
    item: BTreeMap<String, AttributeValue>,
}

#[derive(Debug, Serialize)]
struct BatchWriteRequest<'a> {
    #[serde(rename = "RequestItems")]
    request_items: HashMap<&'a str, Vec<WriteRequest>>,
}

#[derive(Debug, Default, Deserialize)]
struct BatchWriteResponse {
    #[serde(rename = "UnprocessedItems", default)]
    unprocessed_items: HashMap<String, Vec<WriteRequest>>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceError {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(alias = "Message", default)]
    message: String,
}

/// Encodes a record as a store item. Absent optionals are written as NULL.
pub fn to_item(record: &Record) -> BTreeMap<String, AttributeValue> {
    record
        .fields()
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                Some(v) => AttributeValue::S(v.to_string()),
                None => AttributeValue::Null(true),
            };
            (name.to_string(), value)
        })
        .collect()
}

/// Blocking HTTP implementation of [`TableClient`]. Requests are not signed;
/// the endpoint is a local store or a signing proxy.
#[derive(Debug, Clone)]
pub struct HttpTableClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl HttpTableClient {
    pub fn new(opts: &StoreOptions) -> Result<Self, StoreError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| StoreError::Transport {
            endpoint: opts.endpoint.clone(),
            source,
        })?;
        Ok(Self {
            endpoint: opts.endpoint.clone(),
            http,
        })
    }

    /// Sends one batch call and returns whatever the store left unprocessed.
    fn send_batch(
        &self,
        table: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<Vec<WriteRequest>, StoreError> {
        let payload = BatchWriteRequest {
            request_items: HashMap::from([(table, requests)]),
        };
        let body = serde_json::to_vec(&payload).map_err(|e| StoreError::Encode(e.to_string()))?;

        let transport = |source| StoreError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        };
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", BATCH_WRITE_TARGET)
            .body(body)
            .send()
            .map_err(transport)?;
        let status = response.status();
        let text = response.text().map_err(transport)?;

        if !status.is_success() {
            let err: ServiceError = serde_json::from_str(&text).unwrap_or_default();
            let kind = err
                .kind
                .rsplit('#')
                .next()
                .unwrap_or_default()
                .to_string();
            return Err(StoreError::Status {
                status: status.as_u16(),
                kind,
                message: err.message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut parsed: BatchWriteResponse =
            serde_json::from_str(&text).map_err(|e| StoreError::Encode(e.to_string()))?;
        Ok(parsed.unprocessed_items.remove(table).unwrap_or_default())
    }
}

impl TableClient for HttpTableClient {
    fn batch_put(&self, table: &str, items: &[Record]) -> Result<(), StoreError> {
        for chunk in items.chunks(MAX_BATCH_ITEMS) {
            let mut pending: Vec<WriteRequest> = chunk
                .iter()
                .map(|record| WriteRequest {
                    put_request: PutRequest {
                        item: to_item(record),
                    },
                })
                .collect();

            let mut retries = 0;
            loop {
                pending = self.send_batch(table, pending)?;
                if pending.is_empty() {
                    break;
                }
                if retries == MAX_UNPROCESSED_RETRIES {
                    warn!(table, remaining = pending.len(), "store kept items unprocessed");
                    return Err(StoreError::Unprocessed {
                        remaining: pending.len(),
                    });
                }
                retries += 1;
                debug!(table, remaining = pending.len(), retries, "re-sending unprocessed items");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(n: usize) -> Record {
        Record {
            reference: format!("{n} km al N de Lima"),
            report_url: None,
            timestamp_text: "16/10/2026".into(),
            magnitude_text: "4.2".into(),
            id: Some(format!("id-{n}")),
        }
    }

    fn client(server: &MockServer) -> HttpTableClient {
        HttpTableClient::new(&StoreOptions {
            endpoint: server.url("/"),
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    #[test]
    fn item_encoding_uses_typed_attributes() {
        let item = serde_json::to_value(to_item(&record(1))).unwrap();
        assert_eq!(
            item,
            json!({
                "id": {"S": "id-1"},
                "magnitude_text": {"S": "4.2"},
                "reference": {"S": "1 km al N de Lima"},
                "report_url": {"NULL": true},
                "timestamp_text": {"S": "16/10/2026"},
            })
        );
    }

    #[test]
    fn batch_put_sends_protocol_headers_and_chunks() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/")
                .header("x-amz-target", BATCH_WRITE_TARGET)
                .header("content-type", AMZ_JSON)
                .body_includes("\"sismos\"");
            then.status(200).body("{\"UnprocessedItems\":{}}");
        });

        let items: Vec<_> = (0..30).map(record).collect();
        client(&server).batch_put("sismos", &items).unwrap();
        mock.assert_calls(2);
    }

    #[test]
    fn throttling_is_reported_as_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(400).body(
                r#"{"__type":"com.amazonaws.dynamodb.v20120810#ProvisionedThroughputExceededException","message":"slow down"}"#,
            );
        });

        let err = client(&server).batch_put("sismos", &[record(1)]).unwrap_err();
        assert!(err.is_throttled(), "unexpected error {err:?}");
        match err {
            StoreError::Status { status, message, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "slow down");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn persistent_unprocessed_items_fail_the_batch() {
        let server = MockServer::start();
        let unprocessed = json!({
            "UnprocessedItems": {
                "sismos": [{"PutRequest": {"Item": to_item(&record(1))}}]
            }
        });
        let mock = server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200).body(unprocessed.to_string());
        });

        let err = client(&server).batch_put("sismos", &[record(1)]).unwrap_err();
        assert!(matches!(err, StoreError::Unprocessed { remaining: 1 }));
        mock.assert_calls(MAX_UNPROCESSED_RETRIES + 1);
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        let client = HttpTableClient::new(&StoreOptions {
            endpoint: "http://127.0.0.1:9/".into(),
            timeout: Some(Duration::from_millis(500)),
        })
        .unwrap();
        let err = client.batch_put("sismos", &[record(1)]).unwrap_err();
        assert!(matches!(err, StoreError::Transport { .. }));
    }
}
