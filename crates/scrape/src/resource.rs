// ABOUTME: Blocking HTTP retrieval of the source page.
// ABOUTME: Enforces scheme, status and size checks and decodes the body using charset hints.

use reqwest::blocking::Client as HttpClient;
use url::Url;

use crate::error::ScrapeError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// A successfully retrieved page.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResult {
    /// Decode the body as text, using the Content-Type charset or detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Issues a single GET. Any non-2xx status is an error.
pub fn fetch(client: &HttpClient, url: &str) -> Result<FetchResult, ScrapeError> {
    let parsed = Url::parse(url).map_err(|e| ScrapeError::invalid_url(url, e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ScrapeError::invalid_url(url, "scheme must be http or https"));
    }

    let response = client
        .get(parsed)
        .send()
        .map_err(|e| ScrapeError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ScrapeError::TooLarge {
                url: url.to_string(),
                limit: MAX_CONTENT_LENGTH,
            });
        }
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().map_err(|e| {
        if e.is_timeout() {
            ScrapeError::Timeout {
                url: url.to_string(),
            }
        } else {
            ScrapeError::Body {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ScrapeError::TooLarge {
            url: url.to_string(),
            limit: MAX_CONTENT_LENGTH,
        });
    }

    Ok(FetchResult {
        status: status.as_u16(),
        final_url,
        content_type,
        body: body.to_vec(),
    })
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type.to_lowercase().split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|c| c.trim_matches('"').trim_matches('\'').to_string())
    })
}
