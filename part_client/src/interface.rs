use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::error::Result;

/// Extra per-call options for a fetch.  These are forwarded untouched by any
/// wrapping fetcher, including the interception layer.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HeaderMap,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headers(self, headers: HeaderMap) -> Self {
        Self { headers, ..self }
    }
}

/// A completed fetch.  The body is fully buffered whatever the status, so error pages
/// reach the caller intact.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl FetchResponse {
    pub fn new(url: impl Into<String>, status: StatusCode, body: Bytes) -> Self {
        Self {
            url: url.into(),
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn with_headers(self, headers: HeaderMap) -> Self {
        Self { headers, ..self }
    }

    pub fn not_found(url: impl Into<String>) -> Self {
        Self::new(url, StatusCode::NOT_FOUND, Bytes::new())
    }

    /// The url (or object url) the response was actually served from.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// True if the status is in the 2xx range.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}

/// The resource fetch capability.  Takes a resource identifier plus call options and
/// asynchronously returns a response with a status and the raw bytes.
///
/// A transport failure is an `Err`; a response with a non-success status is an `Ok` whose
/// [`FetchResponse::ok`] is false.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, resource: &str, options: &FetchOptions) -> Result<FetchResponse>;
}
