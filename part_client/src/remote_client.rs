use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lazy_static::lazy_static;
use merge_config::ClientConfig;
use reqwest::{Client, Url};
use tracing::{event, instrument};

use crate::error::{PartClientError, Result};
use crate::http_client::build_http_client;
use crate::interface::{FetchOptions, FetchResponse, Fetcher};
use crate::INFORMATION_LOG_LEVEL;

lazy_static! {
    static ref FN_CALL_ID: AtomicU64 = AtomicU64::new(1);
}

/// Fetches resources over http(s).  Relative resource names are resolved against the
/// base url; absolute urls are requested as given.
pub struct RemoteFetcher {
    base_url: Option<Url>,
    http_client: Arc<Client>,
}

impl RemoteFetcher {
    pub fn new(base_url: Option<&str>, config: &ClientConfig) -> Result<Arc<Self>> {
        let base_url = base_url.map(parse_base_url).transpose()?;
        let http_client = Arc::new(build_http_client(config)?);
        Ok(Arc::new(Self { base_url, http_client }))
    }

    /// Create a fetcher around an existing http client.
    pub fn with_client(base_url: Option<&str>, http_client: Client) -> Result<Arc<Self>> {
        let base_url = base_url.map(parse_base_url).transpose()?;
        Ok(Arc::new(Self {
            base_url,
            http_client: Arc::new(http_client),
        }))
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Resolve a resource name into the url that will be requested.
    pub fn resolve_url(&self, resource: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(resource) {
            return Ok(url);
        }

        let Some(base) = &self.base_url else {
            return Err(PartClientError::invalid_name(resource, "relative name without a base url"));
        };

        base.join(resource).map_err(|e| PartClientError::invalid_name(resource, e))
    }
}

/// Parses a base url, making sure it ends with a '/' so that joins append rather than replace
/// the last path component.
fn parse_base_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| PartClientError::invalid_name(base, e))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait::async_trait]
impl Fetcher for RemoteFetcher {
    #[instrument(skip_all, name = "RemoteFetcher::fetch", fields(resource = %resource))]
    async fn fetch(&self, resource: &str, options: &FetchOptions) -> Result<FetchResponse> {
        let call_id = FN_CALL_ID.fetch_add(1, Ordering::Relaxed);
        let url = self.resolve_url(resource)?;

        event!(INFORMATION_LOG_LEVEL, call_id, %url, "Starting fetch");

        let response = self
            .http_client
            .get(url.clone())
            .headers(options.headers.clone())
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if status.is_success() {
            event!(INFORMATION_LOG_LEVEL, call_id, %url, %status, len = body.len(), "Completed fetch");
        } else {
            event!(INFORMATION_LOG_LEVEL, call_id, %url, %status, len = body.len(), "Fetch returned non-success status");
        }

        Ok(FetchResponse::new(final_url, status, body).with_headers(headers))
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, HeaderValue, StatusCode};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn fetcher_for(server: &MockServer) -> Arc<RemoteFetcher> {
        RemoteFetcher::new(Some(&format!("{}/game", server.uri())), &ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_url() {
        let fetcher = RemoteFetcher::new(Some("http://localhost:8000/game"), &ClientConfig::default()).unwrap();

        assert_eq!(
            fetcher.resolve_url("Build/WebGL.data.part1").unwrap().as_str(),
            "http://localhost:8000/game/Build/WebGL.data.part1"
        );
        assert_eq!(
            fetcher.resolve_url("http://cdn.example.com/a.bin").unwrap().as_str(),
            "http://cdn.example.com/a.bin"
        );
    }

    #[test]
    fn test_relative_name_without_base_fails() {
        let fetcher = RemoteFetcher::new(None, &ClientConfig::default()).unwrap();
        assert!(matches!(
            fetcher.resolve_url("Build/WebGL.data"),
            Err(PartClientError::InvalidResourceName { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_success_and_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/game/Build/a.part1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 64]))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server);

        let response = fetcher.fetch("Build/a.part1", &FetchOptions::default()).await.unwrap();
        assert!(response.ok());
        assert_eq!(response.body().len(), 64);

        // Nothing mounted for this path; wiremock answers 404.
        let response = fetcher.fetch("Build/a.part2", &FetchOptions::default()).await.unwrap();
        assert!(!response.ok());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_error_response_body_is_kept() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/game/api/status"))
            .respond_with(
                ResponseTemplate::new(503)
                    .insert_header("retry-after", "120")
                    .set_body_string("maintenance page"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = fetcher_for(&server).fetch("api/status", &FetchOptions::default()).await.unwrap();
        assert!(!response.ok());
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get("retry-after").unwrap(), "120");
        assert_eq!(&response.into_bytes()[..], b"maintenance page");
    }

    #[tokio::test]
    async fn test_fetch_forwards_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/game/file.bin"))
            .and(header("x-test", "yes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("tagged"))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-test", HeaderValue::from_static("yes"));

        let response = fetcher_for(&server)
            .fetch("file.bin", &FetchOptions::new().with_headers(headers))
            .await
            .unwrap();
        assert_eq!(&response.into_bytes()[..], b"tagged");
    }

    #[tokio::test]
    async fn test_transport_error_is_err() {
        // Nothing listens on port 9 of localhost in the test environment.
        let fetcher = RemoteFetcher::new(Some("http://127.0.0.1:9/"), &ClientConfig::default()).unwrap();
        assert!(fetcher.fetch("x.part1", &FetchOptions::default()).await.is_err());
    }
}
