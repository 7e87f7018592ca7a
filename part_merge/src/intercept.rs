use std::sync::{Arc, OnceLock};

use part_client::{FetchOptions, FetchResponse, Fetcher, ObjectUrlFetcher, ObjectUrlStore};
use tracing::{debug, info};

use crate::error::{MergeError, Result};

/// Redirects requests whose name ends with `target_name` to the object url of a merged asset.
#[derive(Debug, Clone)]
pub struct InterceptRule {
    target_name: String,
    object_url: String,
    size: usize,
}

impl InterceptRule {
    pub fn new(target_name: impl Into<String>, object_url: impl Into<String>, size: usize) -> Self {
        Self {
            target_name: target_name.into(),
            object_url: object_url.into(),
            size,
        }
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn object_url(&self) -> &str {
        &self.object_url
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn matches(&self, resource: &str) -> bool {
        resource.ends_with(&self.target_name)
    }
}

/// A fetcher decorator serving matching requests from merged buffers.  Everything else,
/// options included, is forwarded to the original fetcher and its result returned as is.
pub struct InterceptingFetcher {
    original: Arc<dyn Fetcher>,
    rules: Vec<InterceptRule>,
}

impl InterceptingFetcher {
    /// `original` must be able to dereference the object urls named in `rules`.
    pub fn new(original: Arc<dyn Fetcher>, rules: Vec<InterceptRule>) -> Self {
        Self { original, rules }
    }

    pub fn rules(&self) -> &[InterceptRule] {
        &self.rules
    }

    fn matching_rule(&self, resource: &str) -> Option<&InterceptRule> {
        self.rules.iter().find(|rule| rule.matches(resource))
    }
}

#[async_trait::async_trait]
impl Fetcher for InterceptingFetcher {
    async fn fetch(&self, resource: &str, options: &FetchOptions) -> part_client::Result<FetchResponse> {
        match self.matching_rule(resource) {
            Some(rule) => {
                debug!(resource, asset = %rule.target_name, "Serving request from merged asset");
                self.original.fetch(&rule.object_url, options).await
            },
            None => self.original.fetch(resource, options).await,
        }
    }
}

/// The fetch entry point shared by everything that loads resources.
///
/// Starts out forwarding to the original fetcher.  Once merging succeeds, an
/// [`InterceptingFetcher`] is installed exactly once and stays active for the lifetime of the
/// entry point; there is no way to remove it.
pub struct FetchEntryPoint {
    original: Arc<dyn Fetcher>,
    object_urls: Arc<ObjectUrlStore>,
    interceptor: OnceLock<Arc<InterceptingFetcher>>,
}

impl FetchEntryPoint {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Arc<Self> {
        let object_urls = ObjectUrlStore::new();
        let original: Arc<dyn Fetcher> = ObjectUrlFetcher::new(object_urls.clone(), fetcher);
        Arc::new(Self {
            original,
            object_urls,
            interceptor: OnceLock::new(),
        })
    }

    /// The unpatched fetch path.  Object urls minted by [`Self::object_urls`] resolve through it.
    pub fn original(&self) -> Arc<dyn Fetcher> {
        self.original.clone()
    }

    pub fn object_urls(&self) -> &Arc<ObjectUrlStore> {
        &self.object_urls
    }

    pub fn is_installed(&self) -> bool {
        self.interceptor.get().is_some()
    }

    pub fn interceptor(&self) -> Option<&Arc<InterceptingFetcher>> {
        self.interceptor.get()
    }

    /// Installs the complete rule set at once.  Fails if interception is already installed.
    pub(crate) fn install(&self, rules: Vec<InterceptRule>) -> Result<()> {
        let interceptor = Arc::new(InterceptingFetcher::new(self.original.clone(), rules));
        let n_rules = interceptor.rules().len();

        self.interceptor
            .set(interceptor)
            .map_err(|_| MergeError::AlreadyInstalled)?;

        info!(n_rules, "Interception installed");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Fetcher for FetchEntryPoint {
    async fn fetch(&self, resource: &str, options: &FetchOptions) -> part_client::Result<FetchResponse> {
        match self.interceptor.get() {
            Some(interceptor) => interceptor.fetch(resource, options).await,
            None => self.original.fetch(resource, options).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{HeaderMap, HeaderValue, StatusCode};
    use part_client::client_testing_utils::{ScriptedFetcher, ScriptedOutcome};

    use super::*;

    fn entry_point_with_asset(data: &'static [u8]) -> (Arc<ScriptedFetcher>, Arc<FetchEntryPoint>, InterceptRule) {
        let network = ScriptedFetcher::new().with_resource("Build/WebGL.data", b"network copy");
        let entry_point = FetchEntryPoint::new(network.clone());
        let url = entry_point.object_urls().create_object_url(Bytes::from_static(data));
        let rule = InterceptRule::new("Build/WebGL.data", url, data.len());
        (network, entry_point, rule)
    }

    #[test]
    fn test_rule_matches_by_suffix() {
        let rule = InterceptRule::new("Build/WebGL.data", "blob:x", 0);
        assert!(rule.matches("Build/WebGL.data"));
        assert!(rule.matches("https://cdn.example.com/game/Build/WebGL.data"));
        assert!(!rule.matches("Build/WebGL.data.part1"));
        assert!(!rule.matches("Build/WebGL.wasm"));
    }

    #[tokio::test]
    async fn test_passthrough_before_install() {
        let (network, entry_point, _) = entry_point_with_asset(b"merged");

        let response = entry_point.fetch("Build/WebGL.data", &FetchOptions::default()).await.unwrap();
        assert_eq!(&response.into_bytes()[..], b"network copy");
        assert_eq!(network.requests(), vec!["Build/WebGL.data"]);
        assert!(!entry_point.is_installed());
    }

    #[tokio::test]
    async fn test_intercepts_after_install() {
        let (network, entry_point, rule) = entry_point_with_asset(b"merged");
        entry_point.install(vec![rule]).unwrap();
        assert!(entry_point.is_installed());

        let response = entry_point
            .fetch("http://host/Build/WebGL.data", &FetchOptions::default())
            .await
            .unwrap();
        assert!(response.url().starts_with("blob:"));
        assert_eq!(&response.into_bytes()[..], b"merged");

        // Unmatched requests still go to the network, unchanged.
        let response = entry_point.fetch("Build/other.bin", &FetchOptions::default()).await.unwrap();
        assert!(!response.ok());
        assert_eq!(network.requests(), vec!["Build/other.bin"]);
    }

    #[tokio::test]
    async fn test_unmatched_error_page_returned_verbatim() {
        let (network, entry_point, rule) = entry_point_with_asset(b"merged");
        network.set_outcome(
            "api/status",
            ScriptedOutcome::ErrorPage(StatusCode::SERVICE_UNAVAILABLE, Bytes::from_static(b"maintenance page")),
        );
        entry_point.install(vec![rule]).unwrap();

        let response = entry_point.fetch("api/status", &FetchOptions::default()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.url(), "api/status");
        assert_eq!(&response.into_bytes()[..], b"maintenance page");
    }

    #[tokio::test]
    async fn test_options_forwarded_unchanged() {
        let (network, entry_point, rule) = entry_point_with_asset(b"merged");
        entry_point.install(vec![rule]).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert("x-mode", HeaderValue::from_static("cors"));
        let options = FetchOptions::new().with_headers(headers);

        entry_point.fetch("index.html", &options).await.unwrap();

        let logged = network.requests_with_options();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].0, "index.html");
        assert_eq!(logged[0].1.headers.get("x-mode").unwrap(), "cors");
    }

    #[tokio::test]
    async fn test_install_only_once() {
        let (_, entry_point, rule) = entry_point_with_asset(b"merged");
        entry_point.install(vec![rule.clone()]).unwrap();
        assert!(matches!(entry_point.install(vec![rule]), Err(MergeError::AlreadyInstalled)));
        assert_eq!(entry_point.interceptor().unwrap().rules().len(), 1);
    }
}
