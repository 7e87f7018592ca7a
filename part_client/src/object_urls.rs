//! In-memory object urls.
//!
//! An [`ObjectUrlStore`] mints opaque `blob:` urls for immutable byte buffers, and an
//! [`ObjectUrlFetcher`] dereferences them, passing every other request through to the
//! wrapped fetcher.  Together they make an in-memory buffer addressable through the same
//! fetch capability as any network resource.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use http::StatusCode;
use tracing::debug;
use utils::UniqueId;

use crate::error::{PartClientError, Result};
use crate::interface::{FetchOptions, FetchResponse, Fetcher};

pub const OBJECT_URL_SCHEME: &str = "blob:";

const OBJECT_URL_PREFIX: &str = "blob:part-merge/";

#[derive(Default)]
pub struct ObjectUrlStore {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl ObjectUrlStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a buffer and returns the url under which it can be fetched.  Buffers live
    /// until revoked.
    pub fn create_object_url(&self, data: Bytes) -> String {
        let url = format!("{OBJECT_URL_PREFIX}{}", UniqueId::new());
        debug!(%url, len = data.len(), "Created object url");
        self.objects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(url.clone(), data);
        url
    }

    pub fn get(&self, url: &str) -> Option<Bytes> {
        self.objects
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(url)
            .cloned()
    }

    /// Releases the buffer behind an object url.  Returns false if the url was unknown.
    pub fn revoke_object_url(&self, url: &str) -> bool {
        self.objects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(url)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn is_object_url(resource: &str) -> bool {
    resource.starts_with(OBJECT_URL_SCHEME)
}

/// Wraps a fetcher so that object urls from the store resolve to their buffers.
pub struct ObjectUrlFetcher {
    store: Arc<ObjectUrlStore>,
    inner: Arc<dyn Fetcher>,
}

impl ObjectUrlFetcher {
    pub fn new(store: Arc<ObjectUrlStore>, inner: Arc<dyn Fetcher>) -> Arc<Self> {
        Arc::new(Self { store, inner })
    }

    pub fn store(&self) -> &Arc<ObjectUrlStore> {
        &self.store
    }
}

#[async_trait::async_trait]
impl Fetcher for ObjectUrlFetcher {
    async fn fetch(&self, resource: &str, options: &FetchOptions) -> Result<FetchResponse> {
        if !is_object_url(resource) {
            return self.inner.fetch(resource, options).await;
        }

        // Like a revoked blob url in a browser, an unknown object url is a transport error.
        let data = self
            .store
            .get(resource)
            .ok_or_else(|| PartClientError::ObjectUrlNotFound(resource.to_owned()))?;

        Ok(FetchResponse::new(resource, StatusCode::OK, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_testing_utils::ScriptedFetcher;

    #[tokio::test]
    async fn test_object_url_round_trip() {
        let store = ObjectUrlStore::new();
        let inner = ScriptedFetcher::new();
        let fetcher = ObjectUrlFetcher::new(store.clone(), inner.clone());

        let url = store.create_object_url(Bytes::from_static(b"merged"));
        assert!(is_object_url(&url));

        let response = fetcher.fetch(&url, &FetchOptions::default()).await.unwrap();
        assert!(response.ok());
        assert_eq!(response.url(), url);
        assert_eq!(&response.into_bytes()[..], b"merged");

        // The inner fetcher never saw the object url.
        assert!(inner.requests().is_empty());
    }

    #[tokio::test]
    async fn test_other_requests_pass_through() {
        let store = ObjectUrlStore::new();
        let inner = ScriptedFetcher::new().with_resource("index.html", b"<html/>");
        let fetcher = ObjectUrlFetcher::new(store, inner.clone());

        let response = fetcher.fetch("index.html", &FetchOptions::default()).await.unwrap();
        assert_eq!(&response.into_bytes()[..], b"<html/>");
        assert_eq!(inner.requests(), vec!["index.html".to_string()]);
    }

    #[tokio::test]
    async fn test_revoked_url_fails() {
        let store = ObjectUrlStore::new();
        let fetcher = ObjectUrlFetcher::new(store.clone(), ScriptedFetcher::new());

        let url = store.create_object_url(Bytes::from_static(b"x"));
        assert_eq!(store.len(), 1);
        assert!(store.revoke_object_url(&url));
        assert!(!store.revoke_object_url(&url));
        assert!(store.is_empty());

        let result = fetcher.fetch(&url, &FetchOptions::default()).await;
        assert!(matches!(result, Err(PartClientError::ObjectUrlNotFound(_))));
    }

    #[test]
    fn test_urls_are_unique() {
        let store = ObjectUrlStore::new();
        let a = store.create_object_url(Bytes::new());
        let b = store.create_object_url(Bytes::new());
        assert_ne!(a, b);
    }
}
