//! Test helpers: a scripted in-memory fetcher and deterministic random data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::{PartClientError, Result};
use crate::interface::{FetchOptions, FetchResponse, Fetcher};

/// What a [`ScriptedFetcher`] answers for a given resource name.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Body(Bytes),
    Status(StatusCode),
    /// A non-success status carrying a body, like a server error page.
    ErrorPage(StatusCode, Bytes),
    TransportError,
}

/// A fetcher with a fixed script of per-name outcomes.  Unscripted names answer 404.
/// Every request is logged in order, along with its options.
#[derive(Default)]
pub struct ScriptedFetcher {
    outcomes: Mutex<HashMap<String, ScriptedOutcome>>,
    requests: Mutex<Vec<(String, FetchOptions)>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_outcome(self: Arc<Self>, resource: impl Into<String>, outcome: ScriptedOutcome) -> Arc<Self> {
        self.set_outcome(resource, outcome);
        self
    }

    pub fn with_resource(self: Arc<Self>, resource: impl Into<String>, data: impl AsRef<[u8]>) -> Arc<Self> {
        let data = Bytes::copy_from_slice(data.as_ref());
        self.with_outcome(resource, ScriptedOutcome::Body(data))
    }

    /// Every fetch sleeps for this long before answering, giving other tasks a chance to run.
    pub fn with_delay(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn set_outcome(&self, resource: impl Into<String>, outcome: ScriptedOutcome) {
        self.outcomes.lock().unwrap().insert(resource.into(), outcome);
    }

    /// Names requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn requests_with_options(&self) -> Vec<(String, FetchOptions)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, resource: &str) -> usize {
        self.requests.lock().unwrap().iter().filter(|(r, _)| r == resource).count()
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, resource: &str, options: &FetchOptions) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push((resource.to_owned(), options.clone()));

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self.outcomes.lock().unwrap().get(resource).cloned();

        match outcome {
            Some(ScriptedOutcome::Body(data)) => Ok(FetchResponse::new(resource, StatusCode::OK, data)),
            Some(ScriptedOutcome::Status(status)) => Ok(FetchResponse::new(resource, status, Bytes::new())),
            Some(ScriptedOutcome::ErrorPage(status, body)) => Ok(FetchResponse::new(resource, status, body)),
            Some(ScriptedOutcome::TransportError) => {
                Err(PartClientError::Other(format!("scripted transport failure for {resource}")))
            },
            None => Ok(FetchResponse::not_found(resource)),
        }
    }
}

/// Deterministic pseudo-random bytes.
pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buffer = vec![0u8; len];
    rng.fill_bytes(&mut buffer);
    buffer
}
