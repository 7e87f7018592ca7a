use std::sync::Arc;

use bytes::Bytes;
use part_client::{FetchOptions, Fetcher};
use tracing::debug;

use crate::candidates::Segment;
use crate::error::{MergeError, Result};

/// Retrieves the bytes of one segment by trying its candidate names in priority order.
pub struct SegmentResolver {
    fetcher: Arc<dyn Fetcher>,
}

impl SegmentResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Returns the body of the first candidate that answers with a success status.  A
    /// non-success status and a failed request are treated alike: move on to the next name.
    /// Candidates after the first success are never requested.
    pub async fn resolve(&self, segment: &Segment) -> Result<Bytes> {
        let options = FetchOptions::default();

        for candidate in segment.candidates() {
            match self.fetcher.fetch(candidate, &options).await {
                Ok(response) if response.ok() => return Ok(response.into_bytes()),
                Ok(response) => {
                    debug!(candidate = %candidate, status = %response.status(), "Candidate unavailable");
                },
                Err(e) => {
                    debug!(candidate = %candidate, error = %e, "Candidate request failed");
                },
            }
        }

        Err(MergeError::SegmentUnavailable(segment.primary().to_owned()))
    }
}
