use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use part_client::Fetcher;
use tracing::{info, instrument};

use crate::candidates::Segment;
use crate::error::Result;
use crate::segment_resolver::SegmentResolver;

/// The contiguous buffer produced by a completed merge.  Immutable once created.
#[derive(Debug, Clone)]
pub struct ReconstructedAsset {
    name: String,
    data: Bytes,
}

impl ReconstructedAsset {
    /// The canonical name the asset was merged for.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// Reassembles one split asset by resolving its segments strictly in order and concatenating
/// the results.
pub struct FileMerger {
    resolver: SegmentResolver,
    name: String,
    segments: Vec<Segment>,
}

impl FileMerger {
    pub fn new(fetcher: Arc<dyn Fetcher>, name: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            resolver: SegmentResolver::new(fetcher),
            name: name.into(),
            segments,
        }
    }

    /// Runs the merge.  Segment k+1 is not requested until segment k is in hand; the first
    /// unavailable segment aborts the merge and nothing after it is requested.
    #[instrument(skip_all, name = "FileMerger::run", fields(asset = %self.name))]
    pub async fn run(self) -> Result<ReconstructedAsset> {
        let Self { resolver, name, segments } = self;

        let n_segments = segments.len();
        let mut chunks: Vec<Bytes> = Vec::with_capacity(n_segments);
        let mut total_size: usize = 0;

        for (index, segment) in segments.iter().enumerate() {
            let chunk = resolver.resolve(segment).await?;

            info!(part = index + 1, of = n_segments, bytes = chunk.len(), "Loaded part");

            total_size += chunk.len();
            chunks.push(chunk);
        }

        let mut merged = BytesMut::with_capacity(total_size);
        for chunk in &chunks {
            merged.extend_from_slice(chunk);
        }
        debug_assert_eq!(merged.len(), total_size);

        info!(total_size, "Merged file total size");

        Ok(ReconstructedAsset {
            name,
            data: merged.freeze(),
        })
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use part_client::client_testing_utils::{ScriptedFetcher, ScriptedOutcome, random_bytes};

    use super::*;
    use crate::candidates::part_segments;
    use crate::error::MergeError;

    fn scripted_parts(file: &str, sizes: &[usize], seed: u64) -> (Arc<ScriptedFetcher>, Vec<u8>) {
        let fetcher = ScriptedFetcher::new();
        let mut expected = Vec::new();
        for (i, &size) in sizes.iter().enumerate() {
            let data = random_bytes(size, seed + i as u64);
            expected.extend_from_slice(&data);
            fetcher.set_outcome(format!("{file}.part{}", i + 1), ScriptedOutcome::Body(data.into()));
        }
        (fetcher, expected)
    }

    #[tokio::test]
    async fn test_merge_concatenates_in_order() {
        let (fetcher, expected) = scripted_parts("Build/WebGL.data", &[100, 200, 50], 1);

        let asset = FileMerger::new(fetcher.clone(), "Build/WebGL.data", part_segments("Build/WebGL.data", 1, 3))
            .run()
            .await
            .unwrap();

        assert_eq!(asset.name(), "Build/WebGL.data");
        assert_eq!(asset.len(), 350);
        assert_eq!(&asset.data()[..], &expected[..]);
        assert_eq!(
            fetcher.requests(),
            vec!["Build/WebGL.data.part1", "Build/WebGL.data.part2", "Build/WebGL.data.part3"]
        );
    }

    #[tokio::test]
    async fn test_merge_uses_padded_mirrors() {
        let fetcher = ScriptedFetcher::new()
            .with_resource("a.part01", b"AA")
            .with_resource("a.part2", b"B")
            .with_resource("a.part03", b"CCC");

        let asset = FileMerger::new(fetcher, "a", part_segments("a", 1, 3)).run().await.unwrap();
        assert_eq!(&asset.into_bytes()[..], b"AABCCC");
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_segments() {
        let (fetcher, _) = scripted_parts("a", &[10, 10, 10, 10], 5);
        fetcher.set_outcome("a.part2", ScriptedOutcome::Status(StatusCode::NOT_FOUND));

        let err = FileMerger::new(fetcher.clone(), "a", part_segments("a", 1, 4))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, MergeError::SegmentUnavailable(ref name) if name == "a.part2"));
        assert_eq!(fetcher.requests(), vec!["a.part1", "a.part2", "a.part02"]);
        assert_eq!(fetcher.request_count("a.part3"), 0);
    }

    #[tokio::test]
    async fn test_no_segments_gives_empty_asset() {
        let asset = FileMerger::new(ScriptedFetcher::new(), "empty", vec![]).run().await.unwrap();
        assert!(asset.is_empty());
    }

    #[tokio::test]
    async fn test_many_parts_total_size() {
        let sizes: Vec<usize> = (0..12).map(|i| 17 * i + 3).collect();
        let (fetcher, expected) = scripted_parts("big.bin", &sizes, 42);

        let asset = FileMerger::new(fetcher, "big.bin", part_segments("big.bin", 1, 12))
            .run()
            .await
            .unwrap();

        assert_eq!(asset.len(), sizes.iter().sum::<usize>());
        assert_eq!(&asset.data()[..], &expected[..]);
    }
}
