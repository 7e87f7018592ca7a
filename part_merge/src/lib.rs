mod candidates;
mod error;
mod intercept;
mod merge_engine;
mod orchestrator;
mod segment_resolver;

pub use candidates::{DEFAULT_PART_INDEX_WIDTH, Segment, part_segments, part_segments_with_width, segment_candidates};
pub use error::{MergeError, Result};
pub use intercept::{FetchEntryPoint, InterceptRule, InterceptingFetcher};
pub use merge_engine::{FileMerger, ReconstructedAsset};
pub use orchestrator::{AssetSpec, MergeCompletion, MergeOrchestrator, MergePlan};
pub use segment_resolver::SegmentResolver;
