use std::ops::RangeInclusive;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared, TryFutureExt, join_all};
use merge_config::AssetsConfig;
use tracing::{error, info, warn};

use crate::candidates::{DEFAULT_PART_INDEX_WIDTH, Segment, part_segments_with_width};
use crate::error::{MergeError, Result};
use crate::intercept::{FetchEntryPoint, InterceptRule};
use crate::merge_engine::{FileMerger, ReconstructedAsset};

/// One logical asset to reconstruct: the canonical name requests are matched against, and the
/// ordered segments it is split into.
#[derive(Debug, Clone)]
pub struct AssetSpec {
    pub target_name: String,
    pub segments: Vec<Segment>,
}

impl AssetSpec {
    pub fn new(target_name: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            target_name: target_name.into(),
            segments,
        }
    }

    /// An asset stored as `<target_name>.part<i>` for `i` in `[start, end]`.
    pub fn from_parts(target_name: impl Into<String>, start: usize, end: usize) -> Self {
        Self::from_parts_with_width(target_name, start..=end, DEFAULT_PART_INDEX_WIDTH)
    }

    pub fn from_parts_with_width(target_name: impl Into<String>, range: RangeInclusive<usize>, width: usize) -> Self {
        let target_name = target_name.into();
        let segments = part_segments_with_width(&target_name, range, width);
        Self { target_name, segments }
    }
}

/// The set of assets merged together in one run.
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    assets: Vec<AssetSpec>,
}

impl MergePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, asset: AssetSpec) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn assets(&self) -> &[AssetSpec] {
        &self.assets
    }

    /// The data and code assets described by the configuration.  An asset configured with
    /// zero parts, or whose last part index would not fit in a `usize`, is left out of the plan.
    pub fn from_config(config: &AssetsConfig) -> Self {
        let mut plan = Self::new();

        for (name, part_count) in [
            (&config.data_asset, config.data_part_count),
            (&config.code_asset, config.code_part_count),
        ] {
            if part_count == 0 {
                warn!(asset = %name, "Asset configured with zero parts; not merging it");
                continue;
            }

            let first = config.first_part_index;
            let Some(last) = first.checked_add(part_count - 1) else {
                warn!(asset = %name, first, part_count, "Part index range overflows; not merging it");
                continue;
            };
            plan = plan.with_asset(AssetSpec::from_parts_with_width(
                name.as_str(),
                first..=last,
                config.part_index_width,
            ));
        }

        plan
    }
}

/// Awaitable outcome of a merge run started with [`MergeOrchestrator::start`].  Resolves once
/// interception is active, or with the error that stopped the run.  Clones share the outcome.
#[derive(Clone)]
pub struct MergeCompletion {
    inner: Shared<BoxFuture<'static, Result<()>>>,
}

impl MergeCompletion {
    pub async fn wait(&self) -> Result<()> {
        self.inner.clone().await
    }

    /// The outcome if the run has already finished.
    pub fn peek(&self) -> Option<Result<()>> {
        self.inner.peek().cloned()
    }
}

/// Merges every asset of a plan concurrently and, only if all of them succeed, installs
/// interception on the entry point.  On failure the entry point is left untouched.
pub struct MergeOrchestrator {
    entry_point: Arc<FetchEntryPoint>,
    plan: MergePlan,
}

impl MergeOrchestrator {
    pub fn new(entry_point: Arc<FetchEntryPoint>, plan: MergePlan) -> Self {
        Self { entry_point, plan }
    }

    /// Spawns the run on the current tokio runtime and returns its completion signal.
    pub fn start(self) -> MergeCompletion {
        let handle = tokio::spawn(self.run());

        let inner = async move {
            handle
                .await
                .map_err(|e| MergeError::InternalError(format!("merge task did not complete: {e}")))?
        }
        .boxed()
        .shared();

        MergeCompletion { inner }
    }

    pub async fn run(self) -> Result<()> {
        let Self { entry_point, plan } = self;

        info!(n_assets = plan.assets().len(), "Merging split assets");

        match Self::merge_all(&entry_point, &plan).await {
            Ok(assets) => Self::install(&entry_point, assets),
            Err(e) => {
                error!(error = %e, "Failed to merge split assets");
                Err(e)
            },
        }
    }

    /// Runs all merges to completion, polled together on the current task.  Every merge is
    /// allowed to finish even when another one has already failed.
    async fn merge_all(entry_point: &FetchEntryPoint, plan: &MergePlan) -> Result<Vec<ReconstructedAsset>> {
        let fetcher = entry_point.original();

        let merges = plan.assets().iter().map(|spec| {
            let asset = spec.target_name.clone();
            FileMerger::new(fetcher.clone(), spec.target_name.clone(), spec.segments.clone())
                .run()
                .map_err(move |e| MergeError::task_failed(asset, e))
        });

        join_all(merges).await.into_iter().collect()
    }

    fn install(entry_point: &FetchEntryPoint, assets: Vec<ReconstructedAsset>) -> Result<()> {
        let object_urls = entry_point.object_urls();

        let rules: Vec<InterceptRule> = assets
            .into_iter()
            .map(|asset| {
                let size = asset.len();
                let target_name = asset.name().to_owned();
                let url = object_urls.create_object_url(asset.into_bytes());
                InterceptRule::new(target_name, url, size)
            })
            .collect();

        if let Err(e) = entry_point.install(rules.clone()) {
            error!(error = %e, "Failed to install interception");
            for rule in &rules {
                object_urls.revoke_object_url(rule.object_url());
            }
            return Err(e);
        }

        for rule in &rules {
            info!(asset = %rule.target_name(), size = rule.size(), "Serving merged asset");
        }
        info!("Split assets merged successfully");

        Ok(())
    }
}
