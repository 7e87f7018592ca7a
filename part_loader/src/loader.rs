use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use part_client::{FetchOptions, Fetcher};
use part_merge::{FetchEntryPoint, MergeCompletion, MergeOrchestrator};
use tracing::{info, instrument};

use crate::configurations::LoaderConfig;
use crate::errors::*;
use crate::remote_client_interface::create_fetcher;

/// A merged asset written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: usize,
}

/// Owns the fetch entry point for one endpoint and runs the merge plan against it.
pub struct PartLoader {
    config: Arc<LoaderConfig>,
    entry_point: Arc<FetchEntryPoint>,
    completion: OnceLock<MergeCompletion>,
}

impl PartLoader {
    pub fn new(config: Arc<LoaderConfig>) -> Result<Self> {
        let fetcher = create_fetcher(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Create a loader on top of an existing fetcher, ignoring the configured endpoint.
    pub fn with_fetcher(config: Arc<LoaderConfig>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            entry_point: FetchEntryPoint::new(fetcher),
            completion: OnceLock::new(),
        }
    }

    /// The entry point all resource requests should go through.
    pub fn entry_point(&self) -> Arc<FetchEntryPoint> {
        self.entry_point.clone()
    }

    /// Starts merging the configured assets; later calls return the same completion signal.
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> MergeCompletion {
        self.completion
            .get_or_init(|| MergeOrchestrator::new(self.entry_point.clone(), self.config.plan.clone()).start())
            .clone()
    }

    /// Fetches a resource through the entry point, intercepted or not.
    pub async fn fetch_asset(&self, name: &str) -> Result<Bytes> {
        let response = self.entry_point.fetch(name, &FetchOptions::default()).await?;

        if !response.ok() {
            return Err(LoaderError::ResourceUnavailable {
                name: name.to_owned(),
                status: response.status(),
            });
        }

        Ok(response.into_bytes())
    }

    /// Waits for the merge and writes every merged asset under `output_dir`, at its canonical
    /// name.  The bytes are read back through the entry point.
    #[instrument(skip_all, name = "PartLoader::merge_to_directory", fields(output_dir = ?output_dir))]
    pub async fn merge_to_directory(&self, output_dir: &Path) -> Result<Vec<MergedFile>> {
        self.start().wait().await?;

        let mut written = Vec::with_capacity(self.config.plan.assets().len());

        for asset in self.config.plan.assets() {
            let name = &asset.target_name;
            let data = self.fetch_asset(name).await?;
            let path = output_dir.join(relative_output_path(name)?);

            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, &data).await?;

            info!(asset = %name, path = ?path, size = data.len(), "Wrote merged asset");

            written.push(MergedFile {
                name: name.clone(),
                path,
                size: data.len(),
            });
        }

        Ok(written)
    }
}

/// Maps a canonical asset name onto a path relative to the output directory.
fn relative_output_path(name: &str) -> Result<&Path> {
    let path = Path::new(name.trim_start_matches('/'));

    let valid = path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if valid {
        Ok(path)
    } else {
        Err(LoaderError::InvalidOutputPath(name.to_owned()))
    }
}
