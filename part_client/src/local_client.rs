use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;
use tracing::{debug, event};

use crate::INFORMATION_LOG_LEVEL;
use crate::error::{PartClientError, Result};
use crate::interface::{FetchOptions, FetchResponse, Fetcher};

/// Serves resources from a local directory, using the resource name as a relative path.
/// Missing files produce a 404 response rather than an error, the same way a static file
/// server would answer.
pub struct LocalFetcher {
    root: PathBuf,
    _tmp_dir: Option<TempDir>, // Kept alive for the lifetime of a temporary fetcher.
}

impl LocalFetcher {
    /// Create a fetcher hosted in a temporary directory for testing.
    pub fn temporary() -> Result<Arc<Self>> {
        let tmp_dir = TempDir::new()?;
        let root = tmp_dir.path().to_owned();
        Ok(Arc::new(Self {
            root,
            _tmp_dir: Some(tmp_dir),
        }))
    }

    /// Create a fetcher serving the given directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Arc<Self>> {
        let root = std::path::absolute(root)?;
        if !root.is_dir() {
            return Err(PartClientError::ConfigurationError(format!("{root:?} is not a directory")));
        }
        Ok(Arc::new(Self { root, _tmp_dir: None }))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a resource into the served directory, creating parent directories as needed.
    pub fn put(&self, resource: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(resource)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Maps a resource name onto a path under the root.  Names that would escape the root
    /// are rejected.
    fn path_for(&self, resource: &str) -> Result<PathBuf> {
        let relative = Path::new(resource.trim_start_matches('/'));

        if relative.as_os_str().is_empty() {
            return Err(PartClientError::invalid_name(resource, "empty resource name"));
        }

        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {},
                _ => return Err(PartClientError::invalid_name(resource, "path escapes the served directory")),
            }
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl Fetcher for LocalFetcher {
    async fn fetch(&self, resource: &str, _options: &FetchOptions) -> Result<FetchResponse> {
        let path = self.path_for(resource)?;
        let url = path.to_string_lossy().into_owned();

        match tokio::fs::read(&path).await {
            Ok(data) => {
                event!(INFORMATION_LOG_LEVEL, resource, len = data.len(), "Read local resource");
                Ok(FetchResponse::new(url, http::StatusCode::OK, Bytes::from(data)))
            },
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                debug!(resource, "Local resource not found");
                Ok(FetchResponse::not_found(url))
            },
            Err(e) => Err(e.into()),
        }
    }
}
