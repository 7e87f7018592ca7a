use std::path::PathBuf;

use merge_config::{ClientConfig, MergeConfig};
use part_merge::MergePlan;

use crate::errors::{LoaderError, Result};

/// Where the parts are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// An http(s) base url; part names are resolved relative to it.
    Server(String),
    /// A local directory; part names are relative paths inside it.
    FileSystem(PathBuf),
}

impl Endpoint {
    pub fn parse(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();

        if endpoint.is_empty() {
            return Err(LoaderError::ConfigError("empty endpoint".to_owned()));
        }

        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            Ok(Endpoint::Server(endpoint.to_owned()))
        } else if let Some(path) = endpoint.strip_prefix("file://") {
            Ok(Endpoint::FileSystem(PathBuf::from(path)))
        } else if endpoint.contains("://") {
            Err(LoaderError::ConfigError(format!("unsupported endpoint scheme in {endpoint:?}")))
        } else {
            Ok(Endpoint::FileSystem(PathBuf::from(endpoint)))
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub endpoint: Endpoint,
    pub plan: MergePlan,
    pub client: ClientConfig,
}

/// Builds a loader configuration for the given endpoint, taking the asset plan and client
/// settings from `config`.
pub fn default_config(endpoint: &str, config: &MergeConfig) -> Result<LoaderConfig> {
    Ok(LoaderConfig {
        endpoint: Endpoint::parse(endpoint)?,
        plan: MergePlan::from_config(&config.assets),
        client: config.client.clone(),
    })
}
