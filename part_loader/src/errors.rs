use http::StatusCode;
use part_client::PartClientError;
use part_merge::MergeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Merge error: {0}")]
    MergeError(#[from] MergeError),

    #[error("Part client error: {0}")]
    PartClientError(#[from] PartClientError),

    #[error("Resource {name} unavailable (status {status})")]
    ResourceUnavailable { name: String, status: StatusCode },

    #[error("Invalid output path for {0}")]
    InvalidOutputPath(String),

    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LoaderError>;
