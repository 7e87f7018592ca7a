use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while merging split assets.
///
/// Cloneable so a single failure can be handed to every waiter on the completion signal.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum MergeError {
    #[error("Part Client Error: {0}")]
    PartClientError(Arc<part_client::PartClientError>),

    #[error("Segment unavailable: {0}")]
    SegmentUnavailable(String),

    #[error("Segment has no candidate names")]
    EmptySegment,

    #[error("Merging {asset} failed: {source}")]
    TaskFailed {
        asset: String,
        #[source]
        source: Box<MergeError>,
    },

    #[error("Interception is already installed")]
    AlreadyInstalled,

    #[error("Internal Error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, MergeError>;

impl From<part_client::PartClientError> for MergeError {
    fn from(err: part_client::PartClientError) -> Self {
        MergeError::PartClientError(Arc::new(err))
    }
}

impl MergeError {
    pub fn task_failed(asset: impl Into<String>, source: MergeError) -> Self {
        MergeError::TaskFailed {
            asset: asset.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through task failure wrappers.
    pub fn root_cause(&self) -> &MergeError {
        match self {
            MergeError::TaskFailed { source, .. } => source.root_cause(),
            e => e,
        }
    }
}
