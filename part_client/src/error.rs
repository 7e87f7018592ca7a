use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PartClientError {
    #[error("Invalid resource name {name:?}: {reason}")]
    InvalidResourceName { name: String, reason: String },

    #[error("Reqwest Error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Object URL not found: {0}")]
    ObjectUrlNotFound(String),

    #[error("Configuration Error: {0}")]
    ConfigurationError(String),

    #[error("Other Error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PartClientError>;

impl PartClientError {
    pub fn invalid_name(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidResourceName {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
