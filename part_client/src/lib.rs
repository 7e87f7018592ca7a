pub use http_client::build_http_client;
pub use interface::{FetchOptions, FetchResponse, Fetcher};
pub use local_client::LocalFetcher;
pub use object_urls::{OBJECT_URL_SCHEME, ObjectUrlFetcher, ObjectUrlStore};
pub use remote_client::RemoteFetcher;
use tracing::Level;

pub use crate::error::{PartClientError, Result};

mod error;
pub mod http_client;
mod interface;
mod local_client;
pub mod object_urls;
pub mod remote_client;

pub mod client_testing_utils;

#[cfg(not(feature = "elevated_information_level"))]
pub const INFORMATION_LOG_LEVEL: Level = Level::DEBUG;

#[cfg(feature = "elevated_information_level")]
pub const INFORMATION_LOG_LEVEL: Level = Level::INFO;
