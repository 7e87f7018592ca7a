use std::sync::Arc;

use part_client::{Fetcher, LocalFetcher, RemoteFetcher};

use crate::configurations::*;
use crate::errors::Result;

pub fn create_fetcher(config: &LoaderConfig) -> Result<Arc<dyn Fetcher>> {
    match config.endpoint {
        Endpoint::Server(ref endpoint) => Ok(RemoteFetcher::new(Some(endpoint.as_str()), &config.client)?),
        Endpoint::FileSystem(ref path) => Ok(LocalFetcher::new(path)?),
    }
}
