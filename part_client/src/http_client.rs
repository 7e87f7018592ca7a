use merge_config::ClientConfig;
use reqwest::Client;
use tracing::debug;

use crate::error::Result;

/// Builds the http client used for part requests from the client configuration.
///
/// No retry middleware is attached: a failed request is reported to the caller, which
/// decides whether another candidate name should be tried.
pub fn build_http_client(config: &ClientConfig) -> Result<Client> {
    debug!(
        user_agent = %config.user_agent,
        connect_timeout = ?config.connect_timeout,
        request_timeout = ?config.request_timeout,
        "Building http client"
    );

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()?;

    Ok(client)
}
