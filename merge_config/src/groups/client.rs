use std::time::Duration;

crate::config_group!({

    /// The user agent sent with every part request.
    ///
    /// Use the environment variable `PARTMERGE_CLIENT_USER_AGENT` to set this value.
    ref user_agent: String = concat!("part-merge/", env!("CARGO_PKG_VERSION")).to_string();

    /// The maximum time to wait for a connection to the part server to be established.
    ///
    /// The default value is 30 seconds.
    ///
    /// Use the environment variable `PARTMERGE_CLIENT_CONNECT_TIMEOUT` to set this value.
    ref connect_timeout: Duration = Duration::from_secs(30);

    /// The maximum time a single part request may take, including reading the body.
    ///
    /// The default value is 10 minutes.
    ///
    /// Use the environment variable `PARTMERGE_CLIENT_REQUEST_TIMEOUT` to set this value.
    ref request_timeout: Duration = Duration::from_secs(600);
});
