use merge_config::LogConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::errors::{LoaderError, Result};

/// Installs the global tracing subscriber, writing to stderr.  `RUST_LOG` takes precedence
/// over the configured level.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| LoaderError::ConfigError(format!("invalid log level {:?}: {e}", config.level)))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.compact().try_init(),
    };
    result.map_err(|e| LoaderError::ConfigError(format!("failed to install log subscriber: {e}")))?;

    if !matches!(config.format.as_str(), "json" | "compact") {
        warn!(format = %config.format, "Unknown log format; using compact output");
    }

    Ok(())
}
