crate::config_group!({

    /// Default log filter directive.  `RUST_LOG`, when set, takes precedence.
    ///
    /// Use the environment variable `PARTMERGE_LOG_LEVEL` to set this value.
    ref level: String = "info".to_string();

    /// Output format: "compact" for human readable lines, "json" for one JSON object per event.
    ///
    /// Use the environment variable `PARTMERGE_LOG_FORMAT` to set this value.
    ref format: String = "compact".to_string();
});
