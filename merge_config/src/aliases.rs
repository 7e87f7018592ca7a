/// Alternate environment variable names accepted for a configuration value, as
/// `(primary_name, alias_name)` pairs.  The primary name always wins when both are set.
pub const ENVIRONMENT_NAME_ALIASES: &[(&str, &str)] = &[
    ("PARTMERGE_CLIENT_USER_AGENT", "PARTMERGE_USER_AGENT"),
    ("PARTMERGE_LOG_LEVEL", "PARTMERGE_LOG"),
];
