use crate::groups;

/// Primary configuration struct containing all config sections
#[derive(Debug, Clone, Default)]
pub struct MergeConfig {
    pub client: groups::client::ConfigValues,
    pub assets: groups::assets::ConfigValues,
    pub log: groups::log::ConfigValues,
}

impl MergeConfig {
    /// Create a new MergeConfig instance with default values and apply environment variable overrides.
    /// This is equivalent to `MergeConfig::default().with_env_overrides()`.
    pub fn new() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variable overrides to all configuration sections.
    /// Environment variables follow the pattern: PARTMERGE_{GROUP_NAME}_{FIELD_NAME}
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a custom variable lookup to all configuration sections.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.client.apply_overrides_from(&lookup);
        self.assets.apply_overrides_from(&lookup);
        self.log.apply_overrides_from(&lookup);
        self
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_MERGE_CONFIG: MergeConfig = MergeConfig::new();
}

/// The process-wide configuration, read from the environment on first access.
pub fn merge_config() -> &'static MergeConfig {
    &GLOBAL_MERGE_CONFIG
}
