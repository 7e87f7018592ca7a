mod aliases;
pub use aliases::ENVIRONMENT_NAME_ALIASES;

pub mod macros;
pub mod merge_config;

pub mod groups;

// Re-exported for use inside the config_group macro.
pub use utils::ParsableConfigValue;
pub use merge_config::{MergeConfig, merge_config};

pub type ClientConfig = groups::client::ConfigValues;
pub type AssetsConfig = groups::assets::ConfigValues;
pub type LogConfig = groups::log::ConfigValues;
