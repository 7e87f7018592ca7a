#![cfg_attr(feature = "strict", deny(warnings))]

pub mod configuration_utils;
pub use configuration_utils::ParsableConfigValue;

mod unique_id;
pub use unique_id::UniqueId;
