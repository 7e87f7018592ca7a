use std::time::Duration;

use tracing::warn;

/// A value that can be read from a user supplied string, e.g. an environment variable.
///
/// `parse` falls back to the default (with a warning) when the value is present but cannot be
/// interpreted, so a typo in an environment variable never aborts startup.
pub trait ParsableConfigValue: Sized {
    fn parse_user_value(value: &str) -> Option<Self>;

    fn parse(variable_name: &str, value: Option<String>, default: Self) -> Self {
        let Some(value) = value else {
            return default;
        };

        match Self::parse_user_value(value.trim()) {
            Some(v) => v,
            None => {
                warn!("Configuration value {value:?} for {variable_name} could not be parsed; using default.");
                default
            },
        }
    }
}

impl ParsableConfigValue for String {
    fn parse_user_value(value: &str) -> Option<Self> {
        Some(value.to_owned())
    }
}

impl ParsableConfigValue for bool {
    fn parse_user_value(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "on" => Some(true),
            "0" | "false" | "no" | "n" | "off" => Some(false),
            _ => None,
        }
    }
}

macro_rules! impl_parsable_int {
    ($($t:ty),+) => {
        $(
            impl ParsableConfigValue for $t {
                fn parse_user_value(value: &str) -> Option<Self> {
                    value.replace('_', "").parse::<$t>().ok()
                }
            }
        )+
    };
}

impl_parsable_int!(u16, u32, u64, usize);

/// Durations are given as an integer with an optional unit suffix: `ms`, `s`, `m` or `h`.
/// A bare integer is interpreted as seconds.
impl ParsableConfigValue for Duration {
    fn parse_user_value(value: &str) -> Option<Self> {
        let split = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
        let (digits, unit) = value.split_at(split);
        let n: u64 = digits.parse().ok()?;

        match unit.trim() {
            "ms" => Some(Duration::from_millis(n)),
            "" | "s" => Some(Duration::from_secs(n)),
            "m" => Some(Duration::from_secs(n.checked_mul(60)?)),
            "h" => Some(Duration::from_secs(n.checked_mul(3600)?)),
            _ => None,
        }
    }
}
