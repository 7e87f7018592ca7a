/// Declares the configuration group of the enclosing module as a `ConfigValueGroup` struct.
///
/// ```ignore
/// // merge_config/src/groups/assets.rs
/// crate::config_group!({
///     ref data_part_count: usize = 3;
/// });
/// ```
///
/// Field `data_part_count` in module `assets` is overridden by `PARTMERGE_ASSETS_DATA_PART_COUNT`.
/// Values that fail to parse fall back to the default with a warning.
#[macro_export]
macro_rules! config_group {
    ({
        $(
            $(#[$meta:meta])*
            ref $name:ident : $type:ty = $value:expr;
        )+
    }) => {
        #[allow(unused_imports)]
        use $crate::ParsableConfigValue;

        #[derive(Debug, Clone)]
        pub struct ConfigValueGroup {
            $(
                $(#[$meta])*
                pub $name: $type,
            )+
        }

        impl Default for ConfigValueGroup {
            fn default() -> Self {
                Self {
                    $(
                        $name: {
                            let v: $type = $value;
                            v
                        },
                    )+
                }
            }
        }

        impl ConfigValueGroup {
            /// Defaults only; the environment is not consulted.
            pub fn new() -> Self {
                Self::default()
            }

            pub fn apply_env_overrides(&mut self) {
                self.apply_overrides_from(|name| std::env::var(name).ok());
            }

            /// Reads every field from `lookup`, trying the `PARTMERGE_` name first and then its
            /// aliases.  A field with no value is reset to its default.
            pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
                $(
                    {
                        const ENV_VAR_NAME: &str = const_str::concat!(
                            "PARTMERGE_",
                            const_str::convert_ascii_case!(upper, konst::string::rsplit_once(module_path!(), "::").unwrap().1),
                            "_",
                            const_str::convert_ascii_case!(upper, stringify!($name)));

                        let mut maybe_value = lookup(ENV_VAR_NAME);

                        if maybe_value.is_none() {
                            for &(primary_name, alias_name) in $crate::ENVIRONMENT_NAME_ALIASES {
                                if primary_name == ENV_VAR_NAME {
                                    let alt_value = lookup(alias_name);
                                    if alt_value.is_some() {
                                        maybe_value = alt_value;
                                        break;
                                    }
                                }
                            }
                        }

                        let default_value: $type = $value;
                        self.$name = <$type>::parse(stringify!($name), maybe_value, default_value);
                    }
                )+
            }
        }

        pub(crate) type ConfigValues = ConfigValueGroup;
    };
}
