use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

const PREFIX: &str = "MEDIATOR_";

pub const NOTIFY_STRATEGY_KEY: &str = "MEDIATOR_NOTIFY_STRATEGY";
pub const MISSING_HANDLERS_KEY: &str = "MEDIATOR_MISSING_NOTIFICATION_HANDLERS";

/// How the handlers of one notification are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyStrategy {
    /// One after another in resolution order; the first failure stops the rest.
    #[default]
    Sequential,
    /// All at once; every handler runs to completion before failures are
    /// reported.
    Concurrent,
}

impl FromStr for NotifyStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            _ => Err(invalid(NOTIFY_STRATEGY_KEY, s, "sequential, concurrent")),
        }
    }
}

/// What `notify` does when no handler resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingHandlers {
    #[default]
    Ignore,
    /// Fail only when the registry has never heard of the notification type.
    ErrorIfUnknown,
    /// Fail whenever zero handlers resolve.
    ErrorIfEmpty,
}

impl FromStr for MissingHandlers {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "error_if_unknown" => Ok(Self::ErrorIfUnknown),
            "error_if_empty" => Ok(Self::ErrorIfEmpty),
            _ => Err(invalid(
                MISSING_HANDLERS_KEY,
                s,
                "ignore, error_if_unknown, error_if_empty",
            )),
        }
    }
}

fn invalid(key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct MediatorOptions {
    pub notify_strategy: NotifyStrategy,
    pub missing_notification_handlers: MissingHandlers,
}

impl MediatorOptions {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(&Config::new())
    }

    /// Reads the options from `config`, keeping defaults for absent keys.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if let Some(value) = config.optional(NOTIFY_STRATEGY_KEY) {
            options.notify_strategy = value.parse()?;
        }
        if let Some(value) = config.optional(MISSING_HANDLERS_KEY) {
            options.missing_notification_handlers = value.parse()?;
        }

        Ok(options)
    }
}

/// Snapshot of the `MEDIATOR_*` environment variables.
#[non_exhaustive]
pub struct Config {
    kv: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let kv = std::env::vars()
            .filter(|(k, _)| k.starts_with(PREFIX))
            .collect();

        Self { kv }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(kv: HashMap<String, String>) -> Self {
        Self { kv }
    }

    pub fn optional(&self, key: &str) -> Option<&str> {
        self.kv.get(key).map(|v| v.as_str())
    }

    pub fn require(&self, key: &str) -> anyhow::Result<&str> {
        self.optional(key)
            .ok_or_else(|| anyhow::anyhow!("required config key '{key}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(pairs: &[(&str, &str)]) -> Config {
        let kv: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_map(kv)
    }

    #[test]
    fn test_optional_returns_value_when_present() {
        let config = test_config(&[("MEDIATOR_NOTIFY_STRATEGY", "concurrent")]);
        assert_eq!(config.optional("MEDIATOR_NOTIFY_STRATEGY"), Some("concurrent"));
    }

    #[test]
    fn test_require_returns_error_when_missing() {
        let config = test_config(&[]);
        let result = config.require("MEDIATOR_MISSING_KEY");
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("MEDIATOR_MISSING_KEY"));
    }

    #[test]
    fn test_options_default_when_keys_absent() {
        let options = MediatorOptions::from_config(&test_config(&[])).unwrap();

        assert_eq!(options, MediatorOptions::default());
        assert_eq!(options.notify_strategy, NotifyStrategy::Sequential);
        assert_eq!(options.missing_notification_handlers, MissingHandlers::Ignore);
    }

    #[test]
    fn test_options_read_from_config() {
        let config = test_config(&[
            ("MEDIATOR_NOTIFY_STRATEGY", " Concurrent "),
            ("MEDIATOR_MISSING_NOTIFICATION_HANDLERS", "error_if_unknown"),
        ]);

        let options = MediatorOptions::from_config(&config).unwrap();

        assert_eq!(options.notify_strategy, NotifyStrategy::Concurrent);
        assert_eq!(
            options.missing_notification_handlers,
            MissingHandlers::ErrorIfUnknown
        );
    }

    #[test]
    fn test_invalid_option_names_key_and_value() {
        let config = test_config(&[("MEDIATOR_NOTIFY_STRATEGY", "parallel")]);

        let err = MediatorOptions::from_config(&config).unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("MEDIATOR_NOTIFY_STRATEGY"));
        assert!(msg.contains("parallel"));
    }

    // The only test in this crate that touches the process environment.
    #[test]
    fn test_options_from_env_reads_prefixed_variables() {
        // SAFETY: no other test here reads or writes the environment.
        unsafe { std::env::set_var(MISSING_HANDLERS_KEY, "error_if_empty") };
        let options = MediatorOptions::from_env();
        unsafe { std::env::remove_var(MISSING_HANDLERS_KEY) };

        assert_eq!(
            options.unwrap().missing_notification_handlers,
            MissingHandlers::ErrorIfEmpty
        );
    }

    #[test]
    fn test_options_deserialize_from_yaml() {
        let yaml = "notify_strategy: concurrent\nmissing_notification_handlers: error_if_empty\n";

        let options: MediatorOptions = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(options.notify_strategy, NotifyStrategy::Concurrent);
        assert_eq!(
            options.missing_notification_handlers,
            MissingHandlers::ErrorIfEmpty
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let options: MediatorOptions = serde_yaml::from_str("notify_strategy: concurrent\n").unwrap();

        assert_eq!(options.missing_notification_handlers, MissingHandlers::Ignore);
    }
}
