use anyhow::Context;
use mediator::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILTER_KEY: &str = "MEDIATOR_LOG";
const DEFAULT_FILTER: &str = "mediator=debug,mediator_demo=debug";

#[must_use = "LogGuard must be held to keep logging active"]
#[non_exhaustive]
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

impl LogGuard {
    /// Installs the global subscriber. `MEDIATOR_LOG` wins over `RUST_LOG`.
    pub fn init(config: &Config) -> anyhow::Result<Self> {
        let filter = filter(config)?;
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(writer))
            .try_init()?;

        Ok(Self { _guard: guard })
    }
}

fn filter(config: &Config) -> anyhow::Result<EnvFilter> {
    match config.optional(LOG_FILTER_KEY) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_FILTER_KEY} '{directives}'")),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_filter_from_config_key() {
        let config = Config::from_map(HashMap::from([(
            LOG_FILTER_KEY.to_string(),
            "mediator=trace".to_string(),
        )]));

        let filter = filter(&config).unwrap();

        assert_eq!(filter.to_string(), "mediator=trace");
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = Config::from_map(HashMap::from([(
            LOG_FILTER_KEY.to_string(),
            "mediator=loud".to_string(),
        )]));

        let err = filter(&config).unwrap_err();

        assert!(err.to_string().contains(LOG_FILTER_KEY));
    }
}
