use anyhow::Context;
use mediator::{Config, MediatorOptions};

/// Points at a YAML file holding the mediator options. When unset, the
/// options come from the individual `MEDIATOR_*` variables.
const OPTIONS_FILE_KEY: &str = "MEDIATOR_OPTIONS_FILE";

pub fn load(config: &Config) -> anyhow::Result<MediatorOptions> {
    match config.optional(OPTIONS_FILE_KEY) {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read options file '{path}'"))?;
            parse(&raw).with_context(|| format!("invalid options file '{path}'"))
        }
        None => Ok(MediatorOptions::from_config(config)?),
    }
}

fn parse(raw: &str) -> anyhow::Result<MediatorOptions> {
    Ok(serde_yaml::from_str(raw)?)
}
