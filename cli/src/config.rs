use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use concentration_core::GameConfig;

/// Reads the game config from `path`, or the defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        log::debug!("No config file given, using defaults");
        return Ok(GameConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn parse(text: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}
