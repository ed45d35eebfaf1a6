use anyhow::{bail, Context};
use eleven_core::GameConfig;
use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const RULES_FILE: &str = "rules.json";

/// Reads `rules.json` from an assets directory.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    load_game_config_file(&dir.join(RULES_FILE))
}

pub fn load_game_config_file(path: &Path) -> anyhow::Result<GameConfig> {
    let config: GameConfig = load_json(path)?;
    validate_config(&config).with_context(|| format!("validate {}", path.display()))?;
    debug!("loaded rules from {}", path.display());
    Ok(config)
}

/// Parses rules from a JSON string; missing fields fall back to defaults.
pub fn parse_game_config(raw: &str) -> anyhow::Result<GameConfig> {
    let config: GameConfig = serde_json::from_str(raw).context("parse rules")?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> anyhow::Result<()> {
    let layout = &config.layout;
    if layout.peaks == 0 {
        bail!("layout needs at least one peak");
    }
    if layout.rows.is_empty() || layout.rows.contains(&0) {
        bail!("every peak row needs at least one slot: {:?}", layout.rows);
    }
    if config.rounds.count == 0 {
        bail!("a match needs at least one round");
    }
    if config.rounds.min_time_ms == 0 {
        bail!("round time floor must be positive");
    }
    if config.rounds.base_time_ms < config.rounds.min_time_ms {
        bail!(
            "base time {}ms is below the floor {}ms",
            config.rounds.base_time_ms,
            config.rounds.min_time_ms
        );
    }
    if config.stock.bias_percent > 100 {
        bail!("bias_percent {} exceeds 100", config.stock.bias_percent);
    }
    if config.stock.weight_min > config.stock.weight_max {
        bail!(
            "weight_min {} exceeds weight_max {}",
            config.stock.weight_min,
            config.stock.weight_max
        );
    }
    if config.scoring.over_penalty < 0 {
        bail!("over_penalty is a deduction and must not be negative");
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
