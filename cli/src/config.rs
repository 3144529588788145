use anyhow::{Context, Result};
use giveaway_execution::ContestConfig;
use giveaway_types::{
    contest::{DEFAULT_ADMIN_ID, DEFAULT_BOT_ENTRY_POINT},
    UserId,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the giveaway CLI (from config file)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub admin_id: UserId,
    pub bot_entry_point: String,
    pub snapshot_path: PathBuf,
    pub log_level: String,
    pub json_logs: bool,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_id: DEFAULT_ADMIN_ID,
            bot_entry_point: DEFAULT_BOT_ENTRY_POINT.to_string(),
            snapshot_path: PathBuf::from("data/contest.json"),
            log_level: "info".to_string(),
            json_logs: false,
            seed: None,
        }
    }
}

impl Config {
    /// Load from a YAML file, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Could not parse config file {}", path.display()))
    }

    pub fn contest(&self) -> ContestConfig {
        ContestConfig {
            admin_id: self.admin_id,
            bot_entry_point: self.bot_entry_point.clone(),
            seed: self.seed,
        }
    }
}
