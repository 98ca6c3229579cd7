//! Configuration for the lehua front ends.
//!
//! Config file lives at `~/.config/lehua/config.toml`. Values resolve as
//! CLI flag > environment (`.env` included) > config file > defaults. The
//! environment layer is filled in by clap before it reaches [`Resolved::merge`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Characters per second for the typewriter effect.
pub const DEFAULT_TYPING_SPEED: u32 = 50;

/// User configuration (persisted in config.toml).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Chat model used for choices and storytelling.
    pub model: Option<String>,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: Option<String>,
    /// Typewriter speed; 0 prints instantly.
    pub typing_speed: Option<u32>,
    /// Clear the terminal between scenes.
    pub clear_screen: Option<bool>,
    /// Journal database path.
    pub journal: Option<PathBuf>,
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lehua")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn default_journal_path() -> PathBuf {
    config_dir().join("journal.db")
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display()))?;
        toml::from_str(&s).with_context(|| format!("bad config file {}", path.display()))
    }

    /// Load the user config. A missing file means defaults; a broken one is
    /// reported and ignored.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub typing_speed: Option<u32>,
    pub no_clear: bool,
    pub journal: Option<PathBuf>,
}

/// Effective settings after layering.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub typing_speed: u32,
    pub clear_screen: bool,
    pub journal: PathBuf,
}

impl Resolved {
    /// Merge: CLI/env overrides > config file > defaults.
    pub fn merge(overrides: &Overrides, config: &Config) -> Self {
        let api_key = overrides
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty());

        let model = overrides
            .model
            .clone()
            .or_else(|| config.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| config.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let typing_speed = overrides
            .typing_speed
            .or(config.typing_speed)
            .unwrap_or(DEFAULT_TYPING_SPEED);

        let clear_screen = !overrides.no_clear && config.clear_screen.unwrap_or(true);

        let journal = overrides
            .journal
            .clone()
            .or_else(|| config.journal.clone())
            .unwrap_or_else(default_journal_path);

        Self { api_key, model, base_url, typing_speed, clear_screen, journal }
    }
}
