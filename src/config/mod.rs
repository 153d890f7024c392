//! Client settings, persisted as `~/.parley/config.toml`.

use crate::api::ExportFormat;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Backend base URL, including the `/api` prefix.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub simulate: SimulateConfig,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000/api".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            server_url: default_server_url(),
            export: ExportConfig::default(),
            simulate: SimulateConfig::default(),
        }
    }
}

// ── Transcript export ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory transcripts are saved into (`~` is expanded).
    #[serde(default = "default_export_dir")]
    pub dir: String,
    #[serde(default)]
    pub format: ExportFormat,
}

fn default_export_dir() -> String {
    ".".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
            format: ExportFormat::default(),
        }
    }
}

// ── Autonomous simulation ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateConfig {
    /// Exchange budget for a run-to-completion simulation.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

fn default_max_turns() -> u32 {
    5
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let parley_dir = home.join(".parley");
        let config_path = parley_dir.join("config.toml");

        if !parley_dir.exists() {
            fs::create_dir_all(&parley_dir).context("Failed to create .parley directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            Ok(config)
        } else {
            let config = Self {
                config_path: config_path.clone(),
                ..Self::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PARLEY_SERVER_URL") {
            if !url.is_empty() {
                self.server_url = url;
            }
        }

        if let Ok(dir) = std::env::var("PARLEY_EXPORT_DIR") {
            if !dir.is_empty() {
                self.export.dir = dir;
            }
        }

        if let Ok(turns_str) = std::env::var("PARLEY_MAX_TURNS") {
            if let Ok(turns) = turns_str.parse::<u32>() {
                if turns > 0 {
                    self.simulate.max_turns = turns;
                }
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Export directory with `~` expanded.
    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.export.dir).as_ref())
    }
}
