//! Service configuration: optional YAML file with defaults for everything.
//!
//! Secrets never live in the config file; the GitHub token comes from the
//! secret file or the environment (see [`crate::github::load_github_token`]).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Base directory for repository mirrors.
    pub mirror_dir: PathBuf,
    /// Directory served at `/` (landing page).
    pub static_dir: PathBuf,
    /// Wall-clock deadline applied to every external command.
    pub command_timeout_secs: u64,
    /// GitHub REST API base URL (overridable for tests).
    pub github_api_base: String,
    /// Host-provided secret file holding the GitHub token.
    pub github_token_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            mirror_dir: PathBuf::from("./repos"),
            static_dir: PathBuf::from("./static"),
            command_timeout_secs: 600,
            github_api_base: "https://api.github.com".to_string(),
            github_token_file: PathBuf::from("/run/secrets/GITHUB_TOKEN"),
        }
    }
}

impl AppConfig {
    pub fn command_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.command_timeout_secs)
    }
}

/// Load configuration from a YAML file, or fall back to defaults when no
/// path is given.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        info!("No config file given, using defaults");
        return Ok(AppConfig::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: AppConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config YAML {}", path.display()))?;

    info!(config_path = %path.display(), bind_addr = %config.bind_addr, "Loaded config");
    Ok(config)
}
