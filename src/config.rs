// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the forecasting engine

pub mod engine_config;
pub mod environment;

use crate::constants::{env_vars, paths};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use engine_config::{
    BurnoutConfig, ConfigError, EngineConfig, ForecastConfig, RecommendationConfig, ScoringConfig,
};

impl EngineConfig {
    /// Load configuration from file or use defaults, then apply environment overrides.
    ///
    /// Resolution order: explicit path, `NEUROTRACK_CONFIG`, `./neurotrack.toml`,
    /// the user config directory, built-in defaults.
    pub fn load(path: Option<String>) -> Result<Self> {
        let mut config = match Self::resolve_path(path) {
            Some(config_path) => Self::load_from_file(&config_path)?,
            None => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        environment::apply_env_overrides(&mut config)?;
        config.validate().context("Invalid engine configuration")?;
        info!(
            forecast.horizon = config.forecast.horizon,
            forecast.min_points = config.forecast.min_points,
            burnout.window_days = config.burnout.window_days,
            burnout.workload_hours_threshold = config.burnout.workload_hours_threshold,
            "Engine configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid values in config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    fn resolve_path(explicit: Option<String>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(env_vars::CONFIG_PATH) {
            return Some(PathBuf::from(path));
        }

        let local = PathBuf::from(paths::LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join(paths::USER_CONFIG_FILE))
            .filter(|path| path.exists())
    }
}
