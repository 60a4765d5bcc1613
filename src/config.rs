use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const CONFIG_ENV: &str = "STOPWATCHES_CONFIG";

const DEFAULT_TICK_RATE_HZ: u32 = 60;
const DEFAULT_STOPWATCHES: usize = 3;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Display refreshes per second while a stopwatch runs.
    pub tick_rate_hz: u32,
    /// Stopwatches present at launch.
    pub initial_stopwatches: usize,
    pub dark: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            initial_stopwatches: DEFAULT_STOPWATCHES,
            dark: true,
        }
    }
}

impl AppConfig {
    /// Loads from `path`, or returns defaults when there is none.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let Some(path) = path else {
            log::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&text).map_err(|source| AppError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.tick_rate_hz == 0 {
            return Err(AppError::InvalidConfig(
                "tick_rate_hz must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }
}

/// `--config <path>` wins over the environment variable.
pub fn config_path(args: &[String]) -> Option<PathBuf> {
    args.windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| PathBuf::from(&w[1]))
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}
