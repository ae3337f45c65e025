use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::error::StoryError;

/// Environment variable naming an optional JSON configuration file
pub const CONFIG_PATH_VAR: &str = "STORY_CONFIG";
/// Environment variable overriding the bind address
pub const BIND_VAR: &str = "STORY_BIND";
/// Environment variable overriding the data directory
pub const DATA_DIR_VAR: &str = "STORY_DATA_DIR";

/// Configuration for the story server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Address the web server binds to
    pub bind_address: String,
    /// Directory holding the five CSV tables
    pub data_dir: PathBuf,
    /// Directory served under /static
    pub static_dir: PathBuf,
    /// Chart canvas settings
    pub chart: ChartConfig,
    /// Capacity of the story event queue
    pub event_queue_capacity: usize,
    /// Number of rendered frames kept in memory per session
    pub render_cache_capacity: usize,
    /// Viewer sessions kept before the least recently used is dropped
    pub max_sessions: usize,
    /// Allowed deviation of tier shares from 1.0 before the audit reports it
    pub tier_sum_tolerance: f64,
}

/// Chart canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            data_dir: PathBuf::from("./data"),
            static_dir: PathBuf::from("./src/web/static"),
            chart: ChartConfig::default(),
            event_queue_capacity: 64,
            render_cache_capacity: 16,
            max_sessions: 256,
            tier_sum_tolerance: 0.01,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 550,
        }
    }
}

impl StoryConfig {
    /// Load configuration from `STORY_CONFIG` (if set) and apply environment overrides
    pub fn load() -> Result<Self, StoryError> {
        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Read a JSON configuration file; missing keys take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            StoryError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, StoryError> {
        let config: StoryConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up by variable name
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_VAR) {
            self.bind_address = bind;
        }
        if let Some(dir) = lookup(DATA_DIR_VAR) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    fn validate(&self) -> Result<(), StoryError> {
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(StoryError::ConfigError(
                "chart width and height must be positive".to_string(),
            ));
        }
        if self.event_queue_capacity == 0 {
            return Err(StoryError::ConfigError(
                "event_queue_capacity must be positive".to_string(),
            ));
        }
        if self.max_sessions == 0 {
            return Err(StoryError::ConfigError("max_sessions must be positive".to_string()));
        }
        if !(self.tier_sum_tolerance >= 0.0) {
            return Err(StoryError::ConfigError(
                "tier_sum_tolerance must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}
