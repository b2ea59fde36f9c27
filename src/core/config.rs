//! Game configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose.
//! The temperature range and animation timing come straight from the
//! presentation contract and must not drift from what the backend produces.

use crate::core::error::{GameError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Lowest temperature the gradient distinguishes (kelvin).
///
/// Values at or below this render as pure blue. The backend reports
/// ambient powder-bed temperature around this floor.
pub const MIN_TEMP: f64 = 200.0;

/// Highest temperature the gradient distinguishes (kelvin).
///
/// Values at or above this render as pure red (melt-pool core).
pub const MAX_TEMP: f64 = 1000.0;

/// Total budget for the staggered reveal animation, in milliseconds.
///
/// The farthest tile from the last revealed cell finishes its transition
/// within roughly this window regardless of board size.
pub const MAX_ANIM_TIME_MS: f64 = 1000.0;

/// Smallest playable board edge. Below 3 the accuracy signal is noise.
pub const GRID_MIN: usize = 3;

/// Largest playable board edge the backend will simulate.
pub const GRID_MAX: usize = 10;

/// Runtime configuration for the game client
///
/// Loaded from an optional TOML file, then overridden by environment
/// variables (`MELTGRID_API_URL`, `MELTGRID_SAVE`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Base URL of the simulation backend
    pub backend_url: String,

    /// Per-request timeout for backend calls, in seconds
    ///
    /// There is no in-game cancellation; a slow response is awaited up to
    /// this limit, after which the call fails as a backend error.
    pub request_timeout_secs: u64,

    /// Path of the progression save file
    pub save_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".into(),
            request_timeout_secs: 30,
            save_path: PathBuf::from("meltgrid_save.json"),
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file, falling back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig =
            toml::from_str(&text).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Optional: MELTGRID_API_URL, MELTGRID_SAVE
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var("MELTGRID_API_URL") {
            self.backend_url = url;
        }
        if let Ok(path) = std::env::var("MELTGRID_SAVE") {
            self.save_path = PathBuf::from(path);
        }
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.is_empty() {
            return Err(GameError::InvalidConfig("backend_url is empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(GameError::InvalidConfig(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
