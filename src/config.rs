//! Runtime settings, read from an optional TOML file.
//!
//! Example `twisty.toml`:
//!
//! ```toml
//! kind = "cube"
//! size = 4
//! scramble_moves = 40
//! twist_duration_ms = 180
//! drag_threshold = 30.0
//! seed = 1234
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::gesture::DEFAULT_DRAG_THRESHOLD;
use crate::PuzzleKind;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "twisty.toml";

/// Settings for a puzzle session. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub kind: PuzzleKind,
    /// Edge length in layers.
    pub size: usize,
    /// Scramble length; `None` uses the puzzle's default.
    pub scramble_moves: Option<usize>,
    /// Duration of one animated turn.
    pub twist_duration_ms: u64,
    /// Pointer travel in pixels, along either screen axis, before a drag
    /// becomes a turn.
    pub drag_threshold: f32,
    /// Seed for reproducible scrambles.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kind: PuzzleKind::Cube,
            size: 3,
            scramble_moves: None,
            twist_duration_ms: 250,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            seed: None,
        }
    }
}

impl Settings {
    /// Parses and validates settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from `path`, or from [`DEFAULT_CONFIG_FILE`] if it
    /// exists, or falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_toml(&fs::read_to_string(path)?);
        }
        match fs::read_to_string(DEFAULT_CONFIG_FILE) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::InvalidSize);
        }
        if self.drag_threshold.is_nan() || self.drag_threshold < 0.0 {
            return Err(ConfigError::InvalidDragThreshold(self.drag_threshold));
        }
        Ok(())
    }

    pub fn twist_duration(&self) -> Duration {
        Duration::from_millis(self.twist_duration_ms)
    }
}
