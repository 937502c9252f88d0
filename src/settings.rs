//! Game settings and preferences
//!
//! Supplied by the host as JSON; anything missing falls back to the defaults
//! in [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{GameConfig, LevelParams, RoundConfig};

/// Smallest grid that leaves room for obstacle seeds inside their margin
pub const MIN_GRID_EXTENT: i32 = 2 * OBSTACLE_MARGIN + 2;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    pub grid_width: i32,
    pub grid_height: i32,
    /// Pixels per cell
    pub cell_size: u32,
    /// Surround random levels with gapped outer walls
    pub outer_walls: bool,
    pub min_obstacles: u32,
    pub max_obstacles: u32,
    /// Play a fixed preset layout instead of a random level
    pub level_preset: Option<usize>,

    // === Timing ===
    pub tick_interval_ms: u64,
    pub debounce_ms: u64,
    pub food_lifetime_ms: u64,
    /// Points lost when food expires
    pub expiry_penalty: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            cell_size: CELL_SIZE,
            outer_walls: true,
            min_obstacles: MIN_OBSTACLES,
            max_obstacles: MAX_OBSTACLES,
            level_preset: None,

            tick_interval_ms: TICK_INTERVAL_MS,
            debounce_ms: DEBOUNCE_MS,
            food_lifetime_ms: FOOD_LIFETIME_MS,
            expiry_penalty: EXPIRY_PENALTY,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.grid_width < MIN_GRID_EXTENT || self.grid_height < MIN_GRID_EXTENT {
            return Err(SettingsError::Invalid(format!(
                "grid {}x{} is smaller than {}x{}",
                self.grid_width, self.grid_height, MIN_GRID_EXTENT, MIN_GRID_EXTENT
            )));
        }
        if self.cell_size == 0 {
            return Err(SettingsError::Invalid("cell_size must be positive".into()));
        }
        if self.min_obstacles > self.max_obstacles {
            return Err(SettingsError::Invalid(format!(
                "obstacle range {}..={} is empty",
                self.min_obstacles, self.max_obstacles
            )));
        }
        if let Some(index) = self.level_preset {
            if index >= LevelParams::PRESETS.len() {
                return Err(SettingsError::Invalid(format!(
                    "level_preset {} out of range 0..{}",
                    index,
                    LevelParams::PRESETS.len()
                )));
            }
        }
        for (name, value) in [
            ("tick_interval_ms", self.tick_interval_ms),
            ("debounce_ms", self.debounce_ms),
            ("food_lifetime_ms", self.food_lifetime_ms),
        ] {
            if value == 0 {
                return Err(SettingsError::Invalid(format!("{name} must be positive")));
            }
        }
        for (name, value) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
            ("music_volume", self.music_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Invalid(format!("{name} {value} outside 0..=1")));
            }
        }
        Ok(())
    }

    /// Controller configuration for these settings
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            round: RoundConfig {
                width: self.grid_width,
                height: self.grid_height,
                cell_size: self.cell_size,
                outer_walls: self.outer_walls,
                min_obstacles: self.min_obstacles,
                max_obstacles: self.max_obstacles,
                food_lifetime_ms: self.food_lifetime_ms,
                expiry_penalty: self.expiry_penalty,
                preset: self.level_preset,
            },
            tick_interval_ms: self.tick_interval_ms,
            debounce_ms: self.debounce_ms,
        }
    }

    /// Effective sound effect gain (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music gain (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }
}
