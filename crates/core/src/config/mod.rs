use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Result, SortVizError};

/// Hard ceiling for `array.max_size`.
pub const MAX_ARRAY_SIZE: usize = 1_000_000;
/// Hard ceiling for `pacing.speed_max`.
pub const MAX_SPEED: u32 = 100_000;
/// Hard ceiling for `surface.height`, which also bounds every value and the
/// bucket count.
pub const MAX_SURFACE_HEIGHT: u32 = 100_000;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub surface: SurfaceConfig,
    pub pacing: PacingConfig,
    pub array: ArrayConfig,
    pub audio: AudioConfig,
    pub render: RenderConfig,
    /// Seed for the array generator and Random Sort. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl VisualizerConfig {
    /// Reads a JSON configuration file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration used by headless tests: no sleeping between steps.
    pub fn headless() -> Self {
        Self {
            pacing: PacingConfig {
                unit_micros: 0,
                ..PacingConfig::default()
            },
            audio: AudioConfig {
                enabled: false,
                ..AudioConfig::default()
            },
            ..Self::default()
        }
    }

    /// Rejects settings the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.surface.height == 0 || self.surface.height > MAX_SURFACE_HEIGHT {
            return Err(SortVizError::validation(format!(
                "surface height {} outside 1..={MAX_SURFACE_HEIGHT}",
                self.surface.height
            )));
        }
        let pacing = &self.pacing;
        if pacing.speed_max > MAX_SPEED {
            return Err(SortVizError::validation(format!(
                "maximum speed {} exceeds {MAX_SPEED}",
                pacing.speed_max
            )));
        }
        if pacing.speed_min == 0 || pacing.speed_min > pacing.speed_max {
            return Err(SortVizError::validation(format!(
                "speed range {}..={} is empty",
                pacing.speed_min, pacing.speed_max
            )));
        }
        if !(pacing.speed_min..=pacing.speed_max).contains(&pacing.default_speed) {
            return Err(SortVizError::validation(format!(
                "default speed {} outside {}..={}",
                pacing.default_speed, pacing.speed_min, pacing.speed_max
            )));
        }
        let array = &self.array;
        if array.max_size == 0 || array.max_size > MAX_ARRAY_SIZE {
            return Err(SortVizError::validation(format!(
                "maximum array size {} outside 1..={MAX_ARRAY_SIZE}",
                array.max_size
            )));
        }
        if !(1..=array.max_size).contains(&array.default_size) {
            return Err(SortVizError::validation(format!(
                "default array size {} outside 1..={}",
                array.default_size, array.max_size
            )));
        }
        Ok(())
    }
}

/// Drawing surface. Bar heights are pixels and double as the sorted values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub speed_min: u32,
    pub speed_max: u32,
    pub default_speed: u32,
    /// Length of one pacing unit in microseconds.
    pub unit_micros: u64,
}

impl PacingConfig {
    pub fn unit(&self) -> Duration {
        Duration::from_micros(self.unit_micros)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            speed_min: 1,
            speed_max: 500,
            default_speed: 100,
            unit_micros: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayConfig {
    pub default_size: usize,
    /// Largest size a run may be started with.
    pub max_size: usize,
    pub min_value: u32,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            default_size: 50,
            max_size: 10_000,
            min_value: 10,
        }
    }
}

/// Configuration specific to the sonification layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub base_pitch: u8,
    pub pitch_range: u8,
    pub velocity: u8,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_pitch: 60,
            pitch_range: 36,
            velocity: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of text rows the tallest possible bar occupies.
    pub rows: u16,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { rows: 20 }
    }
}
