use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, Rect, Vec2};
use crate::spatial::DEFAULT_CELL_SIZE;

/// World-level physics settings.
///
/// Loaded from JSON with camelCase keys; missing fields take defaults:
///
/// ```json
/// { "gravity": { "x": 0, "y": 980 },
///   "bounds": { "x": 0, "y": 0, "width": 800, "height": 600 },
///   "cellSize": 64 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldConfig {
    /// Applied to every dynamic body each step
    pub gravity: Vec2,
    /// Dynamic bodies are clamped inside and bounce off the edges
    pub bounds: Option<Rect>,
    /// Broad-phase cell edge length
    pub cell_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::zero(),
            bounds: None,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl WorldConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_gravity(mut self, x: f32, y: f32) -> Self {
        self.gravity = Vec2::new(x, y);
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidGravity(self.gravity.x, self.gravity.y));
        }
        if let Some(bounds) = &self.bounds {
            validate_bounds(bounds)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_bounds(bounds: &Rect) -> Result<(), ConfigError> {
    let ok = bounds.x.is_finite()
        && bounds.y.is_finite()
        && bounds.width.is_finite()
        && bounds.height.is_finite()
        && bounds.width > 0.0
        && bounds.height > 0.0;
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidBounds)
    }
}
