//! Board configuration.

use crate::geometry::{ARROWHEAD_LENGTH, HIT_TOLERANCE, HitTolerance, TRIANGLE_AREA_TOLERANCE};
use crate::shapes::{DrawOptions, ShapeKind};
use crate::tools::EditingMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Tunables for hit testing, arrowheads and the initial tool selection.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Max distance from a stroke that still counts as a hit.
    pub hit_tolerance: f64,
    /// Absolute slack for the triangle area test.
    pub triangle_area_tolerance: f64,
    /// Length of each arrowhead wing.
    pub arrowhead_length: f64,
    /// Style applied to new moves.
    pub default_options: DrawOptions,
    /// Shape drawn in shape mode until the user picks another.
    pub default_kind: ShapeKind,
    pub default_mode: EditingMode,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: HIT_TOLERANCE,
            triangle_area_tolerance: TRIANGLE_AREA_TOLERANCE,
            arrowhead_length: ARROWHEAD_LENGTH,
            default_options: DrawOptions::default(),
            default_kind: ShapeKind::default(),
            default_mode: EditingMode::default(),
        }
    }
}

impl BoardConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hit_tolerance.is_finite() && self.hit_tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "hit_tolerance must be non-negative, got {}",
                self.hit_tolerance
            )));
        }
        if !(self.triangle_area_tolerance.is_finite() && self.triangle_area_tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "triangle_area_tolerance must be non-negative, got {}",
                self.triangle_area_tolerance
            )));
        }
        if !(self.arrowhead_length.is_finite() && self.arrowhead_length > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "arrowhead_length must be positive, got {}",
                self.arrowhead_length
            )));
        }
        let width = self.default_options.line_width;
        if !(width.is_finite() && width > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "default line_width must be positive, got {width}"
            )));
        }
        Ok(())
    }

    /// The tolerances used by [`crate::geometry::hit_test`].
    pub fn hit_tolerances(&self) -> HitTolerance {
        HitTolerance {
            stroke: self.hit_tolerance,
            triangle_area: self.triangle_area_tolerance,
        }
    }
}
