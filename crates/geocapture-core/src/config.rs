//! Editor configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::LonLat;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for the map view and interactions.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Map centre when no initial geometry is given.
    pub default_center: LonLat,
    /// Zoom level when no initial geometry is given.
    pub default_zoom: f64,
    /// Zoom level when centring on an initial point.
    pub point_zoom: f64,
    /// Padding in pixels around a fitted polygon.
    pub fit_padding: f64,
    /// Upper zoom bound when fitting a polygon.
    pub max_fit_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Radius in pixels for grabbing a vertex handle.
    pub hit_tolerance_px: f64,
    /// Zoom levels per scroll notch.
    pub zoom_step: f64,
    /// Duration of the rotation reset animation.
    pub rotation_animation_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_center: LonLat::new(84.124, 28.394),
            default_zoom: 7.0,
            point_zoom: 16.0,
            fit_padding: 50.0,
            max_fit_zoom: 18.0,
            min_zoom: 2.0,
            max_zoom: 20.0,
            hit_tolerance_px: 10.0,
            zoom_step: 0.5,
            rotation_animation_ms: 250,
        }
    }
}

impl EditorConfig {
    /// Load a config file, validating the result.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.default_center
            .validate(0)
            .map_err(|e| ConfigError::Invalid(format!("default_center: {e}")))?;
        for (name, zoom) in [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("default_zoom", self.default_zoom),
            ("point_zoom", self.point_zoom),
            ("max_fit_zoom", self.max_fit_zoom),
        ] {
            if !zoom.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(ConfigError::Invalid(
                "zoom_step must be finite and positive".to_string(),
            ));
        }
        if !(self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.hit_tolerance_px.is_finite() && self.hit_tolerance_px > 0.0) {
            return Err(ConfigError::Invalid(
                "hit_tolerance_px must be positive".to_string(),
            ));
        }
        if !(self.fit_padding.is_finite() && self.fit_padding >= 0.0) {
            return Err(ConfigError::Invalid(
                "fit_padding must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn rotation_animation(&self) -> Duration {
        Duration::from_millis(self.rotation_animation_ms)
    }
}
