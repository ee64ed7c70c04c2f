//! Configuration for the camera math and the wire decoder.
//!
//! A [`MapConfig`] can be built in code or loaded from the same camelCase
//! JSON the host passes at view creation time.

use crate::core::{
    constants::{
        DEFAULT_ASSET_KEY_PREFIX, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_SCREEN_SCALE,
        FIELD_OF_VIEW_DEGREES,
    },
    geo::Size,
};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Which native camera representation poses are emitted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraBackend {
    /// Distance-from-surface camera
    #[default]
    Altitude,
    /// Center plus span, for engines without an altitude camera
    Region,
}

/// Optional zoom bounds as sent by the host (`[min?, max?]`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(Option<f64>, Option<f64>)", into = "(Option<f64>, Option<f64>)")]
pub struct ZoomPreference {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl From<(Option<f64>, Option<f64>)> for ZoomPreference {
    fn from((min, max): (Option<f64>, Option<f64>)) -> Self {
        Self { min, max }
    }
}

impl From<ZoomPreference> for (Option<f64>, Option<f64>) {
    fn from(pref: ZoomPreference) -> Self {
        (pref.min, pref.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Device pixel ratio of the screen hosting the map
    pub screen_scale: f64,
    pub field_of_view_degrees: f64,
    pub viewport_size: Size,
    pub camera_backend: CameraBackend,
    /// Prepended to asset paths to form the bundle lookup key
    pub asset_key_prefix: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            screen_scale: DEFAULT_SCREEN_SCALE,
            field_of_view_degrees: FIELD_OF_VIEW_DEGREES,
            viewport_size: Size::zero(),
            camera_backend: CameraBackend::default(),
            asset_key_prefix: DEFAULT_ASSET_KEY_PREFIX.to_string(),
        }
    }
}

impl MapConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_zoom > self.max_zoom {
            return Err(MapError::InvalidConfig(format!(
                "min zoom {} is above max zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.screen_scale <= 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "screen scale must be positive, got {}",
                self.screen_scale
            )));
        }
        if self.field_of_view_degrees <= 0.0 || self.field_of_view_degrees >= 90.0 {
            return Err(MapError::InvalidConfig(format!(
                "field of view must be within (0, 90) degrees, got {}",
                self.field_of_view_degrees
            )));
        }
        Ok(())
    }

    pub fn field_of_view_radians(&self) -> f64 {
        self.field_of_view_degrees.to_radians()
    }

    /// Bundle lookup key for an asset path
    pub fn asset_key(&self, asset_path: &str) -> String {
        format!("{}{}", self.asset_key_prefix, asset_path)
    }
}
