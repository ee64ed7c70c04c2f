//! Map builder for fluent controller configuration
//!
//! [`MapBuilder`] collects a [`MapConfig`], an optional initial camera and
//! creation payload, and the event sink, then builds a [`MapController`]
//! around the surface it is given.

use crate::{
    channel::{
        codec::{CameraPositionDict, CreationParams},
        events::EventSink,
    },
    core::{
        config::{CameraBackend, MapConfig},
        geo::{LatLng, Size},
        map::MapController,
    },
    rendering::surface::MapSurface,
    Result,
};

/// Builder for creating and configuring map controllers
#[derive(Debug, Clone, Default)]
pub struct MapBuilder {
    config: MapConfig,
    initial_camera: Option<CameraPositionDict>,
    creation_params: Option<CreationParams>,
    events: EventSink,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_min_zoom(mut self, min_zoom: f64) -> Self {
        self.config.min_zoom = min_zoom;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.config.max_zoom = max_zoom;
        self
    }

    pub fn with_viewport_size(mut self, width: f64, height: f64) -> Self {
        self.config.viewport_size = Size::new(width, height);
        self
    }

    pub fn with_screen_scale(mut self, screen_scale: f64) -> Self {
        self.config.screen_scale = screen_scale;
        self
    }

    pub fn with_camera_backend(mut self, backend: CameraBackend) -> Self {
        self.config.camera_backend = backend;
        self
    }

    /// Set the initial center and zoom level
    pub fn with_initial_camera(mut self, target: LatLng, zoom: f64) -> Self {
        self.initial_camera = Some(CameraPositionDict {
            target: Some(target),
            zoom: Some(zoom),
            pitch: None,
            heading: None,
        });
        self
    }

    /// Parameters the host view was created with, applied after the initial camera
    pub fn with_creation_params(mut self, params: CreationParams) -> Self {
        self.creation_params = Some(params);
        self
    }

    /// Where outbound events go; by default they are dropped
    pub fn with_event_sink(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Build the controller driving `surface`
    pub fn build<S: MapSurface>(self, surface: S) -> Result<MapController<S>> {
        let mut map = MapController::new(self.config, surface, self.events)?;

        if let Some(position) = self.initial_camera {
            map.set_camera_position(position, false);
        }
        if let Some(params) = self.creation_params {
            map.apply_creation_params(params)?;
        }

        Ok(map)
    }
}
