use crate::{MapError, Result};
use crate::core::{
    config::{CameraBackend, MapConfig},
    constants::{DEFAULT_ZOOM_DELTA, MAX_PROJECTION_ZOOM, ZOOM_IN_FLOOR},
    geo::{CoordinateSpan, LatLng, Size, VisibleRegion},
    projection,
};
use serde::{Deserialize, Serialize};

/// Camera position in the host's terms: target, zoom level, pitch and heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub target: LatLng,
    pub zoom: f64,
    pub pitch: f64,
    pub heading: f64,
}

/// Camera position in the native engine's terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NativeCamera {
    Altitude {
        center: LatLng,
        altitude: f64,
        pitch: f64,
        heading: f64,
    },
    /// Pitch and heading are only carried for non-animated moves; changing
    /// them mid-animation stops a region animation.
    Region {
        center: LatLng,
        span: CoordinateSpan,
        pitch: Option<f64>,
        heading: Option<f64>,
    },
}

/// A computed camera move, handed to the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraUpdate {
    pub pose: CameraPose,
    pub native: NativeCamera,
    /// Hint for the surface; the pose is final either way
    pub animated: bool,
}

/// Current camera of the single map view this controller drives.
///
/// Every command updates the stored values first and then derives the
/// native pose from them, so the state is never behind the last command.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    center: LatLng,
    zoom: f64,
    pitch: f64,
    heading: f64,
    min_zoom: f64,
    max_zoom: f64,
    viewport: Size,
    screen_scale: f64,
    fov_radians: f64,
    backend: CameraBackend,
}

impl CameraState {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            center: LatLng::default(),
            zoom: config.min_zoom,
            pitch: 0.0,
            heading: 0.0,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            viewport: config.viewport_size,
            screen_scale: config.screen_scale,
            fov_radians: config.field_of_view_radians(),
            backend: config.camera_backend,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            target: self.center,
            zoom: self.zoom,
            pitch: self.pitch,
            heading: self.heading,
        }
    }

    /// Moves the camera; omitted fields keep their current value.
    ///
    /// The zoom is stored as given; bounds are only enforced by the zoom commands.
    pub fn set_center(
        &mut self,
        target: Option<LatLng>,
        zoom: Option<f64>,
        pitch: Option<f64>,
        heading: Option<f64>,
        animated: bool,
    ) -> CameraUpdate {
        if let Some(target) = target {
            self.center = target;
        }
        if let Some(zoom) = zoom {
            self.zoom = zoom;
        }
        if let Some(pitch) = pitch {
            self.pitch = pitch;
        }
        if let Some(heading) = heading {
            self.heading = heading;
        }
        self.update(animated)
    }

    /// Steps one level closer.
    ///
    /// The guard compares `zoom - 1` against the max, so a camera already at
    /// the max still steps once past it.
    pub fn zoom_in(&mut self, animated: bool) -> Option<CameraUpdate> {
        if self.zoom - DEFAULT_ZOOM_DELTA > self.max_zoom {
            return None;
        }
        if self.zoom < ZOOM_IN_FLOOR {
            self.zoom = ZOOM_IN_FLOOR;
        }
        self.zoom += DEFAULT_ZOOM_DELTA;
        Some(self.update(animated))
    }

    /// Steps one level out. Landing on a level that rounds to 2 or below snaps to 0.
    pub fn zoom_out(&mut self, animated: bool) -> Option<CameraUpdate> {
        if self.zoom - DEFAULT_ZOOM_DELTA < self.min_zoom {
            return None;
        }
        self.zoom -= DEFAULT_ZOOM_DELTA;
        if self.zoom.round() <= 2.0 {
            self.zoom = 0.0;
        }
        Some(self.update(animated))
    }

    pub fn zoom_to(&mut self, level: f64, animated: bool) -> CameraUpdate {
        self.zoom = self.clamp_zoom(level);
        self.update(animated)
    }

    pub fn zoom_by(&mut self, delta: f64, animated: bool) -> CameraUpdate {
        self.zoom = self.clamp_zoom(self.zoom + delta);
        self.update(animated)
    }

    /// Lowers or raises the upper bound, pulling the camera back if it is now above it
    pub fn set_max_zoom(&mut self, max_zoom: f64) -> Option<CameraUpdate> {
        self.max_zoom = max_zoom;
        log::info!("max zoom set to {}", max_zoom);
        if self.zoom > max_zoom {
            self.zoom = max_zoom;
            return Some(self.update(false));
        }
        None
    }

    /// Lowers or raises the lower bound, pushing the camera in if it is now below it
    pub fn set_min_zoom(&mut self, min_zoom: f64) -> Option<CameraUpdate> {
        self.min_zoom = min_zoom;
        log::info!("min zoom set to {}", min_zoom);
        if self.zoom < min_zoom {
            self.zoom = min_zoom;
            return Some(self.update(false));
        }
        None
    }

    /// Centers on the bounding box of `coords` at the closest zoom that still
    /// shows all of it with `padding` points to spare. No-op for an empty list.
    pub fn fit_bounds(
        &mut self,
        coords: &[LatLng],
        padding: f64,
        animated: bool,
    ) -> Option<CameraUpdate> {
        let rect = projection::bounding_box(coords)?;
        self.center = projection::unproject(&rect.center());
        if let Some(zoom) = projection::zoom_to_fit(&rect, self.viewport, padding) {
            self.zoom = self.clamp_zoom(zoom);
        }
        Some(self.update(animated))
    }

    pub fn visible_region(&self) -> VisibleRegion {
        projection::visible_region(&self.center, self.zoom, self.viewport)
    }

    /// Records a camera change the user made on the native view.
    ///
    /// The zoom level is re-derived from the native altitude, which must be
    /// finite and positive; otherwise nothing is stored.
    pub fn on_camera_moved(
        &mut self,
        center: LatLng,
        altitude: f64,
        pitch: f64,
        heading: f64,
    ) -> Result<CameraPose> {
        if !altitude.is_finite() || altitude <= 0.0 {
            return Err(MapError::InvalidArgument(format!(
                "camera altitude must be finite and positive, got {}",
                altitude
            )));
        }
        self.center = center;
        self.zoom =
            projection::zoom_for_altitude(altitude, self.max_zoom, self.screen_scale, self.fov_radians);
        self.pitch = pitch;
        self.heading = heading;
        Ok(self.pose())
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom < self.min_zoom {
            self.min_zoom
        } else if zoom > self.max_zoom {
            self.max_zoom
        } else {
            zoom
        }
    }

    fn update(&self, animated: bool) -> CameraUpdate {
        let zoom = self.zoom.min(MAX_PROJECTION_ZOOM);
        let native = match self.backend {
            CameraBackend::Altitude => NativeCamera::Altitude {
                center: self.center,
                altitude: projection::altitude_for_zoom(
                    zoom,
                    self.max_zoom,
                    self.screen_scale,
                    self.fov_radians,
                ),
                pitch: self.pitch,
                heading: self.heading,
            },
            // Region cameras only take whole zoom levels.
            CameraBackend::Region => NativeCamera::Region {
                center: self.center,
                span: projection::span_for_zoom(&self.center, zoom.trunc(), self.viewport),
                pitch: (!animated).then_some(self.pitch),
                heading: (!animated).then_some(self.heading),
            },
        };

        CameraUpdate {
            pose: self.pose(),
            native,
            animated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraState {
        let config = MapConfig {
            viewport_size: Size::new(400.0, 800.0),
            ..MapConfig::default()
        };
        CameraState::new(&config)
    }

    #[test]
    fn test_set_center_keeps_omitted_fields() {
        let mut camera = camera();
        camera.set_center(Some(LatLng::new(1.0, 2.0)), Some(12.0), Some(30.0), Some(90.0), false);
        let update = camera.set_center(None, None, None, None, true);

        assert_eq!(update.pose.target, LatLng::new(1.0, 2.0));
        assert_eq!(update.pose.zoom, 12.0);
        assert_eq!(update.pose.pitch, 30.0);
        assert_eq!(update.pose.heading, 90.0);
        assert!(update.animated);
    }

    #[test]
    fn test_set_center_stores_zoom_unclamped() {
        let mut camera = camera();
        camera.set_center(None, Some(25.0), None, None, false);
        assert_eq!(camera.zoom(), 25.0);
    }

    #[test]
    fn test_zoom_in_snaps_to_floor_first() {
        let mut camera = camera();
        camera.set_center(None, Some(0.0), None, None, false);
        let update = camera.zoom_in(false).unwrap();
        assert_eq!(update.pose.zoom, 3.0);
    }

    #[test]
    fn test_zoom_in_steps_once_past_max() {
        let mut camera = camera();
        camera.zoom_to(21.0, false);
        assert_eq!(camera.zoom_in(false).unwrap().pose.zoom, 22.0);
        assert_eq!(camera.zoom_in(false).unwrap().pose.zoom, 23.0);
        assert!(camera.zoom_in(false).is_none());
        assert_eq!(camera.zoom(), 23.0);
    }

    #[test]
    fn test_zoom_out_snaps_to_zero() {
        let mut camera = camera();
        camera.zoom_to(4.0, false);
        assert_eq!(camera.zoom_out(false).unwrap().pose.zoom, 3.0);
        // 3 - 1 = 2 rounds to 2, snapping to 0
        assert_eq!(camera.zoom_out(false).unwrap().pose.zoom, 0.0);
        assert!(camera.zoom_out(false).is_none());
    }

    #[test]
    fn test_zoom_to_and_by_clamp() {
        let mut camera = camera();
        assert_eq!(camera.zoom_to(40.0, false).pose.zoom, 21.0);
        assert_eq!(camera.zoom_to(-3.0, false).pose.zoom, 2.0);
        camera.zoom_to(10.0, false);
        assert_eq!(camera.zoom_by(4.5, false).pose.zoom, 14.5);
        assert_eq!(camera.zoom_by(100.0, false).pose.zoom, 21.0);
        assert_eq!(camera.zoom_by(-100.0, false).pose.zoom, 2.0);
    }

    #[test]
    fn test_bound_setters_pull_camera_back() {
        let mut camera = camera();
        camera.zoom_to(18.0, false);

        let update = camera.set_max_zoom(15.0).unwrap();
        assert_eq!(update.pose.zoom, 15.0);
        assert!(!update.animated);
        assert!(camera.set_max_zoom(16.0).is_none());

        let update = camera.set_min_zoom(16.0).unwrap();
        assert_eq!(update.pose.zoom, 16.0);
        assert!(camera.set_min_zoom(3.0).is_none());
    }

    #[test]
    fn test_altitude_backend_matches_projection() {
        let mut camera = camera();
        let update = camera.zoom_to(12.0, false);
        match update.native {
            NativeCamera::Altitude { altitude, .. } => {
                let zoom = projection::zoom_for_altitude(
                    altitude,
                    21.0,
                    2.0,
                    projection::default_field_of_view(),
                );
                assert!((zoom - 12.0).abs() < 1e-9);
            }
            other => panic!("unexpected native camera {:?}", other),
        }
    }

    #[test]
    fn test_region_backend_truncates_zoom_and_skips_pitch_when_animated() {
        let config = MapConfig {
            camera_backend: CameraBackend::Region,
            viewport_size: Size::new(400.0, 800.0),
            ..MapConfig::default()
        };
        let mut camera = CameraState::new(&config);
        camera.set_center(Some(LatLng::new(10.0, 10.0)), Some(12.7), Some(20.0), None, false);

        let animated = camera.set_center(None, None, None, None, true);
        match animated.native {
            NativeCamera::Region { span, pitch, heading, .. } => {
                let expected = projection::span_for_zoom(&LatLng::new(10.0, 10.0), 12.0, camera.viewport_size());
                assert_eq!(span, expected);
                assert_eq!(pitch, None);
                assert_eq!(heading, None);
            }
            other => panic!("unexpected native camera {:?}", other),
        }

        let still = camera.set_center(None, None, None, None, false);
        match still.native {
            NativeCamera::Region { pitch, .. } => assert_eq!(pitch, Some(20.0)),
            other => panic!("unexpected native camera {:?}", other),
        }
    }

    #[test]
    fn test_fit_bounds() {
        let mut camera = camera();
        assert!(camera.fit_bounds(&[], 10.0, false).is_none());

        let coords = [LatLng::new(37.70, -122.52), LatLng::new(37.83, -122.35)];
        let update = camera.fit_bounds(&coords, 20.0, true).unwrap();
        let region = camera.visible_region();
        for coord in &coords {
            assert!(region.contains(coord));
        }
        assert!(update.pose.zoom >= 2.0 && update.pose.zoom <= 21.0);

        let single = camera.fit_bounds(&[LatLng::new(5.0, 5.0)], 0.0, false).unwrap();
        assert_eq!(single.pose.zoom, 21.0);
    }

    #[test]
    fn test_on_camera_moved_derives_zoom() {
        let mut camera = camera();
        let altitude = projection::altitude_for_zoom(9.0, 21.0, 2.0, projection::default_field_of_view());
        let pose = camera.on_camera_moved(LatLng::new(3.0, 4.0), altitude, 10.0, 45.0).unwrap();
        assert!((pose.zoom - 9.0).abs() < 1e-9);
        assert_eq!(pose.target, LatLng::new(3.0, 4.0));
        assert_eq!(camera.heading(), 45.0);
    }

    #[test]
    fn test_on_camera_moved_rejects_bad_altitude() {
        let mut camera = camera();
        camera.zoom_to(12.0, false);
        let before = camera.clone();

        for altitude in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = camera
                .on_camera_moved(LatLng::new(1.0, 2.0), altitude, 0.0, 0.0)
                .unwrap_err();
            assert!(matches!(err, MapError::InvalidArgument(_)));
        }
        assert_eq!(camera, before);
        assert!(camera.zoom_in(false).is_some());
    }

    #[test]
    fn test_visible_region_zero_without_viewport() {
        let camera = CameraState::new(&MapConfig::default());
        assert_eq!(camera.visible_region(), VisibleRegion::zero());
    }
}
