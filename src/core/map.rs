//! The map controller: one per native map view.
//!
//! [`MapController`] owns the camera state, the annotation engine, the
//! rendering surface and the outbound event sink. Calls arrive either typed
//! (the methods below) or as wire [`MethodCall`]s through [`MapController::handle`].

use crate::{
    annotations::{
        annotation::Annotation,
        controller::{AnnotationController, ReconcileReport},
    },
    channel::{
        codec::{decode_annotations, CameraBoundsDict, CameraPositionDict, CreationParams, MapOptionsDict},
        events::{EventSink, MapEvent},
        methods::{MapMethod, MethodCall, MethodResponse},
    },
    core::{
        camera::{CameraPose, CameraState, CameraUpdate},
        config::MapConfig,
        geo::{LatLng, Size, VisibleRegion},
    },
    rendering::surface::{MapSurface, SurfaceCommand},
    Result,
};
use serde_json::Value;

pub struct MapController<S: MapSurface> {
    config: MapConfig,
    camera: CameraState,
    annotations: AnnotationController,
    surface: S,
    events: EventSink,
}

impl<S: MapSurface> MapController<S> {
    pub fn new(config: MapConfig, surface: S, events: EventSink) -> Result<Self> {
        config.validate()?;
        let camera = CameraState::new(&config);
        Ok(Self {
            config,
            camera,
            annotations: AnnotationController::new(events.clone()),
            surface,
            events,
        })
    }

    /// Applies the parameters the view was created with.
    ///
    /// Everything is decoded before anything is applied; then options,
    /// camera and annotations are applied in that order.
    pub fn apply_creation_params(&mut self, params: CreationParams) -> Result<()> {
        let annotations = decode_annotations(params.annotations_to_add, &self.config)?;

        if let Some(options) = params.options {
            self.update_options(options);
        }
        if let Some(position) = params.initial_camera_position {
            self.set_camera_position(position, false);
        }
        if !annotations.is_empty() {
            self.add_annotations(annotations);
        }
        Ok(())
    }

    /// Decodes and runs one wire call
    pub fn handle(&mut self, call: &MethodCall) -> Result<Value> {
        let method = MapMethod::decode(call, &self.config)?;
        Ok(self.dispatch(method))
    }

    /// Like [`handle`](Self::handle), folding failures into the reply
    pub fn handle_message(&mut self, call: &MethodCall) -> MethodResponse {
        let result = self.handle(call);
        if let Err(e) = &result {
            log::warn!("{} rejected: {}", call.method, e);
        }
        MethodResponse::from(result)
    }

    /// Runs an already decoded call
    pub fn dispatch(&mut self, method: MapMethod) -> Value {
        match method {
            MapMethod::UpdateAnnotations { add, change, remove } => {
                self.update_annotations(add, change, &remove);
                Value::Null
            }
            MapMethod::AddAnnotations(annotations) => {
                self.add_annotations(annotations);
                Value::Null
            }
            MapMethod::ChangeAnnotations(annotations) => {
                self.change_annotations(annotations);
                Value::Null
            }
            MapMethod::RemoveAnnotations(ids) => {
                self.remove_annotations(&ids);
                Value::Null
            }
            MapMethod::RemoveAllAnnotations => {
                self.remove_all_annotations();
                Value::Null
            }
            MapMethod::ShowAnnotation(id) => {
                self.show_annotation(&id);
                Value::Null
            }
            MapMethod::HideAnnotation(id) => {
                self.hide_annotation(&id);
                Value::Null
            }
            MapMethod::IsAnnotationSelected(id) => Value::Bool(self.is_annotation_selected(&id)),
            MapMethod::SetCameraPosition { position, animated } => {
                self.set_camera_position(position, animated);
                Value::Null
            }
            MapMethod::SetCameraBounds { bounds, animated } => {
                self.set_camera_bounds(bounds, animated);
                Value::Null
            }
            MapMethod::ZoomIn { animated } => {
                self.zoom_in(animated);
                Value::Null
            }
            MapMethod::ZoomOut { animated } => {
                self.zoom_out(animated);
                Value::Null
            }
            MapMethod::ZoomTo { zoom, animated } => {
                self.zoom_to(zoom, animated);
                Value::Null
            }
            MapMethod::ZoomBy { delta, animated } => {
                self.zoom_by(delta, animated);
                Value::Null
            }
            MapMethod::GetZoomLevel => Value::from(self.zoom_level()),
            MapMethod::GetVisibleRegion => {
                let region = self.visible_region();
                serde_json::json!({
                    "northeast": [region.northeast.lat, region.northeast.lng],
                    "southwest": [region.southwest.lat, region.southwest.lng],
                })
            }
            MapMethod::UpdateOptions(options) => {
                self.update_options(options);
                Value::Null
            }
        }
    }

    /// Adds, then changes, then removes, as one pass
    pub fn update_annotations(
        &mut self,
        add: Vec<Annotation>,
        change: Vec<Annotation>,
        remove: &[String],
    ) -> ReconcileReport {
        let mut report = self.annotations.apply_adds(add, &mut self.surface);
        report.merge(self.annotations.apply_changes(change, &mut self.surface));
        report.merge(self.annotations.apply_removals(remove, &mut self.surface));
        report
    }

    pub fn add_annotations(&mut self, annotations: Vec<Annotation>) -> ReconcileReport {
        self.annotations.apply_adds(annotations, &mut self.surface)
    }

    pub fn change_annotations(&mut self, annotations: Vec<Annotation>) -> ReconcileReport {
        self.annotations.apply_changes(annotations, &mut self.surface)
    }

    pub fn remove_annotations(&mut self, ids: &[String]) -> ReconcileReport {
        self.annotations.apply_removals(ids, &mut self.surface)
    }

    pub fn remove_all_annotations(&mut self) -> ReconcileReport {
        self.annotations.remove_all(&mut self.surface)
    }

    pub fn show_annotation(&mut self, id: &str) -> bool {
        self.annotations.select(id, &mut self.surface)
    }

    pub fn hide_annotation(&mut self, id: &str) -> bool {
        self.annotations.deselect(id, &mut self.surface)
    }

    pub fn is_annotation_selected(&self, id: &str) -> bool {
        self.annotations.is_selected(id)
    }

    pub fn set_camera_position(&mut self, position: CameraPositionDict, animated: bool) -> CameraUpdate {
        let update = self.camera.set_center(
            position.target,
            position.zoom,
            position.pitch,
            position.heading,
            animated,
        );
        self.move_camera(update);
        update
    }

    /// Fits the camera to the target coordinates; no-op for an empty list
    pub fn set_camera_bounds(&mut self, bounds: CameraBoundsDict, animated: bool) -> Option<CameraUpdate> {
        let padding = bounds.padding.unwrap_or(0.0);
        let update = self.camera.fit_bounds(&bounds.target, padding, animated);
        match update {
            Some(update) => self.move_camera(update),
            None => log::debug!("camera bounds without targets ignored"),
        }
        update
    }

    pub fn zoom_in(&mut self, animated: bool) -> Option<CameraUpdate> {
        let update = self.camera.zoom_in(animated);
        if let Some(update) = update {
            self.move_camera(update);
        }
        update
    }

    pub fn zoom_out(&mut self, animated: bool) -> Option<CameraUpdate> {
        let update = self.camera.zoom_out(animated);
        if let Some(update) = update {
            self.move_camera(update);
        }
        update
    }

    pub fn zoom_to(&mut self, zoom: f64, animated: bool) -> CameraUpdate {
        let update = self.camera.zoom_to(zoom, animated);
        self.move_camera(update);
        update
    }

    pub fn zoom_by(&mut self, delta: f64, animated: bool) -> CameraUpdate {
        let update = self.camera.zoom_by(delta, animated);
        self.move_camera(update);
        update
    }

    pub fn set_min_zoom(&mut self, min_zoom: f64) {
        if let Some(update) = self.camera.set_min_zoom(min_zoom) {
            self.move_camera(update);
        }
    }

    pub fn set_max_zoom(&mut self, max_zoom: f64) {
        if let Some(update) = self.camera.set_max_zoom(max_zoom) {
            self.move_camera(update);
        }
    }

    pub fn update_options(&mut self, options: MapOptionsDict) {
        if let Some(pref) = options.min_max_zoom_preference {
            if let Some(min) = pref.min {
                self.set_min_zoom(min);
            }
            if let Some(max) = pref.max {
                self.set_max_zoom(max);
            }
        }
    }

    pub fn zoom_level(&self) -> f64 {
        self.camera.zoom()
    }

    pub fn visible_region(&self) -> VisibleRegion {
        self.camera.visible_region()
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.camera.set_viewport_size(size);
    }

    /// The user pressed on an annotation view and may start dragging it
    pub fn on_annotation_drag_start(&mut self, id: &str) -> bool {
        self.annotations.on_drag_start(id)
    }

    pub fn on_annotation_tap(&mut self, id: &str) -> bool {
        self.annotations.on_tap(id)
    }

    pub fn on_annotation_drag_end(&mut self, id: &str, position: LatLng) -> bool {
        self.annotations.on_drag_end(id, position)
    }

    /// The user moved the native camera. A bad altitude is rejected and nothing is emitted.
    pub fn on_camera_moved(
        &mut self,
        center: LatLng,
        altitude: f64,
        pitch: f64,
        heading: f64,
    ) -> Result<CameraPose> {
        let pose = self.camera.on_camera_moved(center, altitude, pitch, heading)?;
        self.events.emit(MapEvent::CameraMoved { position: pose });
        Ok(pose)
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn annotations(&self) -> &AnnotationController {
        &self.annotations
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn move_camera(&mut self, update: CameraUpdate) {
        self.surface.apply(SurfaceCommand::MoveCamera(update));
    }
}
