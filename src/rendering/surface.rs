use crate::{
    annotations::{
        annotation::{Annotation, AnnotationIcon},
        view::{ViewFrame, ViewSpec},
    },
    core::{camera::CameraUpdate, geo::LatLng},
    prelude::HashMap,
};
use serde::{Deserialize, Serialize};

/// Identity of one native annotation view. A recreated view gets a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewHandle(pub u64);

impl std::fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// A mutation the native map view has to perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceCommand {
    CreateView {
        handle: ViewHandle,
        annotation_id: String,
        coordinate: LatLng,
        title: Option<String>,
        spec: ViewSpec,
    },
    UpdateView {
        handle: ViewHandle,
        annotation_id: String,
        coordinate: LatLng,
        title: Option<String>,
        spec: ViewSpec,
    },
    RemoveView {
        handle: ViewHandle,
        annotation_id: String,
    },
    SelectView {
        handle: ViewHandle,
    },
    DeselectView {
        handle: ViewHandle,
    },
    MoveCamera(CameraUpdate),
}

/// The native rendering boundary.
///
/// Implementations own the actual views and camera; the core only tells
/// them what state to reach.
pub trait MapSurface {
    fn apply(&mut self, command: SurfaceCommand);

    /// Frame the view for `annotation` will have, used for callout and
    /// center offsets. Surfaces that know their image sizes override this.
    fn view_frame(&self, annotation: &Annotation) -> ViewFrame {
        ViewFrame::for_icon(&annotation.icon)
    }
}

/// Keeps every command in order. Used headless and in tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<SurfaceCommand>,
    asset_sizes: HashMap<String, (f64, f64)>,
    bytes_sizes: HashMap<Vec<u8>, (f64, f64)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the unscaled size of a bundled image, keyed by asset key
    pub fn with_image_size(mut self, key: impl Into<String>, width: f64, height: f64) -> Self {
        self.asset_sizes.insert(key.into(), (width, height));
        self
    }

    /// Registers the unscaled size of an inline image, keyed by its encoded bytes
    pub fn with_bytes_image_size(mut self, data: impl Into<Vec<u8>>, width: f64, height: f64) -> Self {
        self.bytes_sizes.insert(data.into(), (width, height));
        self
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Removes and returns everything recorded so far
    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl MapSurface for RecordingSurface {
    fn apply(&mut self, command: SurfaceCommand) {
        self.commands.push(command);
    }

    fn view_frame(&self, annotation: &Annotation) -> ViewFrame {
        let measured = match &annotation.icon {
            AnnotationIcon::Asset { key, .. } => self.asset_sizes.get(key),
            AnnotationIcon::Bytes { data, .. } => self.bytes_sizes.get(data),
            AnnotationIcon::Pin | AnnotationIcon::Marker => None,
        };
        match (measured, annotation.icon.scale()) {
            (Some((width, height)), Some(scale)) => ViewFrame::sized(width * scale, height * scale),
            _ => ViewFrame::for_icon(&annotation.icon),
        }
    }
}

/// Writes every command to the log at debug level
#[derive(Debug, Default)]
pub struct LoggingSurface {
    applied: usize,
}

impl LoggingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl MapSurface for LoggingSurface {
    fn apply(&mut self, command: SurfaceCommand) {
        self.applied += 1;
        match &command {
            SurfaceCommand::CreateView {
                handle,
                annotation_id,
                spec,
                ..
            } => log::debug!("create {} for '{}' ({:?})", handle, annotation_id, spec.kind),
            SurfaceCommand::UpdateView {
                handle,
                annotation_id,
                ..
            } => log::debug!("update {} for '{}'", handle, annotation_id),
            SurfaceCommand::RemoveView {
                handle,
                annotation_id,
            } => log::debug!("remove {} for '{}'", handle, annotation_id),
            SurfaceCommand::SelectView { handle } => log::debug!("select {}", handle),
            SurfaceCommand::DeselectView { handle } => log::debug!("deselect {}", handle),
            SurfaceCommand::MoveCamera(update) => log::debug!(
                "move camera to ({:.6}, {:.6}) zoom {:.2} animated={}",
                update.pose.target.lat,
                update.pose.target.lng,
                update.pose.zoom,
                update.animated
            ),
        }
    }
}
