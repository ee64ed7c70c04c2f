//! Prelude module for common mapbridge types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use mapbridge::prelude::*;`

pub use crate::core::{
    bounds::MapRect,
    builder::MapBuilder,
    camera::{CameraPose, CameraState, CameraUpdate, NativeCamera},
    config::{CameraBackend, MapConfig, ZoomPreference},
    geo::{CoordinateSpan, LatLng, Point, Size, VisibleRegion},
    map::MapController,
    projection,
};

pub use crate::annotations::{
    annotation::{Anchor, Annotation, AnnotationIcon, IconType},
    controller::{AnnotationController, DisplayedAnnotation, ReconcileReport},
    view::{Callout, ViewFrame, ViewKind, ViewSpec},
};

pub use crate::channel::{
    codec::{AnnotationDict, CameraBoundsDict, CameraPositionDict, CreationParams, MapOptionsDict},
    events::{event_channel, EventSink, MapEvent},
    methods::{MapMethod, MethodCall, MethodResponse},
};

pub use crate::rendering::surface::{
    LoggingSurface, MapSurface, RecordingSurface, SurfaceCommand, ViewHandle,
};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
