pub mod bounds;
pub mod builder;
pub mod camera;
pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod projection;

// Re-export the essential types
pub use builder::MapBuilder;
pub use camera::{CameraPose, CameraState, CameraUpdate, NativeCamera};
pub use config::{CameraBackend, MapConfig, ZoomPreference};
pub use geo::{CoordinateSpan, LatLng, Point, Size, VisibleRegion};
pub use map::MapController;
