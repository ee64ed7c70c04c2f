//! # mapbridge
//!
//! The core of a bridge between a cross-platform UI layer and a native map
//! view. An external controller sends declarative annotation and camera
//! updates; this crate reconciles them against what is displayed and turns
//! zoom levels into the native camera representation.
//!
//! The native side sits behind [`MapSurface`](rendering::surface::MapSurface):
//! the core decides what views and camera poses should exist and the surface
//! makes them so.

pub mod annotations;
pub mod channel;
pub mod core;
pub mod prelude;
pub mod rendering;
pub use crate::core::constants;

// Re-export public API
pub use annotations::{
    annotation::{Anchor, Annotation, AnnotationIcon, IconType},
    controller::{AnnotationController, ReconcileReport},
};

pub use channel::{
    events::{event_channel, EventSink, MapEvent},
    methods::{MapMethod, MethodCall, MethodResponse},
};

pub use crate::core::{
    builder::MapBuilder,
    camera::{CameraPose, CameraUpdate, NativeCamera},
    config::{CameraBackend, MapConfig},
    geo::{LatLng, Size, VisibleRegion},
    map::MapController,
};

pub use rendering::surface::{LoggingSurface, MapSurface, RecordingSurface, SurfaceCommand};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A payload did not have the expected shape; the whole call is rejected
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl MapError {
    /// Stable code sent in error replies
    pub fn code(&self) -> &'static str {
        match self {
            MapError::InvalidArgument(_) => "invalid_argument",
            MapError::UnknownMethod(_) => "unknown_method",
            MapError::Serialization(_) => "serialization",
            MapError::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Error type alias for convenience
pub type Error = MapError;

/// Initialise `env_logger` from `RUST_LOG`. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "debug")]
    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
        log::info!("logging initialised");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(MapError::InvalidArgument("x".into()).code(), "invalid_argument");
        assert_eq!(MapError::UnknownMethod("x".into()).code(), "unknown_method");
    }
}
