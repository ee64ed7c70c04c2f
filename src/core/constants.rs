//! Core constants for the zoom/camera projection and annotation views.
//! Keeping them in a single place makes it easier to keep native parity.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Earth's circumference at the equator in meters.
pub const EARTH_CIRCUMFERENCE: f64 = 40_075_016.686;

/// Half the circumference; the map width used for the distance-per-pixel derivation.
pub const MAP_WIDTH_AT_REFERENCE_ZOOM: f64 = EARTH_CIRCUMFERENCE / 2.0;

/// Zoom level at which the shared pixel space is defined.
pub const REFERENCE_ZOOM: f64 = 21.0;

/// Half the pixel-space width at the reference zoom (256 * 2^21 / 2).
pub const MERCATOR_OFFSET: f64 = 268_435_456.0;

/// `MERCATOR_OFFSET / π`.
pub const MERCATOR_RADIUS: f64 = 85_445_659.447_053_95;

/// Zoom levels above this are clamped before projecting, to keep the scale sane.
pub const MAX_PROJECTION_ZOOM: f64 = 28.0;

/// Camera field of view in degrees.
pub const FIELD_OF_VIEW_DEGREES: f64 = 15.0;

/// Default lower zoom bound.
pub const DEFAULT_MIN_ZOOM: f64 = 2.0;

/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: f64 = 21.0;

/// `zoom_in` snaps anything below this up to it before stepping.
pub const ZOOM_IN_FLOOR: f64 = 2.0;

/// Programmatic +/- zoom step when calling `zoom_in/zoom_out`.
pub const DEFAULT_ZOOM_DELTA: f64 = 1.0;

/// Default device pixel ratio.
pub const DEFAULT_SCREEN_SCALE: f64 = 2.0;

/// Duration of the rotation transform applied to annotation views.
pub const ROTATION_ANIMATION_SECS: f64 = 1.0;

/// Native pin view size in points.
pub const PIN_VIEW_SIZE: (f64, f64) = (32.0, 39.0);

/// Native marker balloon size in points.
pub const MARKER_VIEW_SIZE: (f64, f64) = (28.0, 28.0);

/// Fallback size for custom images the surface has not measured yet.
pub const CUSTOM_VIEW_SIZE: (f64, f64) = (32.0, 32.0);

/// Icon hot-spot as a fraction of the view (bottom-center).
pub const DEFAULT_ICON_ANCHOR: (f64, f64) = (0.5, 1.0);

/// Callout anchor as a fraction of the view (top-center).
pub const DEFAULT_CALLOUT_ANCHOR: (f64, f64) = (0.5, 0.0);

/// Prefix the host bundle puts in front of asset paths.
pub const DEFAULT_ASSET_KEY_PREFIX: &str = "flutter_assets/";
