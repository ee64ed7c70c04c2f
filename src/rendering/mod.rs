pub mod surface;

pub use surface::{LoggingSurface, MapSurface, RecordingSurface, SurfaceCommand, ViewHandle};
