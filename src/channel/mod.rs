//! The method channel between the external controller and the map.

pub mod codec;
pub mod events;
pub mod methods;

pub use codec::{AnnotationDict, CameraBoundsDict, CameraPositionDict, CreationParams, MapOptionsDict};
pub use events::{event_channel, EventSink, MapEvent, OutboundMessage};
pub use methods::{MapMethod, MethodCall, MethodResponse};
