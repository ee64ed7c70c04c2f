pub mod annotation;
pub mod controller;
pub mod view;

pub use annotation::{Anchor, Annotation, AnnotationIcon, IconType};
pub use controller::{AnnotationController, DisplayedAnnotation, ReconcileReport};
pub use view::{materialize, Callout, ViewDisposition, ViewFrame, ViewKind, ViewSpec};
