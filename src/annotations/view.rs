//! What a native annotation view should look like.
//!
//! [`materialize`] turns an [`Annotation`] into a [`ViewSpec`]; the rendering
//! surface is responsible for making its view match.

use crate::annotations::annotation::{Annotation, AnnotationIcon, IconType};
use crate::core::{
    constants::{CUSTOM_VIEW_SIZE, MARKER_VIEW_SIZE, PIN_VIEW_SIZE, ROTATION_ANIMATION_SECS},
    geo::Point,
};
use serde::{Deserialize, Serialize};

/// Native widget class. Fixed when a view is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    Pin,
    Marker,
    Custom,
}

impl From<IconType> for ViewKind {
    fn from(icon_type: IconType) -> Self {
        match icon_type {
            IconType::Pin => ViewKind::Pin,
            IconType::Marker => ViewKind::Marker,
            IconType::CustomFromAsset | IconType::CustomFromBytes => ViewKind::Custom,
        }
    }
}

/// Frame of a view in points, relative to its own position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewFrame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Frame used when the surface has not measured the icon's image
    pub fn for_icon(icon: &AnnotationIcon) -> Self {
        match icon {
            AnnotationIcon::Pin => Self::sized(PIN_VIEW_SIZE.0, PIN_VIEW_SIZE.1),
            AnnotationIcon::Marker => Self::sized(MARKER_VIEW_SIZE.0, MARKER_VIEW_SIZE.1),
            AnnotationIcon::Asset { scale, .. } | AnnotationIcon::Bytes { scale, .. } => {
                Self::sized(CUSTOM_VIEW_SIZE.0 * scale, CUSTOM_VIEW_SIZE.1 * scale)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callout {
    Disabled,
    /// Platform callout showing title and subtitle as-is
    Native,
    /// Subtitle lines stacked vertically in source order; the title stays native
    Stacked { lines: Vec<String> },
}

/// Rotation to animate the view to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationTransform {
    pub angle_radians: f64,
    pub duration_secs: f64,
}

impl RotationTransform {
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            angle_radians: degrees * std::f64::consts::PI / 180.0,
            duration_secs: ROTATION_ANIMATION_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    pub kind: ViewKind,
    pub callout: Callout,
    pub alpha: f64,
    pub draggable: bool,
    pub rotation: Option<RotationTransform>,
    pub z_position: f64,
    pub callout_offset: Option<Point>,
    pub center_offset: Option<Point>,
    /// Image for custom views
    pub image: Option<AnnotationIcon>,
}

/// Whether the surface can keep its current view for this annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewDisposition {
    Create,
    Reuse,
}

/// Computes the view for `annotation`.
///
/// `previous` is the icon type of the view currently shown for the same id;
/// a different type cannot be reused because the widget class differs.
pub fn materialize(
    annotation: &Annotation,
    frame: ViewFrame,
    previous: Option<IconType>,
) -> (ViewDisposition, ViewSpec) {
    let icon_type = annotation.icon_type();
    let disposition = match previous {
        Some(previous) if previous == icon_type => ViewDisposition::Reuse,
        _ => ViewDisposition::Create,
    };

    let image = match &annotation.icon {
        icon @ (AnnotationIcon::Asset { .. } | AnnotationIcon::Bytes { .. }) => Some(icon.clone()),
        AnnotationIcon::Pin | AnnotationIcon::Marker => None,
    };

    // Hidden annotations keep their view but can't be seen or interacted with.
    if !annotation.is_visible {
        let spec = ViewSpec {
            kind: icon_type.into(),
            callout: Callout::Disabled,
            alpha: 0.0,
            draggable: false,
            rotation: None,
            z_position: annotation.z_position,
            callout_offset: None,
            center_offset: None,
            image,
        };
        return (disposition, spec);
    }

    let (callout, callout_offset, center_offset) = match icon_type {
        IconType::Marker => (Callout::Native, None, None),
        IconType::Pin => (
            stacked_callout(annotation),
            Some(callout_offset(annotation, frame)),
            None,
        ),
        IconType::CustomFromAsset | IconType::CustomFromBytes => (
            stacked_callout(annotation),
            Some(callout_offset(annotation, frame)),
            Some(center_offset(annotation, frame)),
        ),
    };

    let spec = ViewSpec {
        kind: icon_type.into(),
        callout,
        alpha: annotation.alpha,
        draggable: annotation.is_draggable,
        rotation: annotation.rotation.map(RotationTransform::from_degrees),
        z_position: annotation.z_position,
        callout_offset,
        center_offset,
        image,
    };
    (disposition, spec)
}

fn stacked_callout(annotation: &Annotation) -> Callout {
    let lines = annotation.subtitle_lines();
    if lines.len() > 1 {
        Callout::Stacked { lines }
    } else {
        Callout::Native
    }
}

/// Pins measure x back from the frame's far edge; other views from its near edge.
fn callout_offset(annotation: &Annotation, frame: ViewFrame) -> Point {
    let anchor = annotation.callout_anchor;
    let x = match annotation.icon_type() {
        IconType::Pin => frame.x - (frame.x + frame.width) * anchor.x,
        _ => frame.x + frame.width * anchor.x,
    };
    Point::new(x, frame.height * anchor.y)
}

/// Shifts a custom image so its anchor sits on the coordinate.
fn center_offset(annotation: &Annotation, frame: ViewFrame) -> Point {
    let anchor = annotation.anchor;
    Point::new(
        frame.width * (0.5 - anchor.x),
        frame.height * (0.5 - anchor.y),
    )
}
