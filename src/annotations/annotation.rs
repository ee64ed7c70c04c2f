use crate::core::{
    constants::{DEFAULT_CALLOUT_ANCHOR, DEFAULT_ICON_ANCHOR},
    geo::LatLng,
};
use serde::{Deserialize, Serialize};

/// Which kind of native view an icon needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconType {
    Pin,
    Marker,
    CustomFromAsset,
    CustomFromBytes,
}

impl std::fmt::Display for IconType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconType::Pin => write!(f, "pin"),
            IconType::Marker => write!(f, "marker"),
            IconType::CustomFromAsset => write!(f, "custom-asset"),
            IconType::CustomFromBytes => write!(f, "custom-bytes"),
        }
    }
}

/// The icon an annotation is drawn with
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum AnnotationIcon {
    #[default]
    Pin,
    Marker,
    /// Image from the host bundle, `key` being the resolved lookup key
    Asset { key: String, scale: f64 },
    /// Encoded image bytes sent inline
    Bytes { data: Vec<u8>, scale: f64 },
}

impl AnnotationIcon {
    pub fn icon_type(&self) -> IconType {
        match self {
            AnnotationIcon::Pin => IconType::Pin,
            AnnotationIcon::Marker => IconType::Marker,
            AnnotationIcon::Asset { .. } => IconType::CustomFromAsset,
            AnnotationIcon::Bytes { .. } => IconType::CustomFromBytes,
        }
    }

    /// Image scale for custom icons, `None` for native ones
    pub fn scale(&self) -> Option<f64> {
        match self {
            AnnotationIcon::Asset { scale, .. } | AnnotationIcon::Bytes { scale, .. } => {
                Some(*scale)
            }
            AnnotationIcon::Pin | AnnotationIcon::Marker => None,
        }
    }
}

/// A point within a view, as fractions of its width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Bottom-center, where the icon touches its coordinate
    pub fn icon_default() -> Self {
        Self::new(DEFAULT_ICON_ANCHOR.0, DEFAULT_ICON_ANCHOR.1)
    }

    /// Top-center, where the callout bubble attaches
    pub fn callout_default() -> Self {
        Self::new(DEFAULT_CALLOUT_ANCHOR.0, DEFAULT_CALLOUT_ANCHOR.1)
    }
}

impl From<[f64; 2]> for Anchor {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Anchor> for [f64; 2] {
    fn from(anchor: Anchor) -> Self {
        [anchor.x, anchor.y]
    }
}

/// Desired (or displayed) state of one map marker.
///
/// Equality covers every field, including the drag flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    id: String,
    pub coordinate: LatLng,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub icon: AnnotationIcon,
    pub alpha: f64,
    pub is_draggable: bool,
    pub is_visible: bool,
    pub rotation: Option<f64>,
    pub z_position: f64,
    pub anchor: Anchor,
    pub callout_anchor: Anchor,
    pub(crate) was_dragged: bool,
}

impl Annotation {
    pub fn new(id: impl Into<String>, coordinate: LatLng) -> Self {
        Self {
            id: id.into(),
            coordinate,
            title: None,
            subtitle: None,
            icon: AnnotationIcon::default(),
            alpha: 1.0,
            is_draggable: false,
            is_visible: true,
            rotation: None,
            z_position: 0.0,
            anchor: Anchor::icon_default(),
            callout_anchor: Anchor::callout_default(),
            was_dragged: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_icon(mut self, icon: AnnotationIcon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.is_draggable = draggable;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_z_position(mut self, z_position: f64) -> Self {
        self.z_position = z_position;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn icon_type(&self) -> IconType {
        self.icon.icon_type()
    }

    /// Set after a drag or tap until the next change for this id is absorbed
    pub fn was_dragged(&self) -> bool {
        self.was_dragged
    }

    /// Subtitle split on line breaks, in source order. `\r\n` counts as one break.
    pub fn subtitle_lines(&self) -> Vec<String> {
        self.subtitle
            .as_deref()
            .map(|subtitle| {
                subtitle
                    .replace("\r\n", "\n")
                    .split(is_line_break)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Copies every desired-state field from `other`, keeping identity.
    pub(crate) fn assign_from(&mut self, other: Annotation) {
        self.coordinate = other.coordinate;
        self.title = other.title;
        self.subtitle = other.subtitle;
        self.icon = other.icon;
        self.alpha = other.alpha;
        self.is_draggable = other.is_draggable;
        self.is_visible = other.is_visible;
        self.rotation = other.rotation;
        self.z_position = other.z_position;
        self.anchor = other.anchor;
        self.callout_anchor = other.callout_anchor;
        self.was_dragged = other.was_dragged;
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let annotation = Annotation::new("a1", LatLng::new(0.0, 0.0));
        assert_eq!(annotation.id(), "a1");
        assert_eq!(annotation.alpha, 1.0);
        assert!(annotation.is_visible);
        assert!(!annotation.is_draggable);
        assert_eq!(annotation.z_position, 0.0);
        assert_eq!(annotation.icon_type(), IconType::Pin);
        assert!(!annotation.was_dragged());
    }

    #[test]
    fn test_structural_equality() {
        let a = Annotation::new("a1", LatLng::new(1.0, 2.0)).with_title("Cafe");
        let b = Annotation::new("a1", LatLng::new(1.0, 2.0)).with_title("Cafe");
        assert_eq!(a, b);

        let moved = b.clone().with_z_position(3.0);
        assert_ne!(a, moved);

        let mut dragged = a.clone();
        dragged.was_dragged = true;
        assert_ne!(a, dragged);
    }

    #[test]
    fn test_icon_equality() {
        let asset = |key: &str, scale: f64| AnnotationIcon::Asset {
            key: key.to_string(),
            scale,
        };
        assert_eq!(asset("k", 1.0), asset("k", 1.0));
        assert_ne!(asset("k", 1.0), asset("k", 2.0));
        assert_ne!(asset("k", 1.0), asset("j", 1.0));
        assert_ne!(AnnotationIcon::Pin, AnnotationIcon::Marker);
        assert_eq!(asset("k", 1.5).scale(), Some(1.5));
        assert_eq!(AnnotationIcon::Marker.scale(), None);
    }

    #[test]
    fn test_subtitle_lines() {
        let annotation =
            Annotation::new("a1", LatLng::default()).with_subtitle("Open 9-5\r\nClosed Sundays\n\nCash only");
        assert_eq!(
            annotation.subtitle_lines(),
            vec!["Open 9-5", "Closed Sundays", "", "Cash only"]
        );
        assert!(Annotation::new("a2", LatLng::default()).subtitle_lines().is_empty());
    }

    #[test]
    fn test_assign_from_keeps_id() {
        let mut live = Annotation::new("a1", LatLng::new(0.0, 0.0));
        let desired = Annotation::new("a1", LatLng::new(5.0, 5.0)).with_alpha(0.5);
        live.assign_from(desired.clone());
        assert_eq!(live, desired);
    }
}
