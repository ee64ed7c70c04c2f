//! Strongly typed forms of the payloads the external controller sends.
//!
//! Decoding happens before anything is applied: a malformed entry fails the
//! whole call with [`MapError::InvalidArgument`].

use crate::{
    annotations::annotation::{Anchor, Annotation, AnnotationIcon},
    core::{
        config::{MapConfig, ZoomPreference},
        geo::LatLng,
    },
    MapError, Result,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InfoWindowDict {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub anchor: Option<Anchor>,
}

/// One annotation as sent over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDict {
    pub annotation_id: String,
    pub position: LatLng,
    pub info_window: InfoWindowDict,
    pub visible: Option<bool>,
    pub draggable: Option<bool>,
    pub rotation: Option<f64>,
    pub alpha: Option<f64>,
    pub z_index: Option<f64>,
    pub anchor: Option<Anchor>,
    /// `[kind, ...]`, see [`decode_icon`]
    pub icon: Option<Vec<Value>>,
}

impl AnnotationDict {
    pub fn into_annotation(self, config: &MapConfig) -> Result<Annotation> {
        let mut annotation = Annotation::new(self.annotation_id, self.position);
        annotation.title = self.info_window.title;
        annotation.subtitle = self.info_window.snippet;
        if let Some(anchor) = self.info_window.anchor {
            annotation.callout_anchor = anchor;
        }
        if let Some(anchor) = self.anchor {
            annotation.anchor = anchor;
        }
        if let Some(icon) = self.icon {
            annotation.icon = decode_icon(&icon, config)?;
        }

        annotation.rotation = self.rotation;

        Ok(annotation
            .with_visible(self.visible.unwrap_or(true))
            .with_draggable(self.draggable.unwrap_or(false))
            .with_alpha(self.alpha.unwrap_or(1.0))
            .with_z_position(self.z_index.unwrap_or(0.0)))
    }
}

/// Decodes `[kind, ...]` icon descriptors.
///
/// * `["defaultAnnotation"]` pin
/// * `["markerAnnotation"]` marker
/// * `["fromAssetImage", path, scale?]` bundled image
/// * `["fromBytes", [u8...], scale?]` inline image
///
/// Unknown kinds fall back to a pin.
pub fn decode_icon(data: &[Value], config: &MapConfig) -> Result<AnnotationIcon> {
    let kind = data
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| MapError::InvalidArgument("icon kind must be a string".to_string()))?;
    let scale = data.get(2).and_then(Value::as_f64).unwrap_or(1.0);

    match kind {
        "defaultAnnotation" => Ok(AnnotationIcon::Pin),
        "markerAnnotation" => Ok(AnnotationIcon::Marker),
        "fromAssetImage" => {
            let path = data.get(1).and_then(Value::as_str).ok_or_else(|| {
                MapError::InvalidArgument("fromAssetImage icon needs an asset path".to_string())
            })?;
            Ok(AnnotationIcon::Asset {
                key: config.asset_key(path),
                scale,
            })
        }
        "fromBytes" => {
            let bytes = data.get(1).ok_or_else(|| {
                MapError::InvalidArgument("fromBytes icon needs image bytes".to_string())
            })?;
            Ok(AnnotationIcon::Bytes {
                data: decode(bytes, "icon bytes")?,
                scale,
            })
        }
        other => {
            log::debug!("unknown icon kind '{}', using a pin", other);
            Ok(AnnotationIcon::Pin)
        }
    }
}

/// Camera target as sent over the wire; omitted fields keep their current value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraPositionDict {
    pub target: Option<LatLng>,
    pub zoom: Option<f64>,
    pub pitch: Option<f64>,
    pub heading: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraBoundsDict {
    pub target: Vec<LatLng>,
    pub padding: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptionsDict {
    pub min_max_zoom_preference: Option<ZoomPreference>,
}

/// Payload of the combined annotation update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationUpdatesDict {
    #[serde(default)]
    pub annotations_to_add: Vec<AnnotationDict>,
    #[serde(default)]
    pub annotations_to_change: Vec<AnnotationDict>,
    #[serde(default)]
    pub annotation_ids_to_remove: Vec<String>,
}

/// Parameters the host passes when the map view is created
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationParams {
    pub initial_camera_position: Option<CameraPositionDict>,
    pub options: Option<MapOptionsDict>,
    #[serde(default)]
    pub annotations_to_add: Vec<AnnotationDict>,
}

/// Deserializes `value`, reporting failures as invalid arguments naming `what`
pub fn decode<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T> {
    T::deserialize(value).map_err(|e| MapError::InvalidArgument(format!("{}: {}", what, e)))
}

/// Decodes a list of annotation payloads, failing on the first bad entry
pub fn decode_annotations(dicts: Vec<AnnotationDict>, config: &MapConfig) -> Result<Vec<Annotation>> {
    dicts
        .into_iter()
        .map(|dict| dict.into_annotation(config))
        .collect()
}
