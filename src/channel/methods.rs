use crate::{
    annotations::annotation::Annotation,
    channel::codec::{
        decode, decode_annotations, AnnotationDict, AnnotationUpdatesDict, CameraBoundsDict,
        CameraPositionDict, MapOptionsDict,
    },
    core::config::MapConfig,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An inbound call: method name plus its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// A decoded inbound call
#[derive(Debug, Clone, PartialEq)]
pub enum MapMethod {
    UpdateAnnotations {
        add: Vec<Annotation>,
        change: Vec<Annotation>,
        remove: Vec<String>,
    },
    AddAnnotations(Vec<Annotation>),
    ChangeAnnotations(Vec<Annotation>),
    RemoveAnnotations(Vec<String>),
    RemoveAllAnnotations,
    ShowAnnotation(String),
    HideAnnotation(String),
    IsAnnotationSelected(String),
    SetCameraPosition {
        position: CameraPositionDict,
        animated: bool,
    },
    SetCameraBounds {
        bounds: CameraBoundsDict,
        animated: bool,
    },
    ZoomIn {
        animated: bool,
    },
    ZoomOut {
        animated: bool,
    },
    ZoomTo {
        zoom: f64,
        animated: bool,
    },
    ZoomBy {
        delta: f64,
        animated: bool,
    },
    GetZoomLevel,
    GetVisibleRegion,
    UpdateOptions(MapOptionsDict),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationIdArgs {
    annotation_id: String,
}

#[derive(Deserialize)]
struct AnimatedArgs {
    #[serde(default)]
    animated: bool,
}

#[derive(Deserialize)]
struct PositionArgs {
    position: CameraPositionDict,
    #[serde(default)]
    animated: bool,
}

#[derive(Deserialize)]
struct BoundsArgs {
    bounds: CameraBoundsDict,
    #[serde(default)]
    animated: bool,
}

#[derive(Deserialize)]
struct ZoomToArgs {
    zoom: f64,
    #[serde(default)]
    animated: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZoomByArgs {
    zoom_by: f64,
    #[serde(default)]
    animated: bool,
}

#[derive(Deserialize)]
struct OptionsArgs {
    options: MapOptionsDict,
}

impl MapMethod {
    /// Decodes a call in full, so a bad payload never half-applies
    pub fn decode(call: &MethodCall, config: &MapConfig) -> Result<Self> {
        let args = &call.arguments;
        let method = match call.method.as_str() {
            "annotations#update" => {
                let updates: AnnotationUpdatesDict = decode(args, "annotation updates")?;
                MapMethod::UpdateAnnotations {
                    add: decode_annotations(updates.annotations_to_add, config)?,
                    change: decode_annotations(updates.annotations_to_change, config)?,
                    remove: updates.annotation_ids_to_remove,
                }
            }
            "annotations#add" => {
                let dicts: Vec<AnnotationDict> = decode(args, "annotations to add")?;
                MapMethod::AddAnnotations(decode_annotations(dicts, config)?)
            }
            "annotations#change" => {
                let dicts: Vec<AnnotationDict> = decode(args, "annotations to change")?;
                MapMethod::ChangeAnnotations(decode_annotations(dicts, config)?)
            }
            "annotations#remove" => MapMethod::RemoveAnnotations(decode(args, "annotation ids")?),
            "annotations#removeAll" => MapMethod::RemoveAllAnnotations,
            "annotations#showInfoWindow" => {
                let args: AnnotationIdArgs = decode(args, "annotation id")?;
                MapMethod::ShowAnnotation(args.annotation_id)
            }
            "annotations#hideInfoWindow" => {
                let args: AnnotationIdArgs = decode(args, "annotation id")?;
                MapMethod::HideAnnotation(args.annotation_id)
            }
            "annotations#isInfoWindowShown" => {
                let args: AnnotationIdArgs = decode(args, "annotation id")?;
                MapMethod::IsAnnotationSelected(args.annotation_id)
            }
            "camera#setPosition" => {
                let args: PositionArgs = decode(args, "camera position")?;
                MapMethod::SetCameraPosition {
                    position: args.position,
                    animated: args.animated,
                }
            }
            "camera#setBounds" => {
                let args: BoundsArgs = decode(args, "camera bounds")?;
                MapMethod::SetCameraBounds {
                    bounds: args.bounds,
                    animated: args.animated,
                }
            }
            "camera#zoomIn" => MapMethod::ZoomIn {
                animated: decode_animated(args)?,
            },
            "camera#zoomOut" => MapMethod::ZoomOut {
                animated: decode_animated(args)?,
            },
            "camera#zoomTo" => {
                let args: ZoomToArgs = decode(args, "zoom")?;
                MapMethod::ZoomTo {
                    zoom: args.zoom,
                    animated: args.animated,
                }
            }
            "camera#zoomBy" => {
                let args: ZoomByArgs = decode(args, "zoom delta")?;
                MapMethod::ZoomBy {
                    delta: args.zoom_by,
                    animated: args.animated,
                }
            }
            "camera#getZoomLevel" => MapMethod::GetZoomLevel,
            "map#getVisibleRegion" => MapMethod::GetVisibleRegion,
            "map#update" => {
                let args: OptionsArgs = decode(args, "map options")?;
                MapMethod::UpdateOptions(args.options)
            }
            other => return Err(MapError::UnknownMethod(other.to_string())),
        };
        Ok(method)
    }
}

/// `animated` may be omitted entirely, or the arguments may be null
fn decode_animated(args: &Value) -> Result<bool> {
    if args.is_null() {
        return Ok(false);
    }
    let args: AnimatedArgs = decode(args, "animated flag")?;
    Ok(args.animated)
}

/// Reply to an inbound call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodResponse {
    Result(Value),
    Error { code: String, message: String },
}

impl MethodResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, MethodResponse::Error { .. })
    }
}

impl From<Result<Value>> for MethodResponse {
    fn from(result: Result<Value>) -> Self {
        match result {
            Ok(value) => MethodResponse::Result(value),
            Err(e) => MethodResponse::Error {
                code: e.code().to_string(),
                message: e.to_string(),
            },
        }
    }
}
