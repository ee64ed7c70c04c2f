use crate::core::{camera::CameraPose, geo::LatLng};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Notifications sent back to the external controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    AnnotationTapped {
        annotation_id: String,
    },
    AnnotationDragEnded {
        annotation_id: String,
        position: LatLng,
    },
    CameraMoved {
        position: CameraPose,
    },
}

/// Wire form of an outbound call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub method: String,
    pub arguments: serde_json::Value,
}

impl MapEvent {
    pub fn method_name(&self) -> &'static str {
        match self {
            MapEvent::AnnotationTapped { .. } => "annotation#onTap",
            MapEvent::AnnotationDragEnded { .. } => "annotation#onDragEnd",
            MapEvent::CameraMoved { .. } => "camera#onMove",
        }
    }

    pub fn to_wire(&self) -> OutboundMessage {
        let arguments = match self {
            MapEvent::AnnotationTapped { annotation_id } => {
                serde_json::json!({ "annotationId": annotation_id })
            }
            MapEvent::AnnotationDragEnded {
                annotation_id,
                position,
            } => serde_json::json!({
                "annotationId": annotation_id,
                "position": [position.lat, position.lng],
            }),
            MapEvent::CameraMoved { position } => serde_json::json!({
                "position": {
                    "target": [position.target.lat, position.target.lng],
                    "zoom": position.zoom,
                    "pitch": position.pitch,
                    "heading": position.heading,
                }
            }),
        };

        OutboundMessage {
            method: self.method_name().to_string(),
            arguments,
        }
    }
}

/// Sending half for outbound events.
///
/// Sending never fails from the caller's point of view: with the receiver
/// gone there is nobody left to tell.
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: Option<Sender<MapEvent>>,
}

impl EventSink {
    /// A sink that drops every event
    pub fn disconnected() -> Self {
        Self { sender: None }
    }

    pub fn emit(&self, event: MapEvent) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(e) = sender.send(event) {
            log::debug!("dropping {} event, receiver gone", e.0.method_name());
        }
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::disconnected()
    }
}

/// Creates a connected sink and the receiver the host drains
pub fn event_channel() -> (EventSink, Receiver<MapEvent>) {
    let (tx, rx) = unbounded();
    (EventSink { sender: Some(tx) }, rx)
}
