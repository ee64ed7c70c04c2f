use anyhow::{bail, Context};
use mapbridge::{
    channel::codec::decode,
    core::geo::{LatLng, Size},
    event_channel, LoggingSurface, MapBuilder, MapConfig, MapController, MapError, MethodCall,
    MethodResponse,
};
use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, Write};

/// Callbacks the native view would make; lets a script play the user's part
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NativeArgs {
    annotation_id: Option<String>,
    position: Option<LatLng>,
    altitude: Option<f64>,
    pitch: Option<f64>,
    heading: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

/// Headless map host: one JSON call per stdin line, replies and events on stdout
fn main() -> anyhow::Result<()> {
    mapbridge::init_logging();

    let config = match config_path()? {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            MapConfig::from_json_str(&json).with_context(|| format!("parsing config {}", path))?
        }
        None => MapConfig::default(),
    };

    let (events, receiver) = event_channel();
    let mut map = MapBuilder::new()
        .with_config(config)
        .with_event_sink(events)
        .build(LoggingSurface::new())?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<MethodCall>(&line) {
            Ok(call) if call.method.starts_with("native#") => handle_native(&mut map, &call),
            Ok(call) => map.handle_message(&call),
            Err(e) => MethodResponse::from(Err::<Value, _>(MapError::from(e))),
        };
        writeln!(out, "{}", serde_json::to_string(&reply)?)?;

        for event in receiver.try_iter() {
            writeln!(out, "{}", serde_json::to_string(&event.to_wire())?)?;
        }
        out.flush()?;
    }

    log::info!("stdin closed after {} surface commands", map.surface().applied());
    Ok(())
}

fn config_path() -> anyhow::Result<Option<String>> {
    let mut args = std::env::args().skip(1);
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(value) => path = Some(value),
                None => bail!("--config needs a path"),
            },
            other => bail!("unknown argument {}", other),
        }
    }
    Ok(path)
}

fn handle_native(map: &mut MapController<LoggingSurface>, call: &MethodCall) -> MethodResponse {
    let result = decode::<NativeArgs>(&call.arguments, "native callback").and_then(|args| {
        let method = call.method.as_str();
        let value = match method {
            "native#tap" => {
                let id = required(args.annotation_id, "annotationId", method)?;
                Value::Bool(map.on_annotation_tap(&id))
            }
            "native#dragStart" => {
                let id = required(args.annotation_id, "annotationId", method)?;
                Value::Bool(map.on_annotation_drag_start(&id))
            }
            "native#dragEnd" => {
                let id = required(args.annotation_id, "annotationId", method)?;
                let position = required(args.position, "position", method)?;
                Value::Bool(map.on_annotation_drag_end(&id, position))
            }
            "native#cameraMoved" => {
                let pose = map.on_camera_moved(
                    required(args.position, "position", method)?,
                    required(args.altitude, "altitude", method)?,
                    args.pitch.unwrap_or_default(),
                    args.heading.unwrap_or_default(),
                )?;
                Value::from(pose.zoom)
            }
            "native#viewportSize" => {
                map.set_viewport_size(Size::new(
                    required(args.width, "width", method)?,
                    required(args.height, "height", method)?,
                ));
                Value::Null
            }
            other => return Err(MapError::UnknownMethod(other.to_string())),
        };
        Ok(value)
    });
    if let Err(e) = &result {
        log::warn!("{} rejected: {}", call.method, e);
    }
    MethodResponse::from(result)
}

fn required<T>(value: Option<T>, field: &str, method: &str) -> Result<T, MapError> {
    value.ok_or_else(|| MapError::InvalidArgument(format!("{} needs {}", method, field)))
}
