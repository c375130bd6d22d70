//! Request/response JSON codec (external boundary, §6): decodes the input
//! envelope consumed by `make_base`/`process_requests` and encodes stat
//! responses. Mechanical by design — no routing or rendering logic lives
//! here, only shape translation between JSON and the crate's own types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::{RoutingSettings, SerializationSettings};
use crate::render::settings::{Color, Point, RenderSettings};
use crate::router::itinerary::Item as ItineraryItem;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not decode input envelope: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("render_settings.{0} must be a color (a string or a 3/4-element array)")]
    InvalidColor(&'static str),
}

/// A `base_requests` entry: either a stop or a bus definition, tagged by
/// `type` as the wire format dictates.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        road_distances: HashMap<String, u32>,
    },
    Bus {
        name: String,
        stops: Vec<String>,
        is_roundtrip: bool,
    },
}

/// A `stat_requests` entry, each carrying an `id` echoed into the response.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    Stop {
        id: i64,
        #[serde(default)]
        name: String,
    },
    Bus {
        id: i64,
        #[serde(default)]
        name: String,
    },
    Map {
        id: i64,
    },
    Route {
        id: i64,
        from: String,
        to: String,
    },
}

/// The decoded top-level envelope. Every key is optional per §6: a missing
/// key just means that phase is skipped.
#[derive(Debug)]
pub struct InputEnvelope {
    pub base_requests: Vec<BaseRequest>,
    pub render_settings: RenderSettings,
    pub routing_settings: RoutingSettings,
    pub serialization_settings: Option<SerializationSettings>,
    pub stat_requests: Vec<StatRequest>,
}

/// Parses the full input envelope from `input` (`make_base`'s stdin shape).
pub fn decode_envelope(input: &str) -> Result<InputEnvelope, Error> {
    let root: Value = serde_json::from_str(input)?;

    let base_requests = match root.get("base_requests") {
        Some(value) => serde_json::from_value(value.clone())?,
        None => Vec::new(),
    };
    let render_settings = match root.get("render_settings") {
        Some(value) => parse_render_settings(value)?,
        None => RenderSettings::default(),
    };
    let routing_settings = match root.get("routing_settings") {
        Some(value) => serde_json::from_value(value.clone())?,
        None => RoutingSettings::default(),
    };
    let serialization_settings = match root.get("serialization_settings") {
        Some(value) => Some(serde_json::from_value(value.clone())?),
        None => None,
    };
    let stat_requests = match root.get("stat_requests") {
        Some(value) => serde_json::from_value(value.clone())?,
        None => Vec::new(),
    };

    Ok(InputEnvelope {
        base_requests,
        render_settings,
        routing_settings,
        serialization_settings,
        stat_requests,
    })
}

/// Parses only `serialization_settings` + `stat_requests`, the subset
/// `process_requests` actually needs (§6).
pub fn decode_process_requests(input: &str) -> Result<(Option<SerializationSettings>, Vec<StatRequest>), Error> {
    let root: Value = serde_json::from_str(input)?;
    let serialization_settings = match root.get("serialization_settings") {
        Some(value) => Some(serde_json::from_value(value.clone())?),
        None => None,
    };
    let stat_requests = match root.get("stat_requests") {
        Some(value) => serde_json::from_value(value.clone())?,
        None => Vec::new(),
    };
    Ok((serialization_settings, stat_requests))
}

/// Populates `catalog` from `base_requests`, stops first (so every bus's
/// stop names resolve) then distances then buses, mirroring the original
/// reader's two-pass order.
pub fn fill_catalog(catalog: &mut Catalog, base_requests: &[BaseRequest]) -> Result<(), crate::catalog::Error> {
    for request in base_requests {
        if let BaseRequest::Stop { name, latitude, longitude, .. } = request {
            catalog.add_stop(name, *latitude, *longitude)?;
        }
    }
    for request in base_requests {
        if let BaseRequest::Stop { name, road_distances, .. } = request {
            for (to_name, meters) in road_distances {
                catalog.set_distance(name, to_name, *meters)?;
            }
        }
    }
    for request in base_requests {
        if let BaseRequest::Bus { name, stops, is_roundtrip } = request {
            catalog.add_bus(name, stops, *is_roundtrip)?;
        }
    }
    Ok(())
}

fn parse_render_settings(value: &Value) -> Result<RenderSettings, Error> {
    let defaults = RenderSettings::default();
    let field_f64 = |key: &'static str, default: f64| -> f64 { value.get(key).and_then(Value::as_f64).unwrap_or(default) };
    let field_u32 = |key: &'static str, default: u32| -> u32 {
        value.get(key).and_then(Value::as_u64).map(|n| n as u32).unwrap_or(default)
    };
    let field_point = |key: &'static str, default: Point| -> Point {
        match value.get(key).and_then(Value::as_array) {
            Some(arr) if arr.len() == 2 => Point {
                x: arr[0].as_f64().unwrap_or(default.x),
                y: arr[1].as_f64().unwrap_or(default.y),
            },
            _ => default,
        }
    };

    let underlayer_color = match value.get("underlayer_color") {
        Some(v) => color_from_json(v).ok_or(Error::InvalidColor("underlayer_color"))?,
        None => defaults.underlayer_color.clone(),
    };
    let color_palette = match value.get("color_palette").and_then(Value::as_array) {
        Some(arr) => arr
            .iter()
            .map(|v| color_from_json(v).ok_or(Error::InvalidColor("color_palette")))
            .collect::<Result<Vec<_>, _>>()?,
        None => defaults.color_palette.clone(),
    };

    Ok(RenderSettings {
        width: field_f64("width", defaults.width),
        height: field_f64("height", defaults.height),
        padding: field_f64("padding", defaults.padding),
        line_width: field_f64("line_width", defaults.line_width),
        stop_radius: field_f64("stop_radius", defaults.stop_radius),
        bus_label_font_size: field_u32("bus_label_font_size", defaults.bus_label_font_size),
        bus_label_offset: field_point("bus_label_offset", defaults.bus_label_offset),
        stop_label_font_size: field_u32("stop_label_font_size", defaults.stop_label_font_size),
        stop_label_offset: field_point("stop_label_offset", defaults.stop_label_offset),
        underlayer_color,
        underlayer_width: field_f64("underlayer_width", defaults.underlayer_width),
        color_palette,
    })
}

/// A color in the wire format is untagged: a bare string names it, a
/// 3-element array is opaque RGB, a 4-element array is RGBA.
fn color_from_json(value: &Value) -> Option<Color> {
    if let Some(name) = value.as_str() {
        return Some(Color::named(name));
    }
    let arr = value.as_array()?;
    let byte = |v: &Value| -> Option<u8> { v.as_u64().map(|n| n as u8) };
    match arr.len() {
        3 => Some(Color::rgb(byte(&arr[0])?, byte(&arr[1])?, byte(&arr[2])?)),
        4 => Some(Color::Rgba {
            red: byte(&arr[0])?,
            green: byte(&arr[1])?,
            blue: byte(&arr[2])?,
            alpha: arr[3].as_f64()?,
        }),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StatResponse {
    Stop { request_id: i64, buses: Vec<String> },
    Bus { request_id: i64, curvature: f64, route_length: u32, stop_count: usize, unique_stop_count: usize },
    Map { request_id: i64, map: String },
    Route { request_id: i64, total_time: f64, items: Vec<ItineraryItem> },
    NotFound { request_id: i64, error_message: &'static str },
}

/// Resolves every stat request against `catalog`/`render_settings`/the
/// route-query facade and returns the JSON response array, in input order.
pub fn process_stat_requests(
    catalog: &Catalog,
    render_settings: &RenderSettings,
    graph: &crate::router::graph::DirectedWeightedGraph,
    router: &crate::router::Router<'_>,
    bus_wait_time: f64,
    requests: &[StatRequest],
) -> Result<String, Error> {
    let responses: Vec<StatResponse> = requests
        .iter()
        .map(|request| match request {
            StatRequest::Stop { id, name } => match catalog.buses_at_stop(name) {
                Some(buses) => StatResponse::Stop {
                    request_id: *id,
                    buses: buses.into_iter().map(str::to_string).collect(),
                },
                None => not_found(*id),
            },
            StatRequest::Bus { id, name } => match catalog.bus_info(name) {
                Some(info) => StatResponse::Bus {
                    request_id: *id,
                    curvature: info.curvature,
                    route_length: info.route_length,
                    stop_count: info.total_stop_count,
                    unique_stop_count: info.unique_stop_count,
                },
                None => not_found(*id),
            },
            StatRequest::Map { id } => StatResponse::Map {
                request_id: *id,
                map: crate::render::render_map(catalog, render_settings),
            },
            StatRequest::Route { id, from, to } => {
                match crate::router::itinerary::build_route(catalog, graph, router, bus_wait_time, from, to) {
                    Some(itinerary) => StatResponse::Route {
                        request_id: *id,
                        total_time: itinerary.total_time,
                        items: itinerary.items,
                    },
                    None => not_found(*id),
                }
            }
        })
        .collect();

    Ok(serde_json::to_string(&responses)?)
}

fn not_found(request_id: i64) -> StatResponse {
    StatResponse::NotFound { request_id, error_message: "not found" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_envelope_with_all_sections() {
        let input = r#"{
            "base_requests": [
                {"type": "Stop", "name": "A", "latitude": 1.0, "longitude": 2.0, "road_distances": {"B": 100}},
                {"type": "Stop", "name": "B", "latitude": 3.0, "longitude": 4.0},
                {"type": "Bus", "name": "X", "stops": ["A", "B"], "is_roundtrip": false}
            ],
            "routing_settings": {"bus_wait_time": 6, "bus_velocity": 40.0},
            "serialization_settings": {"file": "out.bin"},
            "stat_requests": [{"id": 1, "type": "Stop", "name": "A"}]
        }"#;
        let envelope = decode_envelope(input).unwrap();
        assert_eq!(envelope.base_requests.len(), 3);
        assert_eq!(envelope.routing_settings.bus_wait_time, 6);
        assert!(envelope.serialization_settings.is_some());
        assert_eq!(envelope.stat_requests.len(), 1);
    }

    #[test]
    fn missing_top_level_keys_are_tolerated() {
        let envelope = decode_envelope("{}").unwrap();
        assert!(envelope.base_requests.is_empty());
        assert!(envelope.serialization_settings.is_none());
        assert_eq!(envelope.routing_settings, RoutingSettings::default());
    }

    #[test]
    fn parses_named_and_array_colors() {
        let settings = parse_render_settings(&serde_json::json!({
            "underlayer_color": "white",
            "color_palette": ["green", [255, 160, 0], [1, 2, 3, 0.5]],
        }))
        .unwrap();
        assert_eq!(settings.underlayer_color, Color::named("white"));
        assert_eq!(settings.color_palette[1], Color::rgb(255, 160, 0));
        assert_eq!(settings.color_palette[2], Color::Rgba { red: 1, green: 2, blue: 3, alpha: 0.5 });
    }

    #[test]
    fn fill_catalog_applies_stops_then_distances_then_buses() {
        let mut catalog = Catalog::new();
        let requests: Vec<BaseRequest> = serde_json::from_value(serde_json::json!([
            {"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": {"B": 100}},
            {"type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.0},
            {"type": "Bus", "name": "X", "stops": ["A", "B"], "is_roundtrip": false}
        ]))
        .unwrap();
        fill_catalog(&mut catalog, &requests).unwrap();
        assert!(catalog.find_bus("X").is_some());
    }

    #[test]
    fn unknown_stop_name_produces_not_found() {
        let catalog = Catalog::new();
        let graph = crate::router::graph::DirectedWeightedGraph::new(0);
        let router = crate::router::Router::new(&graph).unwrap();
        let requests = vec![StatRequest::Stop { id: 7, name: "Nowhere".into() }];
        let json = process_stat_requests(&catalog, &RenderSettings::default(), &graph, &router, 6.0, &requests).unwrap();
        assert!(json.contains("\"request_id\":7"));
        assert!(json.contains("not found"));
    }
}
