//! Routing and serialization settings: plain structs deserialized from the
//! input envelope's `routing_settings` / `serialization_settings` keys.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Wait time and cruising speed used by the transit-graph builder (C5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    pub bus_wait_time: u32,
    pub bus_velocity: f64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            bus_wait_time: 1,
            bus_velocity: 1.0,
        }
    }
}

/// Where the binary artifact (C7) is read from or written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializationSettings {
    pub file: PathBuf,
}
