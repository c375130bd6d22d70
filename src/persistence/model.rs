//! On-disk section structs for the binary artifact (C7). These mirror the
//! in-memory types closely but stay independent of them so the catalog and
//! router modules don't need to know persistence exists.

use serde::{Deserialize, Serialize};

use crate::config::RoutingSettings;
use crate::geo::Coordinate;
use crate::render::settings::RenderSettings;
use crate::router::graph::{Edge, EdgeId};
use crate::router::state::RoutesInternalData;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub id: u32,
    pub name: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusRecord {
    pub id: u32,
    pub name: String,
    pub stops: Vec<u32>,
    pub is_roundtrip: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusTotalsRecord {
    pub bus_id: u32,
    pub road_length: u32,
    pub geo_length: f64,
}

/// Catalog section (§4.5): stops, buses, stop-to-buses index, both distance
/// tables, and the bus-totals cache, each keyed by dense `id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    pub stops: Vec<StopRecord>,
    pub buses: Vec<BusRecord>,
    pub stop_to_buses: Vec<Vec<u32>>,
    pub road_distances: Vec<(u32, u32, u32)>,
    pub geo_distances: Vec<(u32, u32, f64)>,
    pub bus_totals: Vec<BusTotalsRecord>,
}

/// Graph section: raw edge array plus per-vertex incidence lists, both in
/// insertion order since edge ids are referenced from the router table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSection {
    pub edges: Vec<Edge>,
    pub incidence_lists: Vec<Vec<EdgeId>>,
}

/// The whole binary artifact written by `make_base` and read by
/// `process_requests`. `routing_settings` travels with the router table
/// (not the catalog) since it's the parameter the graph was built with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artifact {
    pub catalog: CatalogSection,
    pub render_settings: RenderSettings,
    pub routing_settings: RoutingSettings,
    pub graph: GraphSection,
    pub router_table: RoutesInternalData,
}
