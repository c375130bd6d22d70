use std::sync::Arc;

use crate::geo::Coordinate;

/// A named geographic point. `id` is the dense, insertion-order index used
/// as the stable identity for every cross-reference into this stop.
#[derive(Debug, Clone)]
pub struct Stop {
    pub id: u32,
    pub name: Arc<str>,
    pub coordinate: Coordinate,
}

/// A named, ordered sequence of stop ids.
///
/// For a non-roundtrip bus, `stops` is already the expanded there-and-back
/// sequence (length `2n - 1`); the terminus sits at index `n - 1`.
#[derive(Debug, Clone)]
pub struct Bus {
    pub id: u32,
    pub name: Arc<str>,
    pub stops: Vec<u32>,
    pub is_roundtrip: bool,
}

/// Precomputed `(road_length, geo_length)` for a bus's full stored sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusTotals {
    pub road_length: u32,
    pub geo_length: f64,
}

/// Response payload for a bus-statistics query.
#[derive(Debug, Clone, Copy)]
pub struct BusInfo {
    pub unique_stop_count: usize,
    pub total_stop_count: usize,
    pub route_length: u32,
    /// `route_length / geo_length`; `NaN` for a single-stop bus (`geo_length == 0`).
    pub curvature: f64,
}
