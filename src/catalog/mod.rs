//! The in-memory transport catalog (C4): stops, buses, and distance tables,
//! keyed by dense integer ids so references survive serialization untouched.

mod entities;

pub use entities::*;

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::geo::Coordinate;

#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    #[error("unknown stop: {0}")]
    UnknownStop(String),
    #[error("distance between {0} and {1} is not known")]
    MissingDistance(String, String),
}

/// Owns every stop and bus in the catalog. Nothing is ever relocated once
/// inserted: `id`s handed out by `add_stop`/`add_bus` stay valid forever.
#[derive(Debug, Default)]
pub struct Catalog {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_lookup: HashMap<Arc<str>, u32>,
    bus_lookup: HashMap<Arc<str>, u32>,
    stop_to_buses: Vec<Vec<u32>>,
    road_distances: HashMap<(u32, u32), u32>,
    geo_distances: HashMap<(u32, u32), f64>,
    bus_totals: Vec<BusTotals>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh dense id and inserts the stop. Must be called
    /// before any bus or distance entry references this stop's name.
    pub fn add_stop(&mut self, name: &str, lat: f64, lng: f64) -> Result<u32, Error> {
        if self.stop_lookup.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let id = self.stops.len() as u32;
        let name: Arc<str> = Arc::from(name);
        self.stops.push(Stop {
            id,
            name: name.clone(),
            coordinate: Coordinate::new(lat, lng),
        });
        self.stop_lookup.insert(name, id);
        self.stop_to_buses.push(Vec::new());
        Ok(id)
    }

    /// Records a directed road distance. Idempotent for the exact direction;
    /// installs the reverse entry only the first time this direction is seen.
    pub fn set_distance(&mut self, from_name: &str, to_name: &str, meters: u32) -> Result<(), Error> {
        let from = self.require_stop_id(from_name)?;
        let to = self.require_stop_id(to_name)?;
        if !self.road_distances.contains_key(&(from, to)) {
            self.road_distances.insert((from, to), meters);
            self.road_distances.insert((to, from), meters);
        } else {
            self.road_distances.insert((from, to), meters);
        }
        Ok(())
    }

    /// Resolves names, expands a non-roundtrip sequence to there-and-back
    /// form, sums road/geo lengths over the stored sequence, and updates
    /// the stop-to-buses index for every referenced stop.
    pub fn add_bus(
        &mut self,
        name: &str,
        stop_names: &[String],
        is_roundtrip: bool,
    ) -> Result<u32, Error> {
        if self.bus_lookup.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let mut one_way = Vec::with_capacity(stop_names.len());
        for stop_name in stop_names {
            one_way.push(self.require_stop_id(stop_name)?);
        }

        let stops = if is_roundtrip {
            one_way
        } else {
            let n = one_way.len();
            let mut full = one_way.clone();
            full.extend(one_way[..n.saturating_sub(1)].iter().rev().copied());
            full
        };

        let mut road_length: u32 = 0;
        let mut geo_length: f64 = 0.0;
        for pair in stops.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            road_length += self.distance_by_id(from, to)?;
            let geo = self.stop_by_id(from).unwrap().coordinate
                .great_circle_distance(&self.stop_by_id(to).unwrap().coordinate);
            self.geo_distances.insert((from, to), geo);
            geo_length += geo;
        }

        let id = self.buses.len() as u32;
        let name: Arc<str> = Arc::from(name);
        for &stop_id in &stops {
            let bucket = &mut self.stop_to_buses[stop_id as usize];
            if !bucket.contains(&id) {
                bucket.push(id);
            }
        }
        self.buses.push(Bus {
            id,
            name: name.clone(),
            stops,
            is_roundtrip,
        });
        self.bus_lookup.insert(name, id);
        self.bus_totals.push(BusTotals {
            road_length,
            geo_length,
        });
        Ok(id)
    }

    pub fn find_stop(&self, name: &str) -> Option<&Stop> {
        let id = self.stop_lookup.get(name)?;
        self.stops.get(*id as usize)
    }

    pub fn find_bus(&self, name: &str) -> Option<&Bus> {
        let id = self.bus_lookup.get(name)?;
        self.buses.get(*id as usize)
    }

    pub fn stop_by_id(&self, id: u32) -> Option<&Stop> {
        self.stops.get(id as usize)
    }

    pub fn bus_by_id(&self, id: u32) -> Option<&Bus> {
        self.buses.get(id as usize)
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// Names of every bus passing through the stop, ascending lexical order.
    /// `None` if the stop name is unknown.
    pub fn buses_at_stop(&self, name: &str) -> Option<Vec<&str>> {
        let id = *self.stop_lookup.get(name)?;
        let mut names: Vec<&str> = self.stop_to_buses[id as usize]
            .iter()
            .map(|bus_id| self.buses[*bus_id as usize].name.as_ref())
            .collect();
        names.sort_unstable();
        Some(names)
    }

    /// Directed road distance with reverse fallback.
    pub fn distance(&self, from_id: u32, to_id: u32) -> Result<u32, Error> {
        self.distance_by_id(from_id, to_id)
    }

    fn distance_by_id(&self, from: u32, to: u32) -> Result<u32, Error> {
        if let Some(d) = self.road_distances.get(&(from, to)) {
            return Ok(*d);
        }
        if let Some(d) = self.road_distances.get(&(to, from)) {
            return Ok(*d);
        }
        let from_name = self.stop_by_id(from).map(|s| s.name.to_string()).unwrap_or_default();
        let to_name = self.stop_by_id(to).map(|s| s.name.to_string()).unwrap_or_default();
        Err(Error::MissingDistance(from_name, to_name))
    }

    pub fn geo_distance(&self, from_id: u32, to_id: u32) -> Option<f64> {
        self.geo_distances.get(&(from_id, to_id)).copied()
    }

    /// `{unique_stop_count, total_stop_count, route_length, curvature}` for
    /// a bus. `None` if the bus name is unknown.
    pub fn bus_info(&self, name: &str) -> Option<BusInfo> {
        let id = *self.bus_lookup.get(name)?;
        let bus = &self.buses[id as usize];
        let totals = self.bus_totals[id as usize];
        let unique_stop_count = {
            let mut ids: Vec<u32> = bus.stops.clone();
            ids.sort_unstable();
            ids.dedup();
            ids.len()
        };
        Some(BusInfo {
            unique_stop_count,
            total_stop_count: bus.stops.len(),
            route_length: totals.road_length,
            curvature: totals.road_length as f64 / totals.geo_length,
        })
    }

    /// Every directed road-distance entry as `(from_id, to_id, meters)`,
    /// in arbitrary (hash) order. Used by the persistence layer (C7).
    pub fn road_distances(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.road_distances.iter().map(|(&(from, to), &meters)| (from, to, meters))
    }

    /// Every geographic-distance entry as `(from_id, to_id, meters)`.
    pub fn geo_distances(&self) -> impl Iterator<Item = (u32, u32, f64)> + '_ {
        self.geo_distances.iter().map(|(&(from, to), &meters)| (from, to, meters))
    }

    /// Raw `stop_id -> [bus_id]` index, in insertion order, as persisted by C7.
    pub fn stop_to_buses_raw(&self) -> &[Vec<u32>] {
        &self.stop_to_buses
    }

    /// Raw `bus_id -> (road_length, geo_length)` totals cache.
    pub fn bus_totals_raw(&self) -> &[BusTotals] {
        &self.bus_totals
    }

    /// Rebuilds a catalog from its persisted sections (C7 load path). The
    /// `id` fields embedded in `stops`/`buses` must already be dense and in
    /// insertion order; the name-lookup maps are rebuilt from them.
    pub fn from_parts(
        stops: Vec<Stop>,
        buses: Vec<Bus>,
        stop_to_buses: Vec<Vec<u32>>,
        road_distances: Vec<(u32, u32, u32)>,
        geo_distances: Vec<(u32, u32, f64)>,
        bus_totals: Vec<BusTotals>,
    ) -> Self {
        let stop_lookup = stops.iter().map(|s| (s.name.clone(), s.id)).collect();
        let bus_lookup = buses.iter().map(|b| (b.name.clone(), b.id)).collect();
        Self {
            stops,
            buses,
            stop_lookup,
            bus_lookup,
            stop_to_buses,
            road_distances: road_distances.into_iter().map(|(f, t, m)| ((f, t), m)).collect(),
            geo_distances: geo_distances.into_iter().map(|(f, t, m)| ((f, t), m)).collect(),
            bus_totals,
        }
    }

    fn require_stop_id(&self, name: &str) -> Result<u32, Error> {
        self.stop_lookup
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownStop(name.to_string()))
    }

    /// Debug-only stop dump, used by `tracing::debug!` during `make_base`.
    pub fn fmt_debug(&self) -> String {
        let mut out = String::from("stops:\n");
        for stop in &self.stops {
            out.push_str(&format!("  id {}, name = {}\n", stop.id, stop.name));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> Catalog {
        let mut c = Catalog::new();
        c.add_stop("A", 55.611087, 37.20829).unwrap();
        c.add_stop("B", 55.595884, 37.209755).unwrap();
        c.set_distance("A", "B", 3900).unwrap();
        c.set_distance("B", "A", 4500).unwrap();
        c
    }

    #[test]
    fn duplicate_stop_name_rejected() {
        let mut c = small_catalog();
        assert!(matches!(
            c.add_stop("A", 0.0, 0.0),
            Err(Error::DuplicateName(_))
        ));
    }

    #[test]
    fn unknown_stop_in_bus_rejected() {
        let mut c = small_catalog();
        let stops = vec!["A".to_string(), "Z".to_string()];
        assert!(matches!(
            c.add_bus("X", &stops, false),
            Err(Error::UnknownStop(_))
        ));
    }

    #[test]
    fn asymmetric_distance_fallback_direction() {
        let c = small_catalog();
        let a = c.find_stop("A").unwrap().id;
        let b = c.find_stop("B").unwrap().id;
        assert_eq!(c.distance(a, b).unwrap(), 3900);
        assert_eq!(c.distance(b, a).unwrap(), 4500);
    }

    #[test]
    fn reverse_fallback_only_when_unset() {
        let mut c = Catalog::new();
        c.add_stop("A", 0.0, 0.0).unwrap();
        c.add_stop("B", 0.0, 0.0).unwrap();
        c.set_distance("A", "B", 100).unwrap();
        let a = c.find_stop("A").unwrap().id;
        let b = c.find_stop("B").unwrap().id;
        assert_eq!(c.distance(b, a).unwrap(), 100);
        c.set_distance("A", "B", 200).unwrap();
        assert_eq!(c.distance(b, a).unwrap(), 100);
        assert_eq!(c.distance(a, b).unwrap(), 200);
    }

    #[test]
    fn non_roundtrip_bus_expands_there_and_back() {
        let mut c = small_catalog();
        let stops = vec!["A".to_string(), "B".to_string()];
        c.add_bus("X", &stops, false).unwrap();
        let bus = c.find_bus("X").unwrap();
        assert_eq!(bus.stops.len(), 3);
        let info = c.bus_info("X").unwrap();
        assert_eq!(info.total_stop_count, 3);
        assert_eq!(info.unique_stop_count, 2);
        assert_eq!(info.route_length, 3900 + 4500);
        assert!(info.curvature >= 1.0);
    }

    #[test]
    fn single_stop_bus_has_zero_length_and_nan_curvature() {
        let mut c = Catalog::new();
        c.add_stop("K", 10.0, 10.0).unwrap();
        c.add_bus("W", &["K".to_string()], true).unwrap();
        let info = c.bus_info("W").unwrap();
        assert_eq!(info.route_length, 0);
        assert_eq!(info.unique_stop_count, 1);
        assert_eq!(info.total_stop_count, 1);
        assert!(info.curvature.is_nan());
    }

    #[test]
    fn stop_with_no_buses_returns_empty_list() {
        let mut c = Catalog::new();
        c.add_stop("K", 0.0, 0.0).unwrap();
        assert_eq!(c.buses_at_stop("K"), Some(Vec::new()));
    }

    #[test]
    fn unknown_stop_lookup_is_none() {
        let c = Catalog::new();
        assert_eq!(c.buses_at_stop("Nowhere"), None);
    }

    #[test]
    fn buses_at_stop_sorted_lexically() {
        let mut c = Catalog::new();
        c.add_stop("S", 0.0, 0.0).unwrap();
        c.add_bus("Zeta", &["S".to_string()], true).unwrap();
        c.add_bus("Alpha", &["S".to_string()], true).unwrap();
        assert_eq!(c.buses_at_stop("S").unwrap(), vec!["Alpha", "Zeta"]);
    }
}
