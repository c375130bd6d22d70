//! Binary persistence (C7): round-trips the catalog, render settings, graph,
//! and router table through a single length-prefixed binary file so
//! `process_requests` never has to recompute anything `make_base` already
//! built.
//!
//! On load, a missing or corrupt file is logged and treated as an empty
//! state (§7) rather than propagated: the caller still gets an `Artifact`
//! back, just an empty one, so every downstream query simply answers "not
//! found" instead of crashing the process.

pub mod model;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::RoutingSettings;
use crate::render::settings::RenderSettings;
use crate::router::graph::DirectedWeightedGraph;
use crate::router::state::RoutesInternalData;
use crate::router::Router;

pub use model::Artifact;
use model::{BusRecord, BusTotalsRecord, CatalogSection, GraphSection, StopRecord};

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not open artifact file: {0}")]
    OpenFailed(#[from] std::io::Error),
    #[error("could not parse artifact file: {0}")]
    ParseFailed(#[from] bincode::Error),
}

/// Serializes `catalog`/`render_settings`/`routing_settings`/`graph`/
/// `router` into a single [`Artifact`] and writes it to `path`, truncating
/// any existing file. The output path is opened, written in one buffered
/// pass, and closed on every exit path including the error one — a partial
/// file may be left behind on failure, which is the caller's responsibility
/// per §5.
pub fn save(
    path: &Path,
    catalog: &Catalog,
    render_settings: &RenderSettings,
    routing_settings: &RoutingSettings,
    graph: &DirectedWeightedGraph,
    router_table: &RoutesInternalData,
) -> Result<(), Error> {
    let artifact = Artifact {
        catalog: to_catalog_section(catalog),
        render_settings: render_settings.clone(),
        routing_settings: *routing_settings,
        graph: GraphSection {
            edges: graph.edges().to_vec(),
            incidence_lists: graph.incidence_lists().to_vec(),
        },
        router_table: router_table.clone(),
    };
    let bytes = bincode::serialize(&artifact)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

/// Reads and decodes the artifact at `path`. A missing file, an unreadable
/// file, or a corrupt payload is logged with `tracing::warn!` and yields an
/// empty [`Artifact`] rather than an error — see the module docs.
pub fn load(path: &Path) -> Artifact {
    match load_inner(path) {
        Ok(artifact) => artifact,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to load artifact, continuing with an empty catalog"
            );
            Artifact::default()
        }
    }
}

fn load_inner(path: &Path) -> Result<Artifact, Error> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bincode::deserialize(&bytes)?)
}

/// Rebuilds the in-memory [`Catalog`] from a loaded artifact's section. The
/// catalog is reconstructed first, before the graph and router, so every
/// `id` referenced by later sections is already valid (§4.5).
pub fn from_catalog_section(section: CatalogSection) -> Catalog {
    let stops = section
        .stops
        .into_iter()
        .map(|s| crate::catalog::Stop {
            id: s.id,
            name: std::sync::Arc::from(s.name.as_str()),
            coordinate: s.coordinate,
        })
        .collect();
    let buses = section
        .buses
        .into_iter()
        .map(|b| crate::catalog::Bus {
            id: b.id,
            name: std::sync::Arc::from(b.name.as_str()),
            stops: b.stops,
            is_roundtrip: b.is_roundtrip,
        })
        .collect();
    let bus_totals = section
        .bus_totals
        .into_iter()
        .map(|t| crate::catalog::BusTotals {
            road_length: t.road_length,
            geo_length: t.geo_length,
        })
        .collect();
    Catalog::from_parts(
        stops,
        buses,
        section.stop_to_buses,
        section.road_distances,
        section.geo_distances,
        bus_totals,
    )
}

fn to_catalog_section(catalog: &Catalog) -> CatalogSection {
    CatalogSection {
        stops: catalog
            .stops()
            .iter()
            .map(|s| StopRecord {
                id: s.id,
                name: s.name.to_string(),
                coordinate: s.coordinate,
            })
            .collect(),
        buses: catalog
            .buses()
            .iter()
            .map(|b| BusRecord {
                id: b.id,
                name: b.name.to_string(),
                stops: b.stops.clone(),
                is_roundtrip: b.is_roundtrip,
            })
            .collect(),
        stop_to_buses: catalog.stop_to_buses_raw().to_vec(),
        road_distances: catalog.road_distances().collect(),
        geo_distances: catalog.geo_distances().collect(),
        bus_totals: catalog
            .bus_totals_raw()
            .iter()
            .enumerate()
            .map(|(id, t)| BusTotalsRecord {
                bus_id: id as u32,
                road_length: t.road_length,
                geo_length: t.geo_length,
            })
            .collect(),
    }
}

/// Rebuilds the graph from its persisted sections.
pub fn from_graph_section(section: GraphSection) -> DirectedWeightedGraph {
    DirectedWeightedGraph::from_parts(section.edges, section.incidence_lists)
}

/// Rebuilds a ready-to-query router from the persisted `V x V` table,
/// borrowing `graph` for its lifetime, without rerunning the relaxation.
pub fn router_from_table(graph: &DirectedWeightedGraph, table: RoutesInternalData) -> Router<'_> {
    Router::from_table(graph, table)
}
