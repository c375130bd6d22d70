//! Transit-graph builder (C5): reduces a populated [`Catalog`] into a
//! [`DirectedWeightedGraph`] where each edge is one bus ride between two
//! stops on the same bus, weighted by `bus_wait_time + travel/bus_velocity`.
//!
//! A generic shortest-path algorithm over this graph then finds fastest
//! itineraries with transfers, since transferring buses just means leaving
//! one edge and entering another (and paying its wait again).

use crate::catalog::{Catalog, Error};
use crate::config::RoutingSettings;
use crate::router::graph::{DirectedWeightedGraph, Edge};

/// Minutes-per-(meter*(km/h)^-1) conversion factor baked into the edge
/// weight formula: `bus_wait_time + cumulative_meters * METERS_TO_MINUTES / bus_velocity`.
const METERS_TO_MINUTES: f64 = 0.06;

/// Builds the transit graph for every bus in `catalog`. One vertex per stop
/// (`vertex_id == stop_id`); edges are emitted per §4.2.
///
/// A roundtrip bus emits an edge for every ordered pair `(i, j)`, `i < j`,
/// in its stored sequence. A non-roundtrip bus instead emits two disjoint
/// ranges — forward leg `[0, m)` and return leg `[(n-1)/2, n)`, where
/// `m = (n+1)/2` — so a ride can never "teleport" across the terminus.
///
/// Fails only if a bus references a stop pair with no resolvable road
/// distance, which `Catalog::add_bus` already guarantees cannot happen for
/// any bus accepted into the catalog.
pub fn build_graph(catalog: &Catalog, settings: &RoutingSettings) -> Result<DirectedWeightedGraph, Error> {
    let mut graph = DirectedWeightedGraph::new(catalog.stops().len());
    for bus in catalog.buses() {
        let stops = &bus.stops;
        let n = stops.len();
        if n < 2 {
            continue;
        }

        let mut prefix = vec![0u32; n];
        for k in 1..n {
            prefix[k] = prefix[k - 1] + catalog.distance(stops[k - 1], stops[k])?;
        }

        let mut emit_range = |graph: &mut DirectedWeightedGraph, lo: usize, hi: usize| {
            for i in lo..hi {
                for j in (i + 1)..hi {
                    let cumulative_meters = prefix[j] - prefix[i];
                    let weight = settings.bus_wait_time as f64
                        + (cumulative_meters as f64 * METERS_TO_MINUTES) / settings.bus_velocity;
                    graph.add_edge(Edge {
                        from: stops[i] as usize,
                        to: stops[j] as usize,
                        weight,
                        bus_id: bus.id,
                        span_count: (j - i) as u32,
                    });
                }
            }
        };

        if bus.is_roundtrip {
            emit_range(&mut graph, 0, n);
        } else {
            let m = (n + 1) / 2;
            emit_range(&mut graph, 0, m);
            emit_range(&mut graph, (n - 1) / 2, n);
        }
    }
    Ok(graph)
}
