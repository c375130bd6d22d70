//! Route query facade (C6): materializes an all-pairs path as an
//! alternating Wait/Ride item sequence.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::router::graph::DirectedWeightedGraph;
use crate::router::Router;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Item {
    Wait { stop: String, time: f64 },
    Ride { bus: String, span_count: u32, time: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub total_time: f64,
    pub items: Vec<Item>,
}

/// Resolves `from_name`/`to_name` against the catalog and asks `router` for
/// the shortest path, decomposing each edge into a Wait paid at its origin
/// stop plus a Ride for the remaining time. `None` if either name is
/// unknown; an empty itinerary if `from == to`.
pub fn build_route(
    catalog: &Catalog,
    graph: &DirectedWeightedGraph,
    router: &Router<'_>,
    bus_wait_time: f64,
    from_name: &str,
    to_name: &str,
) -> Option<Itinerary> {
    let from = catalog.find_stop(from_name)?.id as usize;
    let to = catalog.find_stop(to_name)?.id as usize;

    if from == to {
        return Some(Itinerary {
            total_time: 0.0,
            items: Vec::new(),
        });
    }

    let route = router.build_route(from, to)?;
    let mut items = Vec::with_capacity(route.edges.len() * 2);
    for edge_id in &route.edges {
        let edge = graph.edge(*edge_id);
        let origin = catalog.stop_by_id(edge.from as u32).expect("edge endpoint must be a known stop");
        let bus = catalog.bus_by_id(edge.bus_id).expect("edge bus_id must be a known bus");
        items.push(Item::Wait {
            stop: origin.name.to_string(),
            time: bus_wait_time,
        });
        items.push(Item::Ride {
            bus: bus.name.to_string(),
            span_count: edge.span_count,
            time: edge.weight - bus_wait_time,
        });
    }

    Some(Itinerary {
        total_time: route.weight,
        items,
    })
}
