pub mod graph;
pub mod itinerary;
pub mod state;

use rayon::prelude::*;
use thiserror::Error;

use crate::router::graph::{DirectedWeightedGraph, EdgeId};
use crate::router::state::{RouteInternalData, RoutesInternalData};

#[derive(Error, Debug)]
pub enum Error {
    #[error("edge weights must be non-negative")]
    NegativeWeight,
}

/// The weight and edge sequence of some shortest path.
#[derive(Debug, Clone)]
pub struct RouteInfo {
    pub weight: f64,
    pub edges: Vec<EdgeId>,
}

/// The all-pairs routing table (C3). Borrows the graph for its whole
/// lifetime so path reconstruction can read edge endpoints; never
/// snapshots it.
pub struct Router<'a> {
    graph: &'a DirectedWeightedGraph,
    table: RoutesInternalData,
}

impl<'a> Router<'a> {
    /// Runs the Floyd-Warshall precompute. Fails fatally on any negative
    /// edge weight, which would otherwise poison every downstream shortest
    /// path through that edge.
    pub fn new(graph: &'a DirectedWeightedGraph) -> Result<Self, Error> {
        let table = Self::initialize(graph)?;
        let table = Self::relax(graph.vertex_count(), table);
        Ok(Self { graph, table })
    }

    /// Rebuilds a router from a previously-precomputed table, as persisted
    /// by C7. No validation is performed: the table is trusted to satisfy
    /// the relaxation invariant already.
    pub fn from_table(graph: &'a DirectedWeightedGraph, table: RoutesInternalData) -> Self {
        Self { graph, table }
    }

    pub fn table(&self) -> &RoutesInternalData {
        &self.table
    }

    fn initialize(graph: &DirectedWeightedGraph) -> Result<RoutesInternalData, Error> {
        let v = graph.vertex_count();
        let mut table: RoutesInternalData = vec![vec![None; v]; v];
        for vertex in 0..v {
            table[vertex][vertex] = Some(RouteInternalData {
                weight: 0.0,
                prev_edge: None,
            });
            for &edge_id in graph.incident_edges(vertex) {
                let edge = graph.edge(edge_id);
                if edge.weight < 0.0 {
                    return Err(Error::NegativeWeight);
                }
                let cell = &mut table[vertex][edge.to];
                let better = match cell {
                    None => true,
                    Some(existing) => edge.weight < existing.weight,
                };
                if better {
                    *cell = Some(RouteInternalData {
                        weight: edge.weight,
                        prev_edge: Some(edge_id),
                    });
                }
            }
        }
        Ok(table)
    }

    /// `for k, i, j in [0, V)`: relax `table[i][j]` through `k`. Rows are
    /// independent for a fixed `k` (each only reads column `k` and row
    /// `k`, neither of which this pass writes), so the per-row candidate
    /// updates are computed in parallel and applied afterwards.
    fn relax(v: usize, mut table: RoutesInternalData) -> RoutesInternalData {
        for k in 0..v {
            let through_k = table[k].clone();
            let updates: Vec<(usize, usize, RouteInternalData)> = (0..v)
                .into_par_iter()
                .flat_map_iter(|i| {
                    let mut local = Vec::new();
                    if let Some(from_k) = table[i][k] {
                        for (j, to_j) in through_k.iter().enumerate() {
                            let Some(to_j) = to_j else { continue };
                            let candidate = from_k.weight + to_j.weight;
                            let better = match &table[i][j] {
                                None => true,
                                Some(existing) => candidate < existing.weight,
                            };
                            if better {
                                let prev_edge = to_j.prev_edge.or(from_k.prev_edge);
                                local.push((i, j, RouteInternalData { weight: candidate, prev_edge }));
                            }
                        }
                    }
                    local
                })
                .collect();
            for (i, j, data) in updates {
                table[i][j] = Some(data);
            }
        }
        table
    }

    /// Walks `prev_edge` backwards from `t` to `s`, reversing the
    /// collected edges into forward order. `None` if `t` is unreachable
    /// from `s`.
    pub fn build_route(&self, from: usize, to: usize) -> Option<RouteInfo> {
        let root = self.table[from][to]?;
        let mut edges = Vec::new();
        let mut cursor = to;
        let mut next_edge = root.prev_edge;
        while let Some(edge_id) = next_edge {
            edges.push(edge_id);
            let edge = self.graph.edge(edge_id);
            cursor = edge.from;
            if cursor == from {
                break;
            }
            next_edge = self.table[from][cursor].and_then(|cell| cell.prev_edge);
        }
        edges.reverse();
        Some(RouteInfo {
            weight: root.weight,
            edges,
        })
    }
}
