//! Internal relaxation state for the all-pairs router (C3): one cell per
//! `(source, target)` vertex pair.

use serde::{Deserialize, Serialize};

use crate::router::graph::EdgeId;

/// A single cell of the `V x V` routing table: the best known weight from
/// the row's source to the column's target, and the last edge on some
/// shortest path achieving it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteInternalData {
    pub weight: f64,
    pub prev_edge: Option<EdgeId>,
}

pub type RoutesInternalData = Vec<Vec<Option<RouteInternalData>>>;
