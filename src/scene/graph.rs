use crate::foundation::core::{ActivityId, EdgeId, Point};
use std::collections::BTreeMap;

/// Endpoints of one rendered edge path.
///
/// The host's layout engine owns the full path geometry; the compiler only
/// needs where a token enters and leaves the edge.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeGeometry {
    /// Point where a token enters the edge.
    pub start: Point,
    /// Point where a token leaves the edge.
    pub end: Point,
}

/// Host-supplied geometry for the laid-out process graph.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct GraphGeometry {
    edges: BTreeMap<EdgeId, EdgeGeometry>,
    nodes: BTreeMap<ActivityId, Point>,
}

impl GraphGeometry {
    /// Empty geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the endpoints of an edge.
    pub fn insert_edge(&mut self, id: EdgeId, geom: EdgeGeometry) {
        self.edges.insert(id, geom);
    }

    /// Register the center point of an activity node.
    pub fn insert_node(&mut self, id: ActivityId, center: Point) {
        self.nodes.insert(id, center);
    }

    /// Endpoints of an edge, if the layout knows it.
    pub fn edge(&self, id: EdgeId) -> Option<&EdgeGeometry> {
        self.edges.get(&id)
    }

    /// Center of an activity node, if the layout knows it.
    pub fn node_center(&self, id: ActivityId) -> Option<Point> {
        self.nodes.get(&id).copied()
    }

    /// Number of known edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
