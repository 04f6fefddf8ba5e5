//! `petgraph::visit` integration, so petgraph's walkers can run over an [`ObservableGraph`].
//!
//! Neighbour lookups go through [`ObservableGraph::neighbors`], which means every vertex a
//! petgraph walker discovers is reported to the graph's traversal callbacks.

use std::collections::HashSet;

use petgraph::visit::{GraphBase, IntoNeighbors, IntoNodeIdentifiers, NodeCount, Visitable};

use crate::graph::{Neighbors, Nodes, ObservableGraph, VertexKey};

impl<V: VertexKey> GraphBase for ObservableGraph<V> {
    type NodeId = V;
    type EdgeId = (V, V);
}

impl<V: VertexKey> Visitable for ObservableGraph<V> {
    type Map = HashSet<V>;

    fn visit_map(&self) -> Self::Map {
        HashSet::with_capacity(self.vertex_count())
    }

    fn reset_map(&self, map: &mut Self::Map) {
        map.clear();
    }
}

impl<V: VertexKey> NodeCount for ObservableGraph<V> {
    fn node_count(&self) -> usize {
        self.vertex_count()
    }
}

impl<'a, V: VertexKey> IntoNeighbors for &'a ObservableGraph<V> {
    type Neighbors = Neighbors<'a, V>;

    /// A vertex that is not in the graph has no neighbours.
    fn neighbors(self, a: V) -> Self::Neighbors {
        self.neighbors_or_empty(a)
    }
}

impl<'a, V: VertexKey> IntoNodeIdentifiers for &'a ObservableGraph<V> {
    type NodeIdentifiers = Nodes<'a, V>;

    fn node_identifiers(self) -> Self::NodeIdentifiers {
        self.nodes()
    }
}
