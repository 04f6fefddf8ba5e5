//! Breadth-first algorithms written against the traversal contract of [`ObservableGraph`].
//!
//! Every neighbour scan goes through [`ObservableGraph::neighbors`], so registered traversal
//! callbacks see the algorithm's progress. A callback that fails stops the algorithm and its
//! error is returned.

use std::{collections::VecDeque, fmt::Debug};

use indexmap::IndexMap;
use petgraph::visit::Bfs;
use thiserror::Error;
use tracing::debug;

use crate::{
    graph::{GraphError, ObservableGraph, VertexKey},
    observer::ObserverError,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AlgorithmError<V: Debug> {
    #[error("source vertex {0:?} is not in the graph")]
    SourceNotFound(V),
    #[error("target vertex {0:?} is not in the graph")]
    TargetNotFound(V),
    #[error("no path from {0:?} to {1:?}")]
    NoPath(V, V),
    #[error(transparent)]
    Graph(#[from] GraphError<V>),
    #[error(transparent)]
    Observer(#[from] ObserverError),
}

fn check_fault<V: VertexKey>(graph: &ObservableGraph<V>) -> Result<(), AlgorithmError<V>> {
    match graph.take_traversal_fault() {
        Some(fault) => Err(fault.into()),
        None => Ok(()),
    }
}

/// Vertices reachable from `source` in breadth-first order, using petgraph's [`Bfs`].
pub fn bfs_order<V: VertexKey>(
    graph: &ObservableGraph<V>,
    source: V,
) -> Result<Vec<V>, AlgorithmError<V>> {
    if !graph.contains_vertex(source) {
        return Err(AlgorithmError::SourceNotFound(source));
    }
    let mut bfs = Bfs::new(graph, source);
    let mut order = Vec::with_capacity(graph.vertex_count());
    while let Some(u) = bfs.next(graph) {
        order.push(u);
        check_fault(graph)?;
    }
    debug!(?source, visited = order.len(), "bfs finished");
    Ok(order)
}

/// Hop distance from `source` to every vertex reachable from it, in discovery order.
pub fn shortest_path_lengths<V: VertexKey>(
    graph: &ObservableGraph<V>,
    source: V,
) -> Result<IndexMap<V, usize>, AlgorithmError<V>> {
    if !graph.contains_vertex(source) {
        return Err(AlgorithmError::SourceNotFound(source));
    }
    let mut lengths = IndexMap::from([(source, 0)]);
    let mut queue = VecDeque::from([source]);
    while let Some(u) = queue.pop_front() {
        let next = lengths[&u] + 1;
        for v in graph.neighbors(u)? {
            if !lengths.contains_key(&v) {
                lengths.insert(v, next);
                queue.push_back(v);
            }
        }
        check_fault(graph)?;
    }
    Ok(lengths)
}

/// Hop distances between every pair of connected vertices, keyed by source in insertion order.
pub fn all_pairs_shortest_path_lengths<V: VertexKey>(
    graph: &ObservableGraph<V>,
) -> Result<IndexMap<V, IndexMap<V, usize>>, AlgorithmError<V>> {
    graph
        .vertices()
        .map(|u| Ok::<_, AlgorithmError<V>>((u, shortest_path_lengths(graph, u)?)))
        .collect()
}

/// A shortest path from `source` to `target`, both included.
pub fn shortest_path<V: VertexKey>(
    graph: &ObservableGraph<V>,
    source: V,
    target: V,
) -> Result<Vec<V>, AlgorithmError<V>> {
    if !graph.contains_vertex(source) {
        return Err(AlgorithmError::SourceNotFound(source));
    }
    if !graph.contains_vertex(target) {
        return Err(AlgorithmError::TargetNotFound(target));
    }

    let mut parents: IndexMap<V, Option<V>> = IndexMap::from([(source, None)]);
    let mut queue = VecDeque::from([source]);
    'search: while let Some(u) = queue.pop_front() {
        if u == target {
            break;
        }
        for v in graph.neighbors(u)? {
            if !parents.contains_key(&v) {
                parents.insert(v, Some(u));
                if v == target {
                    break 'search;
                }
                queue.push_back(v);
            }
        }
        check_fault(graph)?;
    }
    check_fault(graph)?;

    if !parents.contains_key(&target) {
        return Err(AlgorithmError::NoPath(source, target));
    }
    let mut path = vec![target];
    let mut current = target;
    while let Some(&Some(parent)) = parents.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    Ok(path)
}

/// Number of edges on a shortest path from `source` to `target`.
pub fn shortest_path_length<V: VertexKey>(
    graph: &ObservableGraph<V>,
    source: V,
    target: V,
) -> Result<usize, AlgorithmError<V>> {
    Ok(shortest_path(graph, source, target)?.len() - 1)
}
