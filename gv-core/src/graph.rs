use std::{fmt::Debug, hash::Hash};

use derivative::Derivative;
use indexmap::{IndexMap, IndexSet, map::Keys, set};
use thiserror::Error;
use tracing::debug;

use crate::{
    observer::{EdgeCallback, ObserverError, ObserverResult},
    traversal::{CallbackIndex, Traversal, TraversalRegistry},
};

/// Requirements on vertex identifiers.
pub trait VertexKey: Copy + Eq + Hash + Ord + Debug + 'static {}

impl<T> VertexKey for T where T: Copy + Eq + Hash + Ord + Debug + 'static {}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError<V: Debug> {
    #[error("vertex {0:?} is not in the graph")]
    VertexNotFound(V),
    #[error("edge ({0:?}, {1:?}) is not in the graph")]
    EdgeNotFound(V, V),
    #[error("self-loop on vertex {0:?} is not allowed")]
    SelfLoop(V),
    #[error("no traversal callback at index {0}")]
    CallbackIndex(CallbackIndex),
    #[error(transparent)]
    Observer(#[from] ObserverError),
}

/// Node traversal over an [`ObservableGraph`].
pub type Nodes<'a, V> = Traversal<std::iter::Copied<Keys<'a, V, IndexSet<V>>>, V>;

/// Neighbour traversal over an [`ObservableGraph`].
pub type Neighbors<'a, V> = Traversal<Adjacent<'a, V>, V>;

/// Plain iterator over an adjacency list; empty for a vertex that is not in the graph.
#[derive(Clone, Debug)]
pub struct Adjacent<'a, V>(Option<set::Iter<'a, V>>);

impl<V: Copy> Iterator for Adjacent<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.0.as_mut()?.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.as_ref().map_or((0, Some(0)), Iterator::size_hint)
    }
}

/// A simple undirected graph that reports edge mutations and traversals to registered observers.
///
/// Vertices and neighbours are kept in insertion order, so every traversal of an unchanged graph
/// visits them in the same order.
///
/// Observers run synchronously after the change they report has been committed. The first
/// observer that fails stops the notification and its error is returned by the mutating call.
#[derive(Derivative)]
#[derivative(Debug(bound = ""), Default(bound = ""))]
pub struct ObservableGraph<V: VertexKey> {
    adjacency: IndexMap<V, IndexSet<V>>,
    edge_count: usize,
    #[derivative(Debug = "ignore")]
    edge_added: Vec<EdgeCallback<V>>,
    #[derivative(Debug = "ignore")]
    edge_removed: Vec<EdgeCallback<V>>,
    #[derivative(Debug = "ignore")]
    traversal: TraversalRegistry<V>,
}

impl<V: VertexKey> Clone for ObservableGraph<V> {
    /// Copies vertices and edges. Observers stay with the original graph.
    fn clone(&self) -> Self {
        Self {
            adjacency: self.adjacency.clone(),
            edge_count: self.edge_count,
            ..Self::default()
        }
    }
}

impl<V: VertexKey> PartialEq for ObservableGraph<V> {
    fn eq(&self, other: &Self) -> bool {
        self.adjacency.len() == other.adjacency.len()
            && self.adjacency.iter().all(|(u, nbrs)| {
                other
                    .adjacency
                    .get(u)
                    .is_some_and(|other_nbrs| nbrs.iter().all(|v| other_nbrs.contains(v)))
                    && other.adjacency[u].len() == nbrs.len()
            })
    }
}

impl<V: VertexKey> Eq for ObservableGraph<V> {}

impl<V: VertexKey> FromIterator<(V, V)> for ObservableGraph<V> {
    /// Builds a graph from an edge list, skipping self-loops.
    fn from_iter<T: IntoIterator<Item = (V, V)>>(iter: T) -> Self {
        let mut graph = Self::default();
        for (u, v) in iter {
            if u != v {
                graph.insert_edge(u, v);
            }
        }
        graph
    }
}

impl<V: VertexKey> ObservableGraph<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    #[must_use]
    pub fn contains_vertex(&self, u: V) -> bool {
        self.adjacency.contains_key(&u)
    }

    #[must_use]
    pub fn contains_edge(&self, u: V, v: V) -> bool {
        self.adjacency.get(&u).is_some_and(|nbrs| nbrs.contains(&v))
    }

    #[must_use]
    pub fn degree(&self, u: V) -> Option<usize> {
        self.adjacency.get(&u).map(IndexSet::len)
    }

    /// Adds `u` if it is not already present. Returns whether the graph changed.
    pub fn add_vertex(&mut self, u: V) -> bool {
        if self.adjacency.contains_key(&u) {
            return false;
        }
        debug!(vertex = ?u, "adding vertex");
        self.adjacency.insert(u, IndexSet::new());
        true
    }

    /// Removes `u` together with its incident edges.
    ///
    /// Edge-removed observers are notified for every incident edge once the vertex is gone.
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::VertexNotFound`] if `u` is not in the graph, or with
    /// [`GraphError::Observer`] if an observer fails.
    pub fn remove_vertex(&mut self, u: V) -> Result<(), GraphError<V>> {
        let nbrs = self
            .adjacency
            .shift_remove(&u)
            .ok_or(GraphError::VertexNotFound(u))?;
        debug!(vertex = ?u, degree = nbrs.len(), "removing vertex");
        let removed: Vec<(V, V)> = nbrs.into_iter().map(|v| (u, v)).collect();
        for &(_, v) in &removed {
            if let Some(other) = self.adjacency.get_mut(&v) {
                other.shift_remove(&u);
            }
        }
        self.edge_count -= removed.len();
        Self::notify(&mut self.edge_removed, &removed)?;
        Ok(())
    }

    /// Inserts the edge `{u, v}`, adding missing endpoints, then notifies edge-added observers.
    ///
    /// Observers are notified even if the edge was already present.
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::SelfLoop`] if `u == v`, or with [`GraphError::Observer`] if an
    /// observer fails.
    pub fn add_edge(&mut self, u: V, v: V) -> Result<(), GraphError<V>> {
        self.add_edges_from([(u, v)])
    }

    /// Inserts every edge of the batch, then notifies observers once per pair.
    ///
    /// # Errors
    ///
    /// A self-loop anywhere in the batch rejects the whole batch before anything is inserted.
    pub fn add_edges_from<I>(&mut self, pairs: I) -> Result<(), GraphError<V>>
    where
        I: IntoIterator<Item = (V, V)>,
    {
        let pairs: Vec<(V, V)> = pairs.into_iter().collect();
        if let Some(&(u, _)) = pairs.iter().find(|(u, v)| u == v) {
            return Err(GraphError::SelfLoop(u));
        }
        for &(u, v) in &pairs {
            self.insert_edge(u, v);
        }
        Self::notify(&mut self.edge_added, &pairs)?;
        Ok(())
    }

    /// Removes the edge `{u, v}`, then notifies edge-removed observers.
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::EdgeNotFound`] if the edge is absent.
    pub fn remove_edge(&mut self, u: V, v: V) -> Result<(), GraphError<V>> {
        self.remove_edges_from([(u, v)])
    }

    /// Removes every edge of the batch, then notifies observers once per pair.
    ///
    /// # Errors
    ///
    /// If any edge is absent nothing is removed and [`GraphError::EdgeNotFound`] is returned.
    pub fn remove_edges_from<I>(&mut self, pairs: I) -> Result<(), GraphError<V>>
    where
        I: IntoIterator<Item = (V, V)>,
    {
        let pairs: Vec<(V, V)> = pairs.into_iter().collect();
        if let Some(&(u, v)) = pairs.iter().find(|(u, v)| !self.contains_edge(*u, *v)) {
            return Err(GraphError::EdgeNotFound(u, v));
        }
        for &(u, v) in &pairs {
            // A batch may name the same edge twice.
            if self.adjacency[&u].contains(&v) {
                self.adjacency[&u].shift_remove(&v);
                self.adjacency[&v].shift_remove(&u);
                self.edge_count -= 1;
            }
        }
        debug!(count = pairs.len(), "removed edges");
        Self::notify(&mut self.edge_removed, &pairs)?;
        Ok(())
    }

    /// Vertices in insertion order, reported to traversal observers.
    pub fn nodes(&self) -> Nodes<'_, V> {
        self.traversal.wrap(self.adjacency.keys().copied())
    }

    /// Neighbours of `u`, reported to traversal observers.
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::VertexNotFound`] if `u` is not in the graph.
    pub fn neighbors(&self, u: V) -> Result<Neighbors<'_, V>, GraphError<V>> {
        let nbrs = self.adjacency.get(&u).ok_or(GraphError::VertexNotFound(u))?;
        Ok(self.traversal.wrap(Adjacent(Some(nbrs.iter()))))
    }

    pub(crate) fn neighbors_or_empty(&self, u: V) -> Neighbors<'_, V> {
        self.traversal
            .wrap(Adjacent(self.adjacency.get(&u).map(IndexSet::iter)))
    }

    /// Vertices in insertion order without notifying traversal observers.
    ///
    /// Renderers use this so that drawing never shows up as algorithm progress.
    pub fn vertices(&self) -> impl Iterator<Item = V> + Clone + '_ {
        self.adjacency.keys().copied()
    }

    /// Edges incident to `u` as `(u, v)` pairs, without notifying traversal observers.
    pub fn incident_edges(&self, u: V) -> impl Iterator<Item = (V, V)> + '_ {
        self.adjacency
            .get(&u)
            .into_iter()
            .flatten()
            .map(move |&v| (u, v))
    }

    /// Every edge once, as `(u, v)` with `u` inserted before `v`.
    pub fn edges(&self) -> impl Iterator<Item = (V, V)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(move |(i, (&u, nbrs))| {
                nbrs.iter()
                    .filter(move |v| self.adjacency.get_index_of(*v).is_some_and(|j| j > i))
                    .map(move |&v| (u, v))
            })
    }

    pub fn register_edge_added_callback<F>(&mut self, callback: F)
    where
        F: FnMut(V, V) -> ObserverResult + 'static,
    {
        self.edge_added.push(Box::new(callback));
    }

    pub fn register_edge_removed_callback<F>(&mut self, callback: F)
    where
        F: FnMut(V, V) -> ObserverResult + 'static,
    {
        self.edge_removed.push(Box::new(callback));
    }

    /// Registers a callback for every vertex produced by [`Self::nodes`] and [`Self::neighbors`].
    ///
    /// Takes `&self` so that observers can be attached while a traversal is in flight; the
    /// in-flight traversal picks them up on its next step.
    pub fn register_node_traversal_callback<F>(&self, callback: F) -> CallbackIndex
    where
        F: FnMut(V) -> ObserverResult + 'static,
    {
        self.traversal.register(callback)
    }

    /// # Errors
    ///
    /// Fails with [`GraphError::CallbackIndex`] if no callback is registered at `index`.
    pub fn remove_node_traversal_callback(&self, index: CallbackIndex) -> Result<(), GraphError<V>> {
        if self.traversal.remove(index) {
            Ok(())
        } else {
            Err(GraphError::CallbackIndex(index))
        }
    }

    pub fn clear_node_traversal_callbacks(&self) {
        self.traversal.clear();
    }

    #[must_use]
    pub fn node_traversal_callback_count(&self) -> usize {
        self.traversal.len()
    }

    /// Takes the first traversal observer failure recorded since the last call.
    pub fn take_traversal_fault(&self) -> Option<ObserverError> {
        self.traversal.take_fault()
    }

    fn insert_edge(&mut self, u: V, v: V) {
        self.add_vertex(u);
        self.add_vertex(v);
        if self.adjacency[&u].insert(v) {
            self.adjacency[&v].insert(u);
            self.edge_count += 1;
            debug!(?u, ?v, "adding edge");
        }
    }

    fn notify(callbacks: &mut [EdgeCallback<V>], pairs: &[(V, V)]) -> Result<(), ObserverError> {
        for &(u, v) in pairs {
            for callback in callbacks.iter_mut() {
                callback(u, v)?;
            }
        }
        Ok(())
    }
}
