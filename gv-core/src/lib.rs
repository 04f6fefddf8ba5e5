#![warn(clippy::all, rust_2018_idioms)]

pub mod algorithms;
pub mod geometry;
pub mod graph;
pub mod observer;
pub mod petgraph;
pub mod stretch;
pub mod traversal;

pub use graph::{GraphError, ObservableGraph, VertexKey};
pub use observer::{ObserverError, ObserverResult};
