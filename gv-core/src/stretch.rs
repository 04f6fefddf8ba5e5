//! Distortion of a tree-cover embedding.
//!
//! A base graph is embedded into a family of covers (usually trees) on the same vertex keys. For a
//! pair of vertices connected in the base graph, its stretch is the best ratio over all covers of
//! the cover distance to the base distance. The distortion of the embedding is the worst stretch
//! over all connected pairs.

use std::fmt::Debug;

use derivative::Derivative;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    algorithms::{AlgorithmError, all_pairs_shortest_path_lengths, shortest_path_lengths},
    graph::{ObservableGraph, VertexKey},
};

pub const DEFAULT_BAD_PAIR_THRESHOLD: f64 = 2.0;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StretchError<V: Debug> {
    #[error("at least one cover is needed to measure stretch")]
    NoCovers,
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError<V>),
}

/// A connected pair whose best cover stretches it beyond the threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BadPair<V> {
    pub source: V,
    pub target: V,
    /// Best cover ratio; infinite if no cover connects the pair.
    pub ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Derivative)]
#[derivative(Default(bound = ""))]
pub struct StretchReport<V> {
    /// Worst best-cover ratio over connected pairs, `1` when no pair is connected.
    #[derivative(Default(value = "1.0"))]
    pub distortion: f64,
    pub bad_pairs: Vec<BadPair<V>>,
}

/// Measures the distortion of `covers` against `base` and lists the pairs stretched beyond
/// `threshold`, in base insertion order.
pub fn tree_cover_stretch<V: VertexKey>(
    base: &ObservableGraph<V>,
    covers: &[&ObservableGraph<V>],
    threshold: f64,
) -> Result<StretchReport<V>, StretchError<V>> {
    if covers.is_empty() {
        return Err(StretchError::NoCovers);
    }

    let base_lengths = all_pairs_shortest_path_lengths(base)?;
    let mut report = StretchReport::default();
    for (&source, row) in &base_lengths {
        let cover_lengths: Vec<_> = covers
            .iter()
            .filter(|cover| cover.contains_vertex(source))
            .map(|&cover| shortest_path_lengths(cover, source))
            .collect::<Result<_, _>>()?;
        for (&target, &base_length) in row {
            // Each unordered pair once, from its earlier endpoint.
            if base_length == 0
                || base_lengths.get_index_of(&target) < base_lengths.get_index_of(&source)
            {
                continue;
            }
            let ratio = best_ratio(&cover_lengths, target, base_length);
            report.distortion = report.distortion.max(ratio);
            if ratio > threshold {
                report.bad_pairs.push(BadPair {
                    source,
                    target,
                    ratio,
                });
            }
        }
    }
    debug!(
        distortion = report.distortion,
        bad_pairs = report.bad_pairs.len(),
        "computed stretch"
    );
    Ok(report)
}

/// Distortion alone, see [`tree_cover_stretch`].
pub fn tree_cover_distortion<V: VertexKey>(
    base: &ObservableGraph<V>,
    covers: &[&ObservableGraph<V>],
) -> Result<f64, StretchError<V>> {
    Ok(tree_cover_stretch(base, covers, f64::INFINITY)?.distortion)
}

#[allow(clippy::cast_precision_loss)]
fn best_ratio<V: VertexKey>(cover_lengths: &[IndexMap<V, usize>], target: V, base: usize) -> f64 {
    cover_lengths
        .iter()
        .filter_map(|lengths| lengths.get(&target))
        .map(|&length| length as f64 / base as f64)
        .fold(f64::INFINITY, f64::min)
}
