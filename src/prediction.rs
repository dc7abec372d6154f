//! Turning a cut into per-entity labels that can be scored against truth.

use crate::oracle::CutResult;
use crate::WeightedGraph;

/// Derives a binary label sequence from a cut. The shape and order of the
/// output must match the ground truth it will be compared with.
pub trait PredictionAdapter {
    fn predict(&self, graph: &WeightedGraph, cut: &CutResult) -> Vec<bool>;
}

/// One label per edge, in `graph.edges()` order: `true` when both endpoints
/// ended up in the same group (the edge was not cut).
#[derive(Copy, Clone, Debug, Default)]
pub struct SameGroupEdges;

impl PredictionAdapter for SameGroupEdges {
    fn predict(&self, graph: &WeightedGraph, cut: &CutResult) -> Vec<bool> {
        let assignment = cut.assignment(graph.node_count());
        graph
            .edges()
            .iter()
            .map(|e| assignment[e.u] == assignment[e.v])
            .collect()
    }
}

/// One label per node: nodes of the side holding exactly `tagged_size` nodes
/// are `true`. Side B is checked first; if neither side has that size, side A
/// is tagged.
#[derive(Copy, Clone, Debug)]
pub struct TaggedGroupNodes {
    pub tagged_size: usize,
}

impl Default for TaggedGroupNodes {
    fn default() -> Self {
        Self { tagged_size: 2 }
    }
}

impl PredictionAdapter for TaggedGroupNodes {
    fn predict(&self, graph: &WeightedGraph, cut: &CutResult) -> Vec<bool> {
        let tagged = if cut.group_b.len() == self.tagged_size {
            &cut.group_b
        } else {
            if cut.group_a.len() != self.tagged_size {
                log::debug!(
                    "no side has {} nodes ({} / {}), tagging side A",
                    self.tagged_size,
                    cut.group_a.len(),
                    cut.group_b.len()
                );
            }
            &cut.group_a
        };
        let mut labels = vec![false; graph.node_count()];
        for &n in tagged.iter() {
            if n < labels.len() {
                labels[n] = true;
            }
        }
        labels
    }
}
