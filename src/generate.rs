//! Synthetic inputs.

use crate::{Edge, WeightedGraph};
use rand::Rng;
use std::ops::RangeInclusive;

/// Complete graph on `node_count` nodes with integer weights drawn uniformly
/// from `weights`, e.g. `1..=10` for random course conflicts.
pub fn random_complete_graph<R: Rng>(
    node_count: usize,
    weights: RangeInclusive<u32>,
    rng: &mut R,
) -> WeightedGraph {
    let mut edges = Vec::with_capacity(node_count * node_count.saturating_sub(1) / 2);
    for u in 0..node_count {
        for v in u + 1..node_count {
            edges.push(Edge {
                u,
                v,
                weight: rng.gen_range(weights.clone()) as f64,
            });
        }
    }
    WeightedGraph::from_parts((0..node_count).collect(), edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_complete_graph() {
        let mut rng = StdRng::seed_from_u64(1);
        let graph = random_complete_graph(6, 1..=10, &mut rng);
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 15);
        for u in 0..6 {
            for v in 0..6 {
                if u != v {
                    let w = graph.edge_weight(u, v).unwrap();
                    assert!((1.0..=10.0).contains(&w));
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_graph() {
        let a = random_complete_graph(5, 1..=400, &mut StdRng::seed_from_u64(9));
        let b = random_complete_graph(5, 1..=400, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.edges(), b.edges());
    }
}
