// Max-cut graph bisection. A graph is split in two by a cut oracle (exhaustive
// search, a software annealer or any external black box) and the halves are
// split again until every group fits under a size threshold.

pub mod annealing;
pub mod bisection;
pub mod brute_force;
pub mod error;
pub mod evaluation;
pub mod generate;
pub mod oracle;
pub mod partition_util;
pub mod prediction;

pub use annealing::{AnnealingConfig, AnnealingOutcome, AnnealingSolver};
pub use bisection::{
    bisect, Bisection, BisectionConfig, BisectionLog, LogEntry, Objective, RecursiveBisector,
};
pub use brute_force::{
    BestCut, BruteForceConfig, CancellationToken, ExactBruteForceSolver, SearchProgress,
};
pub use error::{PartitionError, Result};
pub use evaluation::{accuracy, Efficiency, EvaluationConfig, EvaluationReport, Evaluator, Instance};
pub use oracle::{BlackBoxOracle, CutOracle, CutResult, OracleKind};
pub use partition_util::InitialPartitioningMethod;
pub use prediction::{PredictionAdapter, SameGroupEdges, TaggedGroupNodes};

use std::collections::HashMap;
use std::ops::Range;

/// Index of a vertex, local to the graph it belongs to.
pub type Node = usize;

/// A set of nodes, stored in ascending order.
pub type Partition = Vec<Node>;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GraphEdge {
    pub dst: Node,
    pub weight: f64,
}

/// Undirected weighted edge with `u < v`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub u: Node,
    pub v: Node,
    pub weight: f64,
}

/// Immutable weighted graph for one bisection instance.
///
/// Nodes are `0..node_count`. Every graph remembers, for each of its nodes,
/// the index that node had in the root graph it was induced from, so groups
/// can be reported in root terms after any number of splits.
#[derive(Clone, Debug)]
pub struct WeightedGraph {
    origin: Vec<usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<(Node, Node), f64>,
    adjacency: Vec<Vec<GraphEdge>>,
}

impl WeightedGraph {
    /// Builds a root graph. Edges may be given in either orientation; they are
    /// stored as `u < v` in the order supplied.
    pub fn new<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Node, Node, f64)>,
    {
        let mut list = Vec::new();
        let mut seen = HashMap::new();
        for (a, b, weight) in edges {
            if a >= node_count || b >= node_count {
                return Err(PartitionError::InvalidEdge(
                    a,
                    b,
                    format!("endpoint outside 0..{node_count}"),
                ));
            }
            if a == b {
                return Err(PartitionError::InvalidEdge(a, b, "self-loop".to_string()));
            }
            if !weight.is_finite() {
                return Err(PartitionError::InvalidEdge(
                    a,
                    b,
                    format!("weight {weight} is not finite"),
                ));
            }
            let (u, v) = (a.min(b), a.max(b));
            if seen.insert((u, v), weight).is_some() {
                return Err(PartitionError::InvalidEdge(a, b, "duplicate edge".to_string()));
            }
            list.push(Edge { u, v, weight });
        }
        Ok(Self::from_parts((0..node_count).collect(), list))
    }

    fn from_parts(origin: Vec<usize>, edges: Vec<Edge>) -> Self {
        let mut adjacency = vec![Vec::new(); origin.len()];
        let mut edge_index = HashMap::with_capacity(edges.len());
        for e in edges.iter() {
            adjacency[e.u].push(GraphEdge { dst: e.v, weight: e.weight });
            adjacency[e.v].push(GraphEdge { dst: e.u, weight: e.weight });
            edge_index.insert((e.u, e.v), e.weight);
        }
        Self {
            origin,
            edges,
            edge_index,
            adjacency,
        }
    }

    pub fn node_count(&self) -> usize {
        self.origin.len()
    }

    pub fn nodes(&self) -> Range<Node> {
        0..self.origin.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Root-graph index of every local node.
    pub fn origin(&self) -> &[usize] {
        &self.origin
    }

    pub fn neighbors(&self, node: Node) -> &[GraphEdge] {
        &self.adjacency[node]
    }

    /// Weight of the edge between `u` and `v`, in either order.
    pub fn edge_weight(&self, u: Node, v: Node) -> Option<f64> {
        self.edge_index.get(&(u.min(v), u.max(v))).copied()
    }

    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Returns the node-induced subgraph on `subset`.
    ///
    /// Nodes are renumbered `0..subset.len()` in ascending order of their
    /// index in `self`, regardless of the order of `subset`. Only edges with
    /// both endpoints in the subset are copied, with their weights.
    pub fn induce(&self, subset: &[Node]) -> Result<WeightedGraph> {
        if subset.is_empty() {
            return Err(PartitionError::InvalidSubset("subset is empty".to_string()));
        }

        let mut sorted = subset.to_vec();
        sorted.sort_unstable();
        for pair in sorted.windows(2) {
            if pair[0] == pair[1] {
                return Err(PartitionError::InvalidSubset(format!("node {} repeated", pair[0])));
            }
        }
        if let Some(&last) = sorted.last() {
            if last >= self.node_count() {
                return Err(PartitionError::InvalidSubset(format!(
                    "node {last} outside 0..{}",
                    self.node_count()
                )));
            }
        }

        let mut local = vec![None; self.node_count()];
        for (new, &old) in sorted.iter().enumerate() {
            local[old] = Some(new);
        }

        let edges = self
            .edges
            .iter()
            .filter_map(|e| match (local[e.u], local[e.v]) {
                (Some(u), Some(v)) => Some(Edge { u, v, weight: e.weight }),
                _ => None,
            })
            .collect();
        let origin = sorted.iter().map(|&n| self.origin[n]).collect();

        Ok(Self::from_parts(origin, edges))
    }

    /// Sum of the weights of edges whose endpoints are on different sides.
    pub fn cut_weight(&self, assignment: &[bool]) -> f64 {
        debug_assert_eq!(assignment.len(), self.node_count());
        self.edges
            .iter()
            .filter(|e| assignment[e.u] != assignment[e.v])
            .map(|e| e.weight)
            .sum()
    }

    /// Sum of the weights of edges that stay inside one of `groups`.
    /// Nodes that appear in no group contribute nothing.
    pub fn internal_weight(&self, groups: &[Vec<Node>]) -> f64 {
        let mut group_of = vec![usize::MAX; self.node_count()];
        for (g, group) in groups.iter().enumerate() {
            for &n in group.iter() {
                if n < group_of.len() {
                    group_of[n] = g;
                }
            }
        }
        self.edges
            .iter()
            .filter(|e| group_of[e.u] != usize::MAX && group_of[e.u] == group_of[e.v])
            .map(|e| e.weight)
            .sum()
    }
}
