//! The cut oracle seam.
//!
//! An oracle takes a [`WeightedGraph`] and returns a two-way partition of its
//! nodes. The bisector and evaluator only ever talk to [`CutOracle`], so an
//! exhaustive search, the software annealer and any external solver (for
//! example one backed by annealing hardware) are interchangeable.

use crate::annealing::{AnnealingConfig, AnnealingSolver};
use crate::brute_force::{BruteForceConfig, ExactBruteForceSolver};
use crate::partition_util::assignment_from_groups;
use crate::{Partition, PartitionError, Result, WeightedGraph};
use std::time::{Duration, Instant};

/// Outcome of one `solve` call. Node indices are local to the solved graph.
#[derive(Clone, Debug, PartialEq)]
pub struct CutResult {
    pub group_a: Partition,
    pub group_b: Partition,
    pub elapsed: Duration,
}

impl CutResult {
    /// Groups are stored sorted.
    pub fn new(mut group_a: Partition, mut group_b: Partition, elapsed: Duration) -> Self {
        group_a.sort_unstable();
        group_b.sort_unstable();
        Self {
            group_a,
            group_b,
            elapsed,
        }
    }

    /// Checks the oracle contract against the graph that was solved: both
    /// groups together hold every node exactly once and neither is empty.
    pub fn validate(&self, graph: &WeightedGraph, oracle: &str) -> Result<()> {
        let n = graph.node_count();
        let mut seen = vec![false; n];
        for &node in self.group_a.iter().chain(self.group_b.iter()) {
            if node >= n {
                return Err(PartitionError::contract(oracle, format!("node {node} outside 0..{n}")));
            }
            if seen[node] {
                return Err(PartitionError::contract(oracle, format!("node {node} assigned twice")));
            }
            seen[node] = true;
        }
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(PartitionError::contract(oracle, format!("node {missing} not assigned")));
        }
        if self.group_a.is_empty() || self.group_b.is_empty() {
            return Err(PartitionError::DegenerateGraph(format!(
                "oracle `{oracle}` put all {n} nodes on one side"
            )));
        }
        Ok(())
    }

    /// `false` for nodes in `group_a`, `true` for nodes in `group_b`.
    pub fn assignment(&self, node_count: usize) -> Vec<bool> {
        assignment_from_groups(node_count, &self.group_b)
    }

    pub fn cut_weight(&self, graph: &WeightedGraph) -> f64 {
        graph.cut_weight(&self.assignment(graph.node_count()))
    }
}

/// A solver for the two-way cut problem.
///
/// Implementations must return disjoint groups covering every node and must
/// fail with [`PartitionError::DegenerateGraph`] for graphs with fewer than two
/// nodes. Nothing else is assumed: in particular two calls on the same graph
/// may disagree.
pub trait CutOracle {
    fn name(&self) -> &str;

    fn solve(&mut self, graph: &WeightedGraph) -> Result<CutResult>;
}

impl<O: CutOracle + ?Sized> CutOracle for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, graph: &WeightedGraph) -> Result<CutResult> {
        (**self).solve(graph)
    }
}

impl<O: CutOracle + ?Sized> CutOracle for &mut O {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, graph: &WeightedGraph) -> Result<CutResult> {
        (**self).solve(graph)
    }
}

pub(crate) fn ensure_cuttable(graph: &WeightedGraph) -> Result<()> {
    if graph.node_count() < 2 {
        return Err(PartitionError::DegenerateGraph(format!(
            "cannot cut a graph with {} node(s)",
            graph.node_count()
        )));
    }
    Ok(())
}

/// Wraps any external solver as an oracle. The closure returns
/// `(group_a, group_b)`; the wrapper times the call and checks the contract.
pub struct BlackBoxOracle<F> {
    name: String,
    solve: F,
}

impl<F> BlackBoxOracle<F>
where
    F: FnMut(&WeightedGraph) -> Result<(Partition, Partition)>,
{
    pub fn new(name: impl Into<String>, solve: F) -> Self {
        Self {
            name: name.into(),
            solve,
        }
    }
}

impl<F> CutOracle for BlackBoxOracle<F>
where
    F: FnMut(&WeightedGraph) -> Result<(Partition, Partition)>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(&mut self, graph: &WeightedGraph) -> Result<CutResult> {
        ensure_cuttable(graph)?;
        let t1 = Instant::now();
        let (group_a, group_b) = (self.solve)(graph)?;
        let result = CutResult::new(group_a, group_b, t1.elapsed());
        result.validate(graph, &self.name)?;
        log::debug!(
            "{}: cut {} nodes into {}/{} in {:?}",
            self.name,
            graph.node_count(),
            result.group_a.len(),
            result.group_b.len(),
            result.elapsed
        );
        Ok(result)
    }
}

/// The built-in oracles, chosen when the run is configured.
#[derive(Clone, Debug)]
pub enum OracleKind {
    BruteForce(BruteForceConfig),
    Annealing(AnnealingConfig),
}

impl OracleKind {
    pub fn build(self) -> Box<dyn CutOracle> {
        match self {
            OracleKind::BruteForce(config) => Box::new(ExactBruteForceSolver::new(config)),
            OracleKind::Annealing(config) => Box::new(AnnealingSolver::new(config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> WeightedGraph {
        WeightedGraph::new(3, [(0, 1, 2.0), (0, 2, 5.0), (1, 2, 1.0)]).unwrap()
    }

    #[test]
    fn test_validate_accepts_proper_cut() {
        let result = CutResult::new(vec![2, 1], vec![0], Duration::ZERO);
        assert_eq!(result.group_a, vec![1, 2]);
        assert!(result.validate(&triangle(), "test").is_ok());
        assert_eq!(result.cut_weight(&triangle()), 7.0);
    }

    #[test]
    fn test_validate_rejects_contract_violations() {
        let g = triangle();
        let overlap = CutResult::new(vec![0, 1], vec![1, 2], Duration::ZERO);
        assert!(matches!(
            overlap.validate(&g, "test"),
            Err(PartitionError::OracleContractViolation { .. })
        ));
        let missing = CutResult::new(vec![0], vec![1], Duration::ZERO);
        assert!(matches!(
            missing.validate(&g, "test"),
            Err(PartitionError::OracleContractViolation { .. })
        ));
        let outside = CutResult::new(vec![0, 1], vec![2, 3], Duration::ZERO);
        assert!(matches!(
            outside.validate(&g, "test"),
            Err(PartitionError::OracleContractViolation { .. })
        ));
        let one_sided = CutResult::new(vec![], vec![0, 1, 2], Duration::ZERO);
        assert!(matches!(
            one_sided.validate(&g, "test"),
            Err(PartitionError::DegenerateGraph(_))
        ));
    }

    #[test]
    fn test_black_box_oracle() {
        let mut calls = 0;
        let mut oracle = BlackBoxOracle::new("first-node", |g: &WeightedGraph| {
            calls += 1;
            Ok((vec![0], (1..g.node_count()).collect()))
        });
        assert_eq!(oracle.name(), "first-node");
        let result = oracle.solve(&triangle()).unwrap();
        assert_eq!(result.group_a, vec![0]);
        assert_eq!(result.group_b, vec![1, 2]);

        let single = WeightedGraph::new(1, Vec::<(usize, usize, f64)>::new()).unwrap();
        assert!(matches!(oracle.solve(&single), Err(PartitionError::DegenerateGraph(_))));
        drop(oracle);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_black_box_contract_is_enforced() {
        let mut oracle =
            BlackBoxOracle::new("lazy", |g: &WeightedGraph| Ok((g.nodes().collect(), vec![])));
        assert!(matches!(oracle.solve(&triangle()), Err(PartitionError::DegenerateGraph(_))));
    }

    #[test]
    fn test_oracle_kind_builds_named_oracles() {
        let brute = OracleKind::BruteForce(BruteForceConfig::default()).build();
        assert_eq!(brute.name(), "brute-force");
        let mut anneal = OracleKind::Annealing(AnnealingConfig::default()).build();
        assert_eq!(anneal.name(), "annealing");
        let result = anneal.solve(&triangle()).unwrap();
        assert!(result.validate(&triangle(), "annealing").is_ok());
    }
}
