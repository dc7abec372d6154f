use crate::oracle::{ensure_cuttable, CutOracle, CutResult};
use crate::partition_util::{
    groups_from_assignment, initial_assignment, InitialPartitioningMethod,
};
use crate::{Node, Result, WeightedGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct AnnealingConfig {
    /// The seed for the random number generator.
    pub rng_seed: u64,
    /// What initial partitioning method to use.
    pub initial_partitioning: InitialPartitioningMethod,
    /// The maximum amount of iterations (sweeps over all vertices) the algorithm is allowed
    /// to run.
    pub max_iterations: u32,
    /// If this is set to Some(n), the algorithm will stop if no flips have occurred in the
    /// last n iterations (the algorithm has converged). `Some(0)` disables the check.
    pub stop_early_n: Option<u32>,
    /// The initial temperature, relative to the mean absolute edge weight.
    pub temperature_start: f64,
    /// How much the temperature decreases every iteration. At zero only improving flips are taken.
    pub temperature_delta: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            rng_seed: 1234,
            initial_partitioning: InitialPartitioningMethod::Random,
            max_iterations: 500,
            stop_early_n: Some(4),
            temperature_start: 2.0,
            temperature_delta: 0.01,
        }
    }
}

/// Result of one annealing run.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnealingOutcome {
    /// Best assignment seen during the run (`true` = side B).
    pub assignment: Vec<bool>,
    pub cut: f64,
    pub iterations: u32,
    pub flips: u64,
}

/// Heuristic max-cut oracle based on single-vertex flips with simulated
/// annealing. It stands in for annealing hardware: results depend on the
/// random state, which advances across calls, so solving the same graph twice
/// may give different cuts.
pub struct AnnealingSolver {
    config: AnnealingConfig,
    rng: StdRng,
}

impl AnnealingSolver {
    pub fn new(config: AnnealingConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.rng_seed);
        Self { config, rng }
    }

    pub fn anneal(&mut self, graph: &WeightedGraph) -> AnnealingOutcome {
        let n = graph.node_count();
        let mut assignment =
            initial_assignment(graph, self.config.initial_partitioning, &mut self.rng);
        let mut side_count = [0usize; 2];
        for &side in assignment.iter() {
            side_count[side as usize] += 1;
        }

        let scale = if graph.edge_count() == 0 {
            1.0
        } else {
            graph.edges().iter().map(|e| e.weight.abs()).sum::<f64>() / graph.edge_count() as f64
        };

        let mut cut = graph.cut_weight(&assignment);
        let mut best = assignment.clone();
        let mut best_cut = cut;
        log::trace!("initial cut: {cut}");

        // `Some(0)` has no window to compare and is treated like `None`.
        let stop_early_n = self.config.stop_early_n.filter(|&n| n > 0);
        let mut stop_indicators = vec![0; stop_early_n.unwrap_or(1) as usize];
        let mut flips = 0u64;
        let mut iterations = 0;
        let mut temperature = self.config.temperature_start;

        for iteration in 0..self.config.max_iterations {
            iterations = iteration + 1;
            for vx in 0..n {
                let side = assignment[vx];
                // A side is never emptied.
                if side_count[side as usize] == 1 {
                    continue;
                }

                let gain = flip_gain(graph, &assignment, vx);
                if self.accept(gain, temperature * scale) {
                    assignment[vx] = !side;
                    side_count[side as usize] -= 1;
                    side_count[(!side) as usize] += 1;
                    flips += 1;

                    cut += gain;
                    if cut > best_cut {
                        best_cut = cut;
                        best.clone_from(&assignment);
                    }
                }
            }

            temperature = (temperature - self.config.temperature_delta).max(0.0);
            log::trace!("iteration: {iteration}, cut: {cut}, flips: {flips}");

            if stop_early_n.is_some() {
                stop_indicators.rotate_right(1);
                stop_indicators[0] = flips;
                // Stop if no flips occurred in the last n rounds (all indicators are equal).
                if stop_indicators.iter().min() == stop_indicators.iter().max() {
                    log::trace!("stopping early");
                    break;
                }
            }
        }

        AnnealingOutcome {
            // Recomputed to drop the drift of the running sum.
            cut: graph.cut_weight(&best),
            assignment: best,
            iterations,
            flips,
        }
    }

    /// Metropolis acceptance; at zero temperature only strict improvements pass.
    fn accept(&mut self, gain: f64, temperature: f64) -> bool {
        if gain > 0.0 {
            return true;
        }
        if temperature <= 0.0 {
            return false;
        }
        self.rng.gen::<f64>() < (gain / temperature).exp()
    }
}

/// Change of the cut weight if `vx` moves to the other side.
fn flip_gain(graph: &WeightedGraph, assignment: &[bool], vx: Node) -> f64 {
    let mut gain = 0.0;
    for e in graph.neighbors(vx).iter() {
        if assignment[e.dst] == assignment[vx] {
            gain += e.weight;
        } else {
            gain -= e.weight;
        }
    }
    gain
}

impl CutOracle for AnnealingSolver {
    fn name(&self) -> &str {
        "annealing"
    }

    fn solve(&mut self, graph: &WeightedGraph) -> Result<CutResult> {
        ensure_cuttable(graph)?;
        let t1 = Instant::now();
        let outcome = self.anneal(graph);
        let (group_a, group_b) = groups_from_assignment(&outcome.assignment);
        let result = CutResult::new(group_a, group_b, t1.elapsed());
        log::debug!(
            "annealing: {} nodes, cut {} after {} iterations ({} flips) in {:?}",
            graph.node_count(),
            outcome.cut,
            outcome.iterations,
            outcome.flips,
            result.elapsed
        );
        Ok(result)
    }
}
