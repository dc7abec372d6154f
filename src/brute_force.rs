//! Exhaustive max-cut search for small graphs.
//!
//! Every assignment of `n` nodes to two sides is an `n`-bit integer, bit `i`
//! holding the side of node `i`. The search keeps the assignment with the
//! strictly greatest cut weight; among equal weights the lowest integer wins.
//!
//! An assignment and its complement cut the same edges, and for any integer
//! with the top bit set the complement is smaller. Such integers can never
//! win the tie-break, so only `1 .. 2^(n-1)` is enumerated (0 is the
//! one-sided assignment). The result equals a full enumeration.

use crate::oracle::{ensure_cuttable, CutOracle, CutResult};
use crate::partition_util::{assignment_from_bits, groups_from_assignment};
use crate::{Edge, PartitionError, Result, WeightedGraph};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Largest graph a 64-bit assignment can describe with the top bit fixed.
pub const MAX_SUPPORTED_NODES: usize = 63;

#[derive(Clone, Debug)]
pub struct BruteForceConfig {
    /// Graphs with more nodes are refused with `SearchSpaceTooLarge`.
    pub max_nodes: usize,
    /// Split the enumeration over the rayon thread pool.
    pub parallel: bool,
    /// Candidates per work unit. Progress is published once per unit.
    pub chunk_size: u64,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            max_nodes: 26,
            parallel: true,
            chunk_size: 1 << 14,
        }
    }
}

/// Cooperative cancellation flag shared with a running search.
/// Once set it stays set until [`CancellationToken::reset`].
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress counters of the current (or last) search, readable from any thread.
#[derive(Clone, Debug, Default)]
pub struct SearchProgress {
    evaluated: Arc<AtomicU64>,
    total: Arc<AtomicU64>,
}

impl SearchProgress {
    pub fn evaluated(&self) -> u64 {
        self.evaluated.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Completed share of the search in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.evaluated() as f64 / total as f64).min(1.0)
    }

    fn start(&self, total: u64) {
        self.evaluated.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    fn advance(&self, n: u64) {
        self.evaluated.fetch_add(n, Ordering::Relaxed);
    }
}

/// Winning assignment of a search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BestCut {
    pub bits: u64,
    pub cost: f64,
}

impl BestCut {
    fn better(current: Option<BestCut>, candidate: Option<BestCut>) -> Option<BestCut> {
        match (current, candidate) {
            (Some(c), Some(n)) if n.cost > c.cost || (n.cost == c.cost && n.bits < c.bits) => {
                Some(n)
            }
            (Some(c), _) => Some(c),
            (None, n) => n,
        }
    }
}

pub struct ExactBruteForceSolver {
    config: BruteForceConfig,
    progress: SearchProgress,
    cancel: CancellationToken,
}

impl ExactBruteForceSolver {
    pub fn new(config: BruteForceConfig) -> Self {
        Self {
            config,
            progress: SearchProgress::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &BruteForceConfig {
        &self.config
    }

    /// Handle to the progress counters; stays valid across searches.
    pub fn progress(&self) -> SearchProgress {
        self.progress.clone()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Finds the maximum cut of `graph`.
    pub fn search(&self, graph: &WeightedGraph) -> Result<BestCut> {
        ensure_cuttable(graph)?;
        let n = graph.node_count();
        let limit = self.config.max_nodes.min(MAX_SUPPORTED_NODES);
        if n > limit {
            return Err(PartitionError::SearchSpaceTooLarge(n, limit));
        }

        let end = 1u64 << (n - 1);
        let total = end - 1;
        let chunk_size = self.config.chunk_size.max(1);
        let chunks = total.div_ceil(chunk_size);
        self.progress.start(total);

        let edges = graph.edges();
        let range = |c: u64| {
            let lo = 1 + c * chunk_size;
            let hi = lo.saturating_add(chunk_size).min(end);
            search_range(edges, lo, hi, &self.cancel, &self.progress)
        };

        let best = if self.config.parallel && chunks > 1 {
            // Chunks come back in index order, so folding them keeps the tie-break.
            let bests = (0..chunks as usize)
                .into_par_iter()
                .map(|c| range(c as u64))
                .collect::<Result<Vec<_>>>()?;
            bests.into_iter().fold(None, BestCut::better)
        } else {
            let mut best = None;
            for c in 0..chunks {
                best = BestCut::better(best, range(c)?);
            }
            best
        };

        best.ok_or_else(|| {
            PartitionError::DegenerateGraph(format!("no two-sided assignment of {n} nodes"))
        })
    }
}

/// Cut weight of the assignment encoded in `bits`.
pub fn cut_cost(edges: &[Edge], bits: u64) -> f64 {
    edges
        .iter()
        .filter(|e| ((bits >> e.u) ^ (bits >> e.v)) & 1 == 1)
        .map(|e| e.weight)
        .sum()
}

fn search_range(
    edges: &[Edge],
    lo: u64,
    hi: u64,
    cancel: &CancellationToken,
    progress: &SearchProgress,
) -> Result<Option<BestCut>> {
    let mut best: Option<BestCut> = None;
    for bits in lo..hi {
        if cancel.is_cancelled() {
            return Err(PartitionError::Cancelled);
        }
        let cost = cut_cost(edges, bits);
        if best.map_or(true, |b| cost > b.cost) {
            best = Some(BestCut { bits, cost });
        }
    }
    progress.advance(hi - lo);
    Ok(best)
}

impl CutOracle for ExactBruteForceSolver {
    fn name(&self) -> &str {
        "brute-force"
    }

    fn solve(&mut self, graph: &WeightedGraph) -> Result<CutResult> {
        let t1 = Instant::now();
        let best = self.search(graph)?;
        let assignment = assignment_from_bits(best.bits, graph.node_count());
        let (group_a, group_b) = groups_from_assignment(&assignment);
        let result = CutResult::new(group_a, group_b, t1.elapsed());
        log::debug!(
            "brute-force: {} nodes, best cut {} ({:#b}) after {} candidates in {:?}",
            graph.node_count(),
            best.cost,
            best.bits,
            self.progress.evaluated(),
            result.elapsed
        );
        Ok(result)
    }
}
