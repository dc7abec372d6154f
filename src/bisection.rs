use crate::oracle::CutOracle;
use crate::{PartitionError, Result, WeightedGraph};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct BisectionConfig {
    /// Groups with at most this many nodes are not split any further.
    pub threshold: usize,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self { threshold: 10 }
    }
}

/// One oracle call made during a bisection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub subgraph_size: usize,
    pub elapsed: Duration,
}

/// Append-only record of the oracle calls of one bisection, in call order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BisectionLog {
    entries: Vec<LogEntry>,
}

impl BisectionLog {
    fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.entries.iter().map(|e| e.elapsed).sum()
    }

    /// `(size, seconds)` pairs for run time reports.
    pub fn as_seconds(&self) -> Vec<(usize, f64)> {
        self.entries
            .iter()
            .map(|e| (e.subgraph_size, e.elapsed.as_secs_f64()))
            .collect()
    }
}

/// Weight bookkeeping of a finished bisection against its root graph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Objective {
    /// Weight of all edges of the root graph.
    pub total: f64,
    /// Weight still inside a group, e.g. conflicts that remain.
    pub remaining: f64,
}

impl Objective {
    /// Weight moved between groups by the bisection.
    pub fn removed(&self) -> f64 {
        self.total - self.remaining
    }
}

/// Final groups of a bisection, as root-graph node indices, and its log.
#[derive(Clone, Debug, PartialEq)]
pub struct Bisection {
    pub groups: Vec<Vec<usize>>,
    pub log: BisectionLog,
}

impl Bisection {
    /// Maps every group to external labels, `labels[i]` naming root node `i`.
    pub fn labelled<T: Clone>(&self, labels: &[T]) -> Result<Vec<Vec<T>>> {
        self.groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|&n| {
                        labels.get(n).cloned().ok_or_else(|| {
                            PartitionError::InvalidSubset(format!("no label for node {n}"))
                        })
                    })
                    .collect()
            })
            .collect()
    }

    pub fn objective(&self, root: &WeightedGraph) -> Objective {
        Objective {
            total: root.total_weight(),
            remaining: root.internal_weight(&self.groups),
        }
    }
}

/// Splits a graph with a cut oracle until every group fits the threshold.
///
/// Pending subgraphs are kept on an explicit stack instead of the call stack.
/// The side-A subgraph of a split is always finished before its side-B
/// sibling, so groups come out in the same order as a depth-first recursion.
/// [`RecursiveBisector::step`] processes one pending subgraph at a time.
pub struct RecursiveBisector<O> {
    oracle: O,
    config: BisectionConfig,
    pending: Vec<WeightedGraph>,
    groups: Vec<Vec<usize>>,
    log: BisectionLog,
}

impl<O: CutOracle> RecursiveBisector<O> {
    pub fn new(graph: &WeightedGraph, oracle: O, config: BisectionConfig) -> Result<Self> {
        if config.threshold == 0 {
            return Err(PartitionError::InvalidConfig(
                "bisection threshold must be at least 1".to_string(),
            ));
        }
        let pending = if graph.node_count() == 0 {
            Vec::new()
        } else {
            vec![graph.clone()]
        };
        Ok(Self {
            oracle,
            config,
            pending,
            groups: Vec::new(),
            log: BisectionLog::default(),
        })
    }

    /// Number of subgraphs waiting to be processed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    /// Groups emitted so far.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn log(&self) -> &BisectionLog {
        &self.log
    }

    /// Processes the next pending subgraph. Returns whether work remains.
    ///
    /// On error the subgraph goes back on the stack untouched, so the state
    /// stays consistent; the call is not retried.
    pub fn step(&mut self) -> Result<bool> {
        let Some(graph) = self.pending.pop() else {
            return Ok(false);
        };

        if graph.node_count() <= self.config.threshold {
            self.groups.push(graph.origin().to_vec());
            return Ok(!self.pending.is_empty());
        }

        match self.split(&graph) {
            Ok((sub_a, sub_b)) => {
                self.pending.push(sub_b);
                self.pending.push(sub_a);
                Ok(true)
            }
            Err(e) => {
                log::debug!(
                    "{}: split of {} nodes failed: {e}",
                    self.oracle.name(),
                    graph.node_count()
                );
                self.pending.push(graph);
                Err(e)
            }
        }
    }

    fn split(&mut self, graph: &WeightedGraph) -> Result<(WeightedGraph, WeightedGraph)> {
        let cut = self.oracle.solve(graph)?;
        self.log.push(LogEntry {
            subgraph_size: graph.node_count(),
            elapsed: cut.elapsed,
        });
        cut.validate(graph, self.oracle.name())?;
        log::trace!(
            "split {} nodes into {} + {} in {:?}",
            graph.node_count(),
            cut.group_a.len(),
            cut.group_b.len(),
            cut.elapsed
        );
        Ok((graph.induce(&cut.group_a)?, graph.induce(&cut.group_b)?))
    }

    /// Runs until no subgraph is pending.
    pub fn run(mut self) -> Result<Bisection> {
        let t1 = Instant::now();
        while self.step()? {}
        log::info!(
            "{}: {} groups after {} splits in {:?}",
            self.oracle.name(),
            self.groups.len(),
            self.log.len(),
            t1.elapsed()
        );
        Ok(self.finish())
    }

    /// Groups and log produced so far, whether or not work remains.
    pub fn finish(self) -> Bisection {
        Bisection {
            groups: self.groups,
            log: self.log,
        }
    }
}

/// Splits `graph` until every group has at most `config.threshold` nodes.
pub fn bisect<O: CutOracle + ?Sized>(
    graph: &WeightedGraph,
    oracle: &mut O,
    config: BisectionConfig,
) -> Result<Bisection> {
    RecursiveBisector::new(graph, oracle, config)?.run()
}
