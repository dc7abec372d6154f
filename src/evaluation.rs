//! Scoring predictions against ground truth and against a reference oracle.
//!
//! The evaluator accumulates one prediction per processed instance and
//! recomputes its figures from scratch whenever they are asked for. With a
//! reference oracle (usually the exhaustive solver) it also reports how often
//! the primary oracle agrees with the reference, and how well the reference
//! itself does against the truth.

use crate::oracle::CutOracle;
use crate::prediction::PredictionAdapter;
use crate::{PartitionError, Result, WeightedGraph};
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct EvaluationConfig {
    /// No new instance is started once this much time has passed.
    pub time_budget: Duration,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(30 * 60),
        }
    }
}

/// A graph to solve together with the labels the adapter should reproduce.
#[derive(Clone, Debug)]
pub struct Instance {
    pub graph: WeightedGraph,
    pub truth: Vec<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Efficiency {
    /// Primary oracle against the truth.
    pub accuracy: f64,
    /// Primary oracle against the reference oracle.
    pub efficiency: f64,
    /// Reference oracle against the truth.
    pub max_possible_accuracy: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationReport {
    pub processed: usize,
    pub accuracy: f64,
    pub efficiency: Option<Efficiency>,
    pub elapsed: Duration,
    /// The run stopped because the time budget ran out.
    pub budget_exhausted: bool,
}

pub(crate) fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs <= 60.0 {
        format!("{secs:.3} s")
    } else {
        format!("{:.3} min", secs / 60.0)
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} instances in {}: accuracy {:.4}",
            self.processed,
            format_duration(self.elapsed),
            self.accuracy
        )?;
        if let Some(e) = self.efficiency {
            write!(
                f,
                ", efficiency {:.4}, max possible accuracy {:.4}",
                e.efficiency, e.max_possible_accuracy
            )?;
        }
        if self.budget_exhausted {
            write!(f, " (time budget exhausted)")?;
        }
        Ok(())
    }
}

fn count_matches(predictions: &[Vec<bool>], truth: &[Vec<bool>]) -> Result<(usize, usize)> {
    if predictions.len() != truth.len() {
        return Err(PartitionError::LengthMismatch {
            predicted: predictions.len(),
            truth: truth.len(),
        });
    }
    let mut correct = 0;
    let mut total = 0;
    for (p, t) in predictions.iter().zip(truth.iter()) {
        if p.len() != t.len() {
            return Err(PartitionError::LengthMismatch {
                predicted: p.len(),
                truth: t.len(),
            });
        }
        correct += p.iter().zip(t.iter()).filter(|(a, b)| a == b).count();
        total += t.len();
    }
    Ok((correct, total))
}

fn ratio(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// Share of labels that match, over all instances. `0.0` when there are no labels.
pub fn accuracy(predictions: &[Vec<bool>], truth: &[Vec<bool>]) -> Result<f64> {
    let (correct, total) = count_matches(predictions, truth)?;
    Ok(ratio(correct, total))
}

pub struct Evaluator {
    config: EvaluationConfig,
    predictions: Vec<Vec<bool>>,
    truths: Vec<Vec<bool>>,
    references: Vec<Option<Vec<bool>>>,
    started: Option<Instant>,
    budget_exhausted: bool,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            predictions: Vec::new(),
            truths: Vec::new(),
            references: Vec::new(),
            started: None,
            budget_exhausted: false,
        }
    }

    /// The clock starts with the first recorded or processed instance.
    fn clock(&mut self) -> Instant {
        *self.started.get_or_insert_with(Instant::now)
    }

    pub fn processed(&self) -> usize {
        self.predictions.len()
    }

    /// Adds one instance's labels. Nothing is stored if any length differs.
    pub fn record(
        &mut self,
        prediction: Vec<bool>,
        truth: Vec<bool>,
        reference: Option<Vec<bool>>,
    ) -> Result<()> {
        self.clock();
        if prediction.len() != truth.len() {
            return Err(PartitionError::LengthMismatch {
                predicted: prediction.len(),
                truth: truth.len(),
            });
        }
        if let Some(r) = reference.as_ref() {
            if r.len() != truth.len() {
                return Err(PartitionError::LengthMismatch {
                    predicted: r.len(),
                    truth: truth.len(),
                });
            }
        }
        self.predictions.push(prediction);
        self.truths.push(truth);
        self.references.push(reference);
        Ok(())
    }

    pub fn accuracy(&self) -> f64 {
        // Lengths were checked in `record`.
        accuracy(&self.predictions, &self.truths).unwrap_or(0.0)
    }

    /// Available when every processed instance has a reference prediction.
    pub fn efficiency(&self) -> Option<Efficiency> {
        if self.references.is_empty() {
            return None;
        }
        let references = self.references.iter().cloned().collect::<Option<Vec<_>>>()?;
        Some(Efficiency {
            accuracy: self.accuracy(),
            efficiency: accuracy(&self.predictions, &references).ok()?,
            max_possible_accuracy: accuracy(&references, &self.truths).ok()?,
        })
    }

    pub fn report(&self) -> EvaluationReport {
        EvaluationReport {
            processed: self.processed(),
            accuracy: self.accuracy(),
            efficiency: self.efficiency(),
            elapsed: self.started.map(|s| s.elapsed()).unwrap_or_default(),
            budget_exhausted: self.budget_exhausted,
        }
    }

    /// Solves each instance with `primary` (and `reference`, if given), turns
    /// the cuts into labels with `adapter` and records them.
    ///
    /// The time budget is checked before every instance; the instance in
    /// progress always completes. On error the instances recorded so far are
    /// kept and the error is returned as is.
    pub fn run<I, A>(
        &mut self,
        instances: I,
        primary: &mut dyn CutOracle,
        mut reference: Option<&mut dyn CutOracle>,
        adapter: &A,
    ) -> Result<EvaluationReport>
    where
        I: IntoIterator<Item = Instance>,
        A: PredictionAdapter + ?Sized,
    {
        let started = self.clock();
        for instance in instances {
            if started.elapsed() > self.config.time_budget {
                self.budget_exhausted = true;
                log::info!(
                    "time budget of {} exhausted after {} instances",
                    format_duration(self.config.time_budget),
                    self.processed()
                );
                break;
            }

            let cut = primary.solve(&instance.graph)?;
            cut.validate(&instance.graph, primary.name())?;
            let prediction = adapter.predict(&instance.graph, &cut);

            let reference_prediction = match reference.as_deref_mut() {
                Some(oracle) => {
                    let cut = oracle.solve(&instance.graph)?;
                    cut.validate(&instance.graph, oracle.name())?;
                    Some(adapter.predict(&instance.graph, &cut))
                }
                None => None,
            };

            self.record(prediction, instance.truth, reference_prediction)?;
            log::trace!(
                "instance {}: running accuracy {:.4}",
                self.processed(),
                self.accuracy()
            );
        }

        let report = self.report();
        log::info!("{}: {report}", primary.name());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute_force::{BruteForceConfig, ExactBruteForceSolver};
    use crate::generate::random_complete_graph;
    use crate::oracle::BlackBoxOracle;
    use crate::prediction::SameGroupEdges;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Instances whose truth is the exact solver's own edge labels.
    fn exact_instances(count: usize, seed: u64) -> Vec<Instance> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut exact = ExactBruteForceSolver::new(BruteForceConfig::default());
        (0..count)
            .map(|i| {
                let graph = random_complete_graph(4 + i % 4, 1..=10, &mut rng);
                let cut = exact.solve(&graph).unwrap();
                let truth = SameGroupEdges.predict(&graph, &cut);
                Instance { graph, truth }
            })
            .collect()
    }

    #[test]
    fn test_accuracy() {
        let predictions = vec![vec![true, false, true], vec![false]];
        let truth = vec![vec![true, true, true], vec![false]];
        assert_eq!(accuracy(&predictions, &truth).unwrap(), 0.75);
        assert_eq!(accuracy(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_accuracy_length_mismatch() {
        assert_eq!(
            accuracy(&[vec![true]], &[vec![true, false]]),
            Err(PartitionError::LengthMismatch { predicted: 1, truth: 2 })
        );
        assert_eq!(
            accuracy(&[vec![true]], &[]),
            Err(PartitionError::LengthMismatch { predicted: 1, truth: 0 })
        );
    }

    #[test]
    fn test_record_and_efficiency() {
        let mut evaluator = Evaluator::new(EvaluationConfig::default());
        assert_eq!(evaluator.efficiency(), None);

        evaluator
            .record(
                vec![true, true, false, false],
                vec![true, false, false, false],
                Some(vec![true, true, false, true]),
            )
            .unwrap();
        let efficiency = evaluator.efficiency().unwrap();
        assert_eq!(efficiency.accuracy, 0.75);
        assert_eq!(efficiency.efficiency, 0.75);
        assert_eq!(efficiency.max_possible_accuracy, 0.5);

        assert!(matches!(
            evaluator.record(vec![true], vec![true, false], None),
            Err(PartitionError::LengthMismatch { .. })
        ));
        assert_eq!(evaluator.processed(), 1);

        evaluator.record(vec![true], vec![true], None).unwrap();
        assert_eq!(evaluator.efficiency(), None);
        assert_eq!(evaluator.accuracy(), 0.8);
    }

    #[test]
    fn test_reference_equal_to_truth_bounds_efficiency() {
        init();
        let mut evaluator = Evaluator::new(EvaluationConfig::default());
        let mut flip_first = BlackBoxOracle::new("first-node", |g: &WeightedGraph| {
            Ok((vec![0], (1..g.node_count()).collect()))
        });
        let mut exact = ExactBruteForceSolver::new(BruteForceConfig::default());

        let report = evaluator
            .run(
                exact_instances(6, 4),
                &mut flip_first,
                Some(&mut exact as &mut dyn CutOracle),
                &SameGroupEdges,
            )
            .unwrap();
        let efficiency = report.efficiency.unwrap();
        assert_eq!(report.processed, 6);
        assert_eq!(efficiency.max_possible_accuracy, 1.0);
        assert_eq!(efficiency.efficiency, efficiency.accuracy);
        assert!(efficiency.efficiency <= efficiency.max_possible_accuracy);
        assert!(!report.budget_exhausted);
    }

    #[test]
    fn test_exact_primary_is_perfect() {
        let mut evaluator = Evaluator::new(EvaluationConfig::default());
        let mut exact = ExactBruteForceSolver::new(BruteForceConfig::default());
        let report = evaluator
            .run(exact_instances(5, 2), &mut exact, None, &SameGroupEdges)
            .unwrap();
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.efficiency, None);
        assert!(report.to_string().contains("accuracy 1.0000"));
    }

    #[test]
    fn test_time_budget_keeps_partial_results() {
        init();
        let mut evaluator = Evaluator::new(EvaluationConfig {
            time_budget: Duration::from_millis(10),
        });
        let mut slow = BlackBoxOracle::new("slow", |g: &WeightedGraph| {
            std::thread::sleep(Duration::from_millis(30));
            Ok((vec![0], (1..g.node_count()).collect()))
        });
        let report = evaluator
            .run(exact_instances(5, 1), &mut slow, None, &SameGroupEdges)
            .unwrap();
        assert_eq!(report.processed, 1);
        assert!(report.budget_exhausted);
        assert!(report.elapsed >= Duration::from_millis(30));
        assert!(report.to_string().ends_with("(time budget exhausted)"));
    }

    #[test]
    fn test_failed_instance_keeps_earlier_results() {
        let mut calls = 0;
        let mut flaky = BlackBoxOracle::new("flaky", |g: &WeightedGraph| {
            calls += 1;
            if calls == 2 {
                return Err(PartitionError::Cancelled);
            }
            Ok((vec![0], (1..g.node_count()).collect()))
        });
        let mut evaluator = Evaluator::new(EvaluationConfig::default());
        let err = evaluator
            .run(exact_instances(3, 6), &mut flaky, None, &SameGroupEdges)
            .unwrap_err();
        assert_eq!(err, PartitionError::Cancelled);
        assert_eq!(evaluator.processed(), 1);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.500 s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.500 min");
    }
}
