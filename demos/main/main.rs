use maxcut_partition::generate::random_complete_graph;
use maxcut_partition::{
    bisect, AnnealingConfig, BisectionConfig, BruteForceConfig, CutOracle, EvaluationConfig,
    Evaluator, ExactBruteForceSolver, Instance, OracleKind, PredictionAdapter, SameGroupEdges,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(1234);

    // Random course conflicts, split into exam groups of at most 6 courses.
    let departments = ["CS", "PHYS", "MATH", "CHEM", "DS", "EE"];
    let courses: Vec<String> = (0..20)
        .map(|n| format!("{} {}", departments[n % departments.len()], 10 + n))
        .collect();
    let graph = random_complete_graph(courses.len(), 1..=400, &mut rng);

    let mut oracle = OracleKind::BruteForce(BruteForceConfig::default()).build();
    let t1 = time::Instant::now();
    let result = bisect(&graph, &mut oracle, BisectionConfig { threshold: 6 })?;
    println!("time: {}ms", t1.elapsed().as_millis());

    for (i, group) in result.labelled(&courses)?.iter().enumerate() {
        println!("group {}: {}", i + 1, group.join(", "));
    }
    let objective = result.objective(&graph);
    println!(
        "conflicts: {} of {} remain inside groups",
        objective.remaining, objective.total
    );
    for (size, seconds) in result.log.as_seconds() {
        println!("split of {size} nodes took {seconds:.6}s");
    }

    // Score the annealer against the exhaustive solver on small random graphs.
    let mut exact = ExactBruteForceSolver::new(BruteForceConfig::default());
    let mut instances = Vec::new();
    for _ in 0..50 {
        let graph = random_complete_graph(10, 1..=10, &mut rng);
        let cut = exact.solve(&graph)?;
        let truth = SameGroupEdges.predict(&graph, &cut);
        instances.push(Instance { graph, truth });
    }
    let mut annealer = OracleKind::Annealing(AnnealingConfig::default()).build();
    let mut evaluator = Evaluator::new(EvaluationConfig::default());
    let report = evaluator.run(
        instances,
        annealer.as_mut(),
        Some(&mut exact as &mut dyn CutOracle),
        &SameGroupEdges,
    )?;
    println!("{report}");
    Ok(())
}
