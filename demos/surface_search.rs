use anyhow::Result;
use binary_ga::models::TrigSurface;
use binary_ga::{EngineConfig, GeneticEngine};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = EngineConfig {
        crossover_probability: 0.25,
        mutation_probability: 0.01,
        population_size: 10,
        max_generation: 1000,
        variables: vec![TrigSurface::X1_BOUNDS, TrigSurface::X2_BOUNDS],
        precision: TrigSurface::PRECISION,
    };

    let mut engine = GeneticEngine::new(config, TrigSurface)?;
    engine.run()?;

    let report = engine
        .report()
        .expect("run performs at least one fitness pass");
    println!(
        "z = {}, x1 = {}, x2 = {}",
        report.best_value, report.best_variables[0], report.best_variables[1]
    );
    for (generation, (global, local)) in report
        .global_best_history
        .iter()
        .zip(report.local_best_history.iter())
        .enumerate()
    {
        println!("{generation}\t{global}\t{local}");
    }

    Ok(())
}
