use binary_ga::models::TrigSurface;
use binary_ga::{EngineConfig, GeneticEngine};

#[test]
fn it_searches_the_bundled_surface_end_to_end() -> anyhow::Result<()> {
    let config = EngineConfig {
        crossover_probability: 0.25,
        mutation_probability: 0.01,
        population_size: 10,
        max_generation: 200,
        variables: vec![TrigSurface::X1_BOUNDS, TrigSurface::X2_BOUNDS],
        precision: TrigSurface::PRECISION,
    };

    let mut engine = GeneticEngine::seeded(config, TrigSurface, 7)?;
    engine.run()?;

    let report = engine.report().expect("run performs at least one fitness pass");
    assert_eq!(report.local_best_history.len(), 201);
    assert_eq!(report.global_best_history.len(), 201);
    assert!(
        report
            .global_best_history
            .windows(2)
            .all(|pair| pair[0] <= pair[1])
    );

    // thousands of evaluations land well above the surface's 21.5 offset
    assert!(report.best_value > 21.5);
    let (x1, x2) = (report.best_variables[0], report.best_variables[1]);
    assert!((TrigSurface::X1_BOUNDS.0..=TrigSurface::X1_BOUNDS.1).contains(&x1));
    assert!((TrigSurface::X2_BOUNDS.0..=TrigSurface::X2_BOUNDS.1).contains(&x2));

    Ok(())
}

#[test]
fn it_tracks_a_simple_separable_objective() -> anyhow::Result<()> {
    let config = EngineConfig {
        crossover_probability: 1.0,
        mutation_probability: 0.0,
        population_size: 4,
        max_generation: 5,
        variables: vec![(0.0, 1.0), (0.0, 1.0)],
        precision: 0.1,
    };

    let objective = |variables: &[f64]| variables[0] + variables[1];
    let mut engine = GeneticEngine::seeded(config, objective, 42)?;
    engine.run()?;

    let report = engine.report().expect("run performs at least one fitness pass");

    // one initial entry plus one per generational step
    assert_eq!(report.global_best_history.len(), 6);
    assert_eq!(report.local_best_history.len(), 6);
    assert!(
        report
            .global_best_history
            .windows(2)
            .all(|pair| pair[0] <= pair[1])
    );

    // x1 + x2 never exceeds 2 on the unit square
    assert!(report.best_value <= 2.0);

    Ok(())
}
