//! Generational loop orchestration.
//!
//! The engine owns the population, the encoding parameters and a seedable
//! random generator, and drives the four operators through the fixed
//! per-generation sequence: crossover offspring, mutation offspring, merge,
//! fitness pass, roulette selection back down to the population size.

use crate::models::{
    BitLengthOverflowError, BoundsError, Chromosome, Codec, Crossover, DegenerateSelectionError,
    Mutagen, MutationRateOutOfRange, Objective, ProbabilityOutOfRangeError, VariableBounds,
    roulette,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Error returned when engine parameters are rejected at construction.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    CrossoverProbability(#[from] ProbabilityOutOfRangeError),
    #[error(transparent)]
    MutationRate(#[from] MutationRateOutOfRange),
    #[error("population size must be positive")]
    EmptyPopulation,
    #[error("precision must be a positive finite number, got {0}")]
    InvalidPrecision(f64),
    #[error("at least one variable is required")]
    NoVariables,
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error(transparent)]
    Encoding(#[from] BitLengthOverflowError),
    #[error("genotype length {0} leaves no interior crossover point, need at least 3 bits")]
    GenotypeTooShort(usize),
}

/// Run parameters, validated eagerly when the engine is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Probability that a crossover trial produces children, in `[0, 1]`.
    pub crossover_probability: f64,
    /// Per-bit mutation probability, in `[0, 1]`.
    pub mutation_probability: f64,
    /// Number of chromosomes carried between generations.
    pub population_size: usize,
    /// Number of generational steps after the initial population.
    pub max_generation: u32,
    /// One `(min, max)` pair per decision variable, in genotype order.
    pub variables: Vec<(f64, f64)>,
    /// Smallest decoded difference each variable must resolve.
    pub precision: f64,
}

/// Best fitness ever observed and the decoded variable values behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSolution {
    pub value: f64,
    pub variables: Vec<f64>,
}

/// Read-only results view handed to the caller once a run completes.
#[derive(Debug, Clone, Copy)]
pub struct RunReport<'a> {
    pub best_value: f64,
    pub best_variables: &'a [f64],
    /// Best raw fitness of each generation's evaluated pool.
    pub local_best_history: &'a [f64],
    /// Best fitness observed up to and including each generation;
    /// non-decreasing by construction.
    pub global_best_history: &'a [f64],
}

pub struct GeneticEngine<O> {
    crossover: Crossover,
    mutagen: Mutagen,
    codec: Codec,
    objective: O,
    population_size: usize,
    max_generation: u32,
    generation: u32,
    rng: StdRng,
    population: Vec<Chromosome>,
    best: Option<BestSolution>,
    local_best: Vec<f64>,
    global_best: Vec<f64>,
}

impl<O: Objective> GeneticEngine<O> {
    /// Builds an engine seeded from the operating system.
    pub fn new(config: EngineConfig, objective: O) -> Result<Self, ConfigurationError> {
        Self::with_rng(config, objective, StdRng::from_os_rng())
    }

    /// Builds an engine with a fixed seed. Runs are reproducible: the
    /// engine's generator is the only source of randomness.
    pub fn seeded(config: EngineConfig, objective: O, seed: u64) -> Result<Self, ConfigurationError> {
        Self::with_rng(config, objective, StdRng::seed_from_u64(seed))
    }

    #[instrument(level = "debug", skip(config, objective, rng), fields(population_size = config.population_size, max_generation = config.max_generation))]
    fn with_rng(config: EngineConfig, objective: O, rng: StdRng) -> Result<Self, ConfigurationError> {
        let crossover = Crossover::new(config.crossover_probability)?;
        let mutagen = Mutagen::new(config.mutation_probability)?;

        if config.population_size == 0 {
            return Err(ConfigurationError::EmptyPopulation);
        }
        if config.precision <= 0.0 || !config.precision.is_finite() {
            return Err(ConfigurationError::InvalidPrecision(config.precision));
        }
        if config.variables.is_empty() {
            return Err(ConfigurationError::NoVariables);
        }

        let bounds = config
            .variables
            .iter()
            .map(|&(min, max)| VariableBounds::new(min, max))
            .collect::<Result<Vec<_>, _>>()?;
        let codec = Codec::new(&bounds, config.precision)?;

        if codec.genotype_length() < 3 {
            return Err(ConfigurationError::GenotypeTooShort(codec.genotype_length()));
        }

        Ok(Self {
            crossover,
            mutagen,
            codec,
            objective,
            population_size: config.population_size,
            max_generation: config.max_generation,
            generation: 0,
            rng,
            population: Vec::new(),
            best: None,
            local_best: Vec::new(),
            global_best: Vec::new(),
        })
    }

    /// Executes the full generational loop.
    ///
    /// Random draws follow a fixed source order: initialization samples each
    /// individual's variables, then every generation draws for the crossover
    /// trials, then the mutation sweep, then the selection spins. Two seeded
    /// engines with the same configuration therefore produce identical runs.
    ///
    /// Any previous run state is discarded; afterwards both histories hold
    /// `max_generation + 1` entries and [`GeneticEngine::report`] exposes
    /// the results.
    #[instrument(level = "debug", skip(self), fields(population_size = self.population_size, max_generation = self.max_generation))]
    pub fn run(&mut self) -> Result<(), DegenerateSelectionError> {
        self.generation = 0;
        self.best = None;
        self.local_best.clear();
        self.global_best.clear();

        let mut population = self.initial_population();
        self.fitness_pass(&population);

        while self.generation < self.max_generation {
            let crossed = self.crossover.offspring(&mut self.rng, &population);
            let mutated = self.mutagen.offspring(&mut self.rng, &population);
            population.extend(crossed);
            population.extend(mutated);

            let scores = self.fitness_pass(&population);
            population = roulette(&mut self.rng, &population, &scores, self.population_size)?;
            self.generation += 1;
        }

        self.population = population;
        Ok(())
    }

    /// Results of the latest run, or `None` before any fitness pass.
    pub fn report(&self) -> Option<RunReport<'_>> {
        self.best.as_ref().map(|best| RunReport {
            best_value: best.value,
            best_variables: &best.variables,
            local_best_history: &self.local_best,
            global_best_history: &self.global_best,
        })
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    fn initial_population(&mut self) -> Vec<Chromosome> {
        let mut population = Vec::with_capacity(self.population_size);
        for _ in 0..self.population_size {
            let values = self.codec.sample(&mut self.rng);
            population.push(self.codec.encode(&values));
        }

        population
    }

    /// Scores every chromosome in the pool and performs the once-per-pool
    /// bookkeeping, in order: local best of this pool, conditional update of
    /// the all-time best on strictly greater fitness, one append to each
    /// history.
    fn fitness_pass(&mut self, pool: &[Chromosome]) -> Vec<f64> {
        let mut scores = Vec::with_capacity(pool.len());
        let mut local_best = f64::MIN;
        let mut local_variables = Vec::new();

        for chromosome in pool {
            let phenotype = self.codec.decode(chromosome);
            let score = self.objective.evaluate(&phenotype.values);
            if score > local_best {
                local_best = score;
                local_variables = phenotype.values;
            }
            scores.push(score);
        }

        self.local_best.push(local_best);

        let improved = match &self.best {
            Some(best) => local_best > best.value,
            None => true,
        };
        if improved {
            self.best = Some(BestSolution {
                value: local_best,
                variables: local_variables,
            });
        }
        if let Some(best) = &self.best {
            self.global_best.push(best.value);
        }

        debug!(
            generation = self.generation,
            local_best,
            pool_size = pool.len(),
            "fitness pass complete"
        );

        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrigSurface;

    fn config() -> EngineConfig {
        EngineConfig {
            crossover_probability: 0.25,
            mutation_probability: 0.01,
            population_size: 10,
            max_generation: 20,
            variables: vec![TrigSurface::X1_BOUNDS, TrigSurface::X2_BOUNDS],
            precision: TrigSurface::PRECISION,
        }
    }

    fn sum_objective(variables: &[f64]) -> f64 {
        variables.iter().sum()
    }

    #[test]
    fn it_rejects_invalid_probabilities() {
        let mut bad = config();
        bad.crossover_probability = 1.2;
        assert!(matches!(
            GeneticEngine::seeded(bad, TrigSurface, 0),
            Err(ConfigurationError::CrossoverProbability(_))
        ));

        let mut bad = config();
        bad.mutation_probability = -0.5;
        assert!(matches!(
            GeneticEngine::seeded(bad, TrigSurface, 0),
            Err(ConfigurationError::MutationRate(_))
        ));
    }

    #[test]
    fn it_rejects_degenerate_sizes_and_precision() {
        let mut bad = config();
        bad.population_size = 0;
        assert!(matches!(
            GeneticEngine::seeded(bad, TrigSurface, 0),
            Err(ConfigurationError::EmptyPopulation)
        ));

        let mut bad = config();
        bad.precision = 0.0;
        assert!(matches!(
            GeneticEngine::seeded(bad, TrigSurface, 0),
            Err(ConfigurationError::InvalidPrecision(_))
        ));

        let mut bad = config();
        bad.variables.clear();
        assert!(matches!(
            GeneticEngine::seeded(bad, TrigSurface, 0),
            Err(ConfigurationError::NoVariables)
        ));
    }

    #[test]
    fn it_rejects_inverted_bounds_eagerly() {
        let mut bad = config();
        bad.variables[1] = (5.8, 4.1);
        assert!(matches!(
            GeneticEngine::seeded(bad, TrigSurface, 0),
            Err(ConfigurationError::Bounds(_))
        ));
    }

    #[test]
    fn it_rejects_genotypes_without_an_interior_crossover_point() {
        // one variable with two quantization levels is a single bit
        let bad = EngineConfig {
            crossover_probability: 0.5,
            mutation_probability: 0.01,
            population_size: 4,
            max_generation: 1,
            variables: vec![(0.0, 1.0)],
            precision: 1.0,
        };
        assert!(matches!(
            GeneticEngine::seeded(bad, sum_objective, 0),
            Err(ConfigurationError::GenotypeTooShort(1))
        ));
    }

    #[test]
    fn it_reports_nothing_before_running() {
        let engine = GeneticEngine::seeded(config(), TrigSurface, 0).unwrap();
        assert!(engine.report().is_none());
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn it_records_one_history_entry_per_generation() {
        let mut engine = GeneticEngine::seeded(config(), TrigSurface, 42).unwrap();
        engine.run().unwrap();

        let report = engine.report().unwrap();
        assert_eq!(report.local_best_history.len(), 21);
        assert_eq!(report.global_best_history.len(), 21);
        assert_eq!(engine.generation(), 20);
        assert_eq!(engine.population().len(), 10);
    }

    #[test]
    fn it_keeps_the_global_best_history_non_decreasing() {
        for seed in [1, 7, 42, 1234] {
            let mut engine = GeneticEngine::seeded(config(), TrigSurface, seed).unwrap();
            engine.run().unwrap();

            let report = engine.report().unwrap();
            assert!(
                report
                    .global_best_history
                    .windows(2)
                    .all(|pair| pair[0] <= pair[1]),
                "seed {seed}"
            );
            assert_eq!(
                report.best_value,
                *report.global_best_history.last().unwrap()
            );
        }
    }

    #[test]
    fn it_tracks_the_best_value_above_the_local_history() {
        let mut engine = GeneticEngine::seeded(config(), TrigSurface, 7).unwrap();
        engine.run().unwrap();

        let report = engine.report().unwrap();
        for (local, global) in report
            .local_best_history
            .iter()
            .zip(report.global_best_history)
        {
            assert!(local <= global);
        }
        assert_eq!(report.best_variables.len(), 2);
    }

    #[test]
    fn it_surfaces_degenerate_selection_from_run() {
        let mut negative = config();
        negative.max_generation = 1;
        let mut engine =
            GeneticEngine::seeded(negative, |_: &[f64]| -1.0, 0).unwrap();

        assert!(matches!(
            engine.run(),
            Err(DegenerateSelectionError::NegativeFitness { .. })
        ));
    }

    #[test]
    fn it_completes_without_stepping_when_the_budget_is_zero() {
        let mut zero = config();
        zero.max_generation = 0;
        let mut engine = GeneticEngine::seeded(zero, TrigSurface, 5).unwrap();
        engine.run().unwrap();

        let report = engine.report().unwrap();
        assert_eq!(report.local_best_history.len(), 1);
        assert_eq!(report.global_best_history.len(), 1);
    }

    #[test]
    fn it_reproduces_runs_under_the_same_seed() {
        let mut first = GeneticEngine::seeded(config(), TrigSurface, 99).unwrap();
        let mut second = GeneticEngine::seeded(config(), TrigSurface, 99).unwrap();
        first.run().unwrap();
        second.run().unwrap();

        assert_eq!(
            first.report().unwrap().best_value,
            second.report().unwrap().best_value
        );
        assert_eq!(first.population(), second.population());
        assert_eq!(
            first.report().unwrap().global_best_history,
            second.report().unwrap().global_best_history
        );
    }
}
