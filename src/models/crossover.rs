use crate::models::Chromosome;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Error returned when a crossover probability lies outside `[0, 1]`.
#[derive(Debug, thiserror::Error)]
#[error("crossover probability must be between 0.0 and 1.0, got {0}")]
pub struct ProbabilityOutOfRangeError(pub(crate) f64);

/// Builds both tail-exchanged children of two parents at the given cut point.
fn exchange_tails(lhs: &Chromosome, rhs: &Chromosome, point: usize) -> (Chromosome, Chromosome) {
    let mut first = Vec::with_capacity(lhs.len());
    first.extend_from_slice(&lhs.bits()[..point]);
    first.extend_from_slice(&rhs.bits()[point..]);

    let mut second = Vec::with_capacity(rhs.len());
    second.extend_from_slice(&rhs.bits()[..point]);
    second.extend_from_slice(&lhs.bits()[point..]);

    (Chromosome::from_bits(first), Chromosome::from_bits(second))
}

/// Draws two distinct parent indices, resampling both until they differ.
fn distinct_indices<R: Rng>(rng: &mut R, length: usize) -> (usize, usize) {
    let mut i = rng.random_range(0..length);
    let mut j = rng.random_range(0..length);
    while i == j {
        i = rng.random_range(0..length);
        j = rng.random_range(0..length);
    }

    (i, j)
}

/// Single-point crossover with a fixed trial budget.
///
/// Each generation runs `floor(population / 2)` independent trials. A trial
/// fires when a uniform draw lands at or below the configured probability;
/// it then picks two distinct parents and a cut point in `[1, L - 2]`, so
/// both children carry genetic material from both parents. The offspring
/// pool therefore varies between zero and `population` chromosomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Crossover {
    probability: f64,
}

impl Crossover {
    pub fn new(probability: f64) -> Result<Self, ProbabilityOutOfRangeError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ProbabilityOutOfRangeError(probability));
        }

        Ok(Self { probability })
    }

    #[instrument(level = "debug", skip(self, rng, population), fields(probability = self.probability, population_size = population.len()))]
    pub fn offspring<R: Rng>(&self, rng: &mut R, population: &[Chromosome]) -> Vec<Chromosome> {
        let mut offspring = Vec::new();
        if population.is_empty() {
            return offspring;
        }
        let length = population[0].len();

        for _ in 0..population.len() / 2 {
            if rng.random::<f64>() > self.probability {
                continue;
            }

            let (i, j) = distinct_indices(rng, population.len());
            let point = rng.random_range(1..length - 1);
            let (first, second) = exchange_tails(&population[i], &population[j], point);
            offspring.push(first);
            offspring.push(second);
        }

        offspring
    }
}
