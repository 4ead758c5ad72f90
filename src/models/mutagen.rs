use crate::models::Chromosome;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Error returned when a mutation rate lies outside `[0, 1]`.
#[derive(Debug, thiserror::Error)]
#[error("mutation rate must be between 0.0 and 1.0, got {0}")]
pub struct MutationRateOutOfRange(pub(crate) f64);

/// Per-bit mutation applied to every member of a population.
///
/// Every input chromosome yields exactly one offspring: a copy where each
/// bit is flipped independently when a uniform draw lands at or below the
/// rate. Inputs are never altered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Mutagen {
    rate: f64,
}

impl Mutagen {
    pub fn new(rate: f64) -> Result<Self, MutationRateOutOfRange> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(MutationRateOutOfRange(rate));
        }

        Ok(Self { rate })
    }

    #[instrument(level = "debug", skip(self, rng, population), fields(rate = self.rate, population_size = population.len()))]
    pub fn offspring<R: Rng>(&self, rng: &mut R, population: &[Chromosome]) -> Vec<Chromosome> {
        let mut offspring = Vec::with_capacity(population.len());

        for chromosome in population {
            let mut bits = chromosome.bits().to_vec();
            for bit in bits.iter_mut() {
                if rng.random::<f64>() <= self.rate {
                    *bit = !*bit;
                }
            }
            offspring.push(Chromosome::from_bits(bits));
        }

        offspring
    }
}
