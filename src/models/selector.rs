//! Fitness-proportionate (roulette-wheel) selection.
//!
//! The merged pool of parents and offspring shrinks back to the population
//! size by sampling with replacement: each pool member is chosen with
//! probability proportional to its share of the fitness total. The wheel is
//! an explicit cumulative distribution starting at 0; each draw takes the
//! first half-open interval containing it, so ties break toward the lowest
//! index.
//!
//! Proportional shares are only meaningful for non-negative fitness with a
//! positive total. Anything else is reported as a
//! [`DegenerateSelectionError`] instead of quietly producing an invalid
//! distribution.

use crate::models::Chromosome;
use rand::Rng;
use tracing::instrument;

/// Error returned when a pool's fitness values cannot form a selection
/// distribution.
#[derive(Debug, thiserror::Error)]
pub enum DegenerateSelectionError {
    #[error("fitness total {total} cannot be normalized into selection probabilities")]
    NonPositiveTotal { total: f64 },
    #[error("negative fitness {value} at index {index} would corrupt the selection distribution")]
    NegativeFitness { index: usize, value: f64 },
}

/// Builds the cumulative distribution over normalized scores, starting at 0.
fn build_cdf(scores: &[f64]) -> Result<Vec<f64>, DegenerateSelectionError> {
    for (index, &value) in scores.iter().enumerate() {
        if value < 0.0 {
            return Err(DegenerateSelectionError::NegativeFitness { index, value });
        }
    }

    let total: f64 = scores.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(DegenerateSelectionError::NonPositiveTotal { total });
    }

    let mut cdf = Vec::with_capacity(scores.len() + 1);
    cdf.push(0.0);
    for (k, &score) in scores.iter().enumerate() {
        cdf.push(cdf[k] + score / total);
    }

    Ok(cdf)
}

/// First interval with `cdf[k] <= r < cdf[k + 1]`. Falls back to the last
/// member when rounding in the partial sums leaves `r` past the final edge.
fn pick_index(cdf: &[f64], r: f64) -> usize {
    for k in 0..cdf.len() - 1 {
        if cdf[k] <= r && r < cdf[k + 1] {
            return k;
        }
    }

    cdf.len() - 2
}

/// Draws `count` members from the pool with replacement, each with
/// probability proportional to its score.
#[instrument(level = "debug", skip(rng, pool, scores), fields(pool_size = pool.len(), count = count))]
pub fn roulette<R: Rng>(
    rng: &mut R,
    pool: &[Chromosome],
    scores: &[f64],
    count: usize,
) -> Result<Vec<Chromosome>, DegenerateSelectionError> {
    debug_assert_eq!(pool.len(), scores.len());
    let cdf = build_cdf(scores)?;

    let mut next = Vec::with_capacity(count);
    for _ in 0..count {
        let r = rng.random::<f64>();
        next.push(pool[pick_index(&cdf, r)].clone());
    }

    Ok(next)
}
