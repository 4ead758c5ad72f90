//! Binary encoding of bounded continuous variables.
//!
//! Each variable owns a contiguous gene segment whose bit length is the
//! smallest able to distinguish `(max - min) / precision + 1` quantization
//! levels. A real value maps to a segment by linear rescaling into
//! `[0, 2^L - 1]` and rendering the integer MSB-first; decoding reverses the
//! rescale. Segments are concatenated in variable order to form the genotype.

use crate::models::Chromosome;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum BoundsError {
    #[error("lower bound must be smaller than upper bound, got min={min}, max={max}")]
    Inverted { min: f64, max: f64 },
    #[error("bounds must be finite, got min={min}, max={max}")]
    NonFinite { min: f64, max: f64 },
}

/// The closed domain `[min, max]` of one decision variable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct VariableBounds {
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl VariableBounds {
    #[instrument(level = "debug")]
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(BoundsError::NonFinite { min, max });
        }
        if min >= max {
            return Err(BoundsError::Inverted { min, max });
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Smallest bit count whose encoding distinguishes
    /// `span / precision + 1` quantization levels.
    pub fn bit_length(&self, precision: f64) -> u32 {
        let levels = self.span() / precision + 1.0;
        levels.log2().ceil() as u32
    }
}

/// Error returned when a variable needs more bits than the codec supports.
#[derive(Debug, thiserror::Error)]
#[error("variable {index} needs {required} bits at precision {precision}, the codec supports at most {MAX_SEGMENT_BITS}")]
pub struct BitLengthOverflowError {
    pub(crate) index: usize,
    pub(crate) required: u32,
    pub(crate) precision: f64,
}

/// Scaled segment integers must fit in a `u64`.
const MAX_SEGMENT_BITS: u32 = 63;

#[derive(Debug, Clone)]
struct Segment {
    bounds: VariableBounds,
    bits: u32,
}

impl Segment {
    /// Number of quantization steps, `2^L - 1`.
    fn steps(&self) -> u64 {
        (1u64 << self.bits) - 1
    }

    fn scale(&self, value: f64) -> u64 {
        let clamped = value.clamp(self.bounds.min, self.bounds.max);
        let scaled = (clamped - self.bounds.min) * self.steps() as f64 / self.bounds.span();

        // A value sitting exactly on a quantization level must map back to
        // that level, also when rescaling leaves it a few ulps below.
        let nearest = scaled.round();
        if (scaled - nearest).abs() < 1e-9 {
            nearest as u64
        } else {
            scaled.floor() as u64
        }
    }

    fn unscale(&self, raw: u64) -> f64 {
        self.bounds.min + raw as f64 * self.bounds.span() / self.steps() as f64
    }
}

/// Decoded variable values for one chromosome, in variable order.
#[derive(Debug, Clone, PartialEq)]
pub struct Phenotype {
    pub values: Vec<f64>,
}

/// Mapping between real-valued variables and the fixed-length genotype,
/// computed once at engine construction.
#[derive(Debug, Clone)]
pub struct Codec {
    segments: Vec<Segment>,
    total_bits: usize,
}

impl Codec {
    #[instrument(level = "debug", skip(variables), fields(variable_count = variables.len(), precision = precision))]
    pub fn new(variables: &[VariableBounds], precision: f64) -> Result<Self, BitLengthOverflowError> {
        let mut segments = Vec::with_capacity(variables.len());
        let mut total_bits = 0;

        for (index, &bounds) in variables.iter().enumerate() {
            let bits = bounds.bit_length(precision);
            if bits > MAX_SEGMENT_BITS {
                return Err(BitLengthOverflowError {
                    index,
                    required: bits,
                    precision,
                });
            }

            total_bits += bits as usize;
            segments.push(Segment { bounds, bits });
        }

        Ok(Self {
            segments,
            total_bits,
        })
    }

    /// Total genotype length, the sum of all segment bit lengths.
    pub fn genotype_length(&self) -> usize {
        self.total_bits
    }

    pub fn variable_count(&self) -> usize {
        self.segments.len()
    }

    /// Draws one value per variable, uniformly within its domain.
    pub fn sample<R: rand::Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.segments
            .iter()
            .map(|segment| rng.random_range(segment.bounds.min..segment.bounds.max))
            .collect()
    }

    /// Encodes one value per variable into a genotype. Values outside their
    /// domain are clamped to the nearest bound before scaling.
    pub fn encode(&self, values: &[f64]) -> Chromosome {
        debug_assert_eq!(values.len(), self.segments.len());

        let mut bits = Vec::with_capacity(self.total_bits);
        for (segment, &value) in self.segments.iter().zip(values) {
            let scaled = segment.scale(value);
            for k in (0..segment.bits).rev() {
                bits.push((scaled >> k) & 1 == 1);
            }
        }

        Chromosome::from_bits(bits)
    }

    /// Decodes a genotype back into one value per variable.
    pub fn decode(&self, chromosome: &Chromosome) -> Phenotype {
        debug_assert_eq!(chromosome.len(), self.total_bits);

        let mut values = Vec::with_capacity(self.segments.len());
        let mut offset = 0;
        for segment in &self.segments {
            let width = segment.bits as usize;
            let raw = chromosome.bits()[offset..offset + width]
                .iter()
                .fold(0u64, |acc, &bit| (acc << 1) | bit as u64);

            values.push(segment.unscale(raw));
            offset += width;
        }

        Phenotype { values }
    }
}
