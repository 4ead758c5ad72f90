use std::fmt;
use std::str::FromStr;

/// Error returned when a chromosome string contains a character other than '0' or '1'.
#[derive(Debug, thiserror::Error)]
#[error("chromosome strings may only contain '0' and '1', got {character:?} at index {index}")]
pub struct FormatError {
    pub(crate) character: char,
    pub(crate) index: usize,
}

/// Error returned when a sub-chromosome range is inverted or out of bounds.
#[derive(Debug, thiserror::Error)]
#[error("sub-chromosome range [{start}, {end}] is invalid for length {length}")]
pub struct IndexError {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) length: usize,
}

/// A fixed-length bit sequence encoding one candidate solution.
///
/// The length is fixed at construction and the bits are never mutated in
/// place; every genetic operator builds new chromosomes instead. Equality
/// and hashing are value-based on the bit sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chromosome {
    bits: Vec<bool>,
}

impl Chromosome {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Parses a '0'/'1' string, most significant bit first.
    pub fn from_binary_str(s: &str) -> Result<Self, FormatError> {
        let mut bits = Vec::with_capacity(s.len());
        for (index, character) in s.chars().enumerate() {
            match character {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => return Err(FormatError { character, index }),
            }
        }
        Ok(Self { bits })
    }

    /// Copies out the inclusive bit range `[start, end]` as a new chromosome.
    pub fn sub_chromosome(&self, start: usize, end: usize) -> Result<Self, IndexError> {
        if start > end || end >= self.bits.len() {
            return Err(IndexError {
                start,
                end,
                length: self.bits.len(),
            });
        }

        Ok(Self {
            bits: self.bits[start..=end].to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Chromosome {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_binary_str(s)
    }
}
