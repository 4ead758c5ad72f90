mod chromosome;
mod codec;
mod crossover;
mod mutagen;
mod objective;
mod selector;

pub use chromosome::{Chromosome, FormatError, IndexError};
pub use codec::{BitLengthOverflowError, BoundsError, Codec, Phenotype, VariableBounds};
pub use crossover::{Crossover, ProbabilityOutOfRangeError};
pub use mutagen::{Mutagen, MutationRateOutOfRange};
pub use objective::{Objective, TrigSurface};
pub use selector::{DegenerateSelectionError, roulette};
