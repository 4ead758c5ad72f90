pub mod engine;
pub mod models;

pub use engine::{BestSolution, ConfigurationError, EngineConfig, GeneticEngine, RunReport};
