//! Genetic optimizer for bed assignment.
//!
//! Owns the population of candidate assignments and runs the generational
//! loop: selection, crossover, repair, mutation, elitism, early stop. The
//! search maximizes the weighted fitness total produced by
//! [`crate::fitness::evaluate`]; infeasibility inside the search space is
//! expressed as penalty, never as an error.
//!
//! # Key Types
//!
//! - [`Chromosome`]: one candidate complete bed-to-patient assignment
//! - [`GaConfig`]: algorithm parameters (population, rates, termination)
//! - [`Selection`] / [`Crossover`]: pluggable operators
//! - [`GaRunner`]: executes the evolutionary loop
//! - [`OptimizeOutcome`]: best solution, breakdown, per-generation history
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*

mod chromosome;
mod config;
pub mod operators;
mod runner;
mod selection;

pub use chromosome::Chromosome;
pub use config::GaConfig;
pub use operators::Crossover;
pub use runner::{GaRunner, GenerationStats, OptimizeOutcome};
pub use selection::Selection;
