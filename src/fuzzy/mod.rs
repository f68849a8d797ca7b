//! Fuzzy priority engine.
//!
//! Converts noisy clinical signals into a defensible priority and survival
//! estimate. Three linguistic variables — severity, stability, certainty —
//! are each partitioned into {low, medium, high}; a declarative rule base is
//! evaluated with standard Mamdani composition (min for conjunction, max for
//! per-band aggregation) and defuzzified via the weighted centroid of the
//! aggregated band activations.
//!
//! The engine is a pure function of patient features: no randomness, no
//! dependency on the optimizer. The rule base and every breakpoint live in
//! [`FuzzyConfig`] as data, so rule sets are swappable without code changes.
//!
//! # Key Types
//!
//! - [`MembershipSet`] / [`LinguisticPartition`]: trapezoid/triangle sets
//! - [`FuzzyRule`] / [`FuzzyConfig`]: the declarative rule base
//! - [`FuzzyEngine`]: inference + defuzzification + survival blend
//!
//! # References
//!
//! - Mamdani & Assilian (1975), *An Experiment in Linguistic Synthesis with
//!   a Fuzzy Logic Controller*
//! - Ross (2010), *Fuzzy Logic with Engineering Applications*

mod config;
mod engine;
mod membership;

pub use config::{BandCentroids, FuzzyConfig, FuzzyRule, Level, Variable};
pub use engine::{FuzzyEngine, FuzzyScores};
pub use membership::{LinguisticPartition, MembershipSet};
