//! Fitness evaluation.
//!
//! Scores one candidate assignment against survival, workload,
//! constraint-violation, and fairness terms. Used both to drive the search
//! and to produce the final explainable breakdown — the evaluator produces
//! the numbers, the reporting layer the projection.
//!
//! Evaluation is a pure function of (chromosome, pool, weights): no
//! mutation, no randomness. That purity is what lets the runner evaluate a
//! whole population in parallel without affecting results.

mod evaluator;
mod record;
mod weights;

pub use evaluator::evaluate;
pub use record::{ConstraintCounts, FitnessRecord, GeneContribution};
pub use weights::FitnessWeights;
