//! Domain model for ICU bed assignment.
//!
//! - [`Patient`]: clinical features (pre-scaled to [0, 1] by the ingestion
//!   layer) plus the derived fuzzy scores
//! - [`Bed`]: an ICU bed with capability and capacity attributes
//! - [`CandidatePool`]: read-only view over patients and beds with the
//!   precomputed bed×patient compatibility table shared by the scoring
//!   engine and the optimizer

mod bed;
mod patient;
mod pool;

pub use bed::Bed;
pub use patient::{Patient, PriorityBand, RuleActivation};
pub use pool::{CandidatePool, Compatibility, SpecialtyMatch};
