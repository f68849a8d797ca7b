//! Error taxonomy for the allocator.
//!
//! Only malformed input is an error. Everything that goes wrong *inside* the
//! search — constraint violations, nurse overload, duplicate genes produced
//! by crossover — is expressed as fitness penalty or resolved by repair, and
//! reaches the caller as data ([`crate::report::ConflictEntry`], penalty
//! breakdowns), never as an `Err`.

use thiserror::Error;

/// Errors surfaced before any search begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TriageError {
    /// A patient feature lies outside its normalized [0, 1] domain.
    ///
    /// Inputs are pre-scaled by the ingestion collaborator; an out-of-range
    /// value is a contract violation by the caller and is not recovered.
    #[error("feature '{field}' of patient '{patient}' is {value}, outside [0, 1]")]
    InvalidInputRange {
        /// Patient whose record violated the contract.
        patient: String,
        /// Offending feature name.
        field: &'static str,
        /// The out-of-range value.
        value: f64,
    },

    /// The instance cannot be optimized at all: no beds or no patients.
    #[error("infeasible input: {0}")]
    InfeasibleInput(&'static str),
}
