//! Hybrid fuzzy + genetic-algorithm optimizer for ICU bed assignment.
//!
//! Maps a fixed set of scarce, heterogeneous ICU beds to a larger set of
//! patients so as to maximize expected survival benefit while respecting
//! capability constraints (specialty, ventilator/dialysis readiness),
//! balancing nurse workload, and incorporating uncertainty in patient data.
//!
//! - **Fuzzy priority engine** ([`fuzzy`]): Mamdani inference over
//!   severity/stability/certainty turns noisy clinical signals into
//!   priority and survival scores with a traceable rule activation log.
//! - **Candidate pool** ([`model`]): patients, beds, and precomputed
//!   compatibility shared read-only across the run.
//! - **Fitness evaluator** ([`fitness`]): survival, workload, constraint,
//!   and fairness terms with a per-gene explainable breakdown.
//! - **Genetic optimizer** ([`ga`]): population search under a hard
//!   uniqueness invariant — selection, crossover, repair, mutation,
//!   elitism, early stop, cooperative cancellation.
//! - **Hybrid feedback** ([`hybrid`]): uncertainty decay for waiting
//!   patients and bounded local search over elites between generations.
//! - **Report projection** ([`report`]): assignment table with
//!   machine-readable reason codes, conflict log, per-generation history.
//!
//! # Example
//!
//! ```
//! use icu_triage::model::{Bed, Patient};
//! use icu_triage::{allocate, TriageConfig};
//!
//! let patients = vec![
//!     Patient::new("P1", "cardiac")
//!         .with_severity(0.9)
//!         .with_stability(0.15)
//!         .with_survival_proxy(0.8)
//!         .with_ventilator(true, 0.9),
//!     Patient::new("P2", "cardiac")
//!         .with_severity(0.4)
//!         .with_stability(0.7)
//!         .with_survival_proxy(0.9),
//! ];
//! let beds = vec![
//!     Bed::new("B1", "cardiac").with_ventilator(true).with_nurse_capacity(4.0),
//!     Bed::new("B2", "cardiac").with_nurse_capacity(4.0),
//! ];
//!
//! let config = TriageConfig::default().with_seed(42);
//! let outcome = allocate(patients, beds, &config)?;
//! assert_eq!(outcome.assignments.len(), 2);
//! # Ok::<(), icu_triage::TriageError>(())
//! ```
//!
//! Raw ingestion/normalization, dataset synthesis, CLI parsing, charts,
//! and narrative report text live in external collaborators; this crate
//! consumes pre-scaled records and returns structured data.

pub mod error;
pub mod fitness;
pub mod fuzzy;
pub mod ga;
pub mod hybrid;
pub mod model;
pub mod report;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use error::TriageError;
pub use report::AllocationOutcome;

use fitness::FitnessWeights;
use fuzzy::{FuzzyConfig, FuzzyEngine};
use ga::{GaConfig, GaRunner};
use hybrid::HybridConfig;
use model::{Bed, CandidatePool, Patient};

/// The full configuration surface of one optimization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Fuzzy partitions, rule base, thresholds.
    pub fuzzy: FuzzyConfig,
    /// Objective weights and penalty calibration.
    pub weights: FitnessWeights,
    /// Evolutionary loop parameters.
    pub ga: GaConfig,
    /// Feedback loop parameters.
    pub hybrid: HybridConfig,
}

impl TriageConfig {
    /// Replaces the fuzzy configuration.
    pub fn with_fuzzy(mut self, fuzzy: FuzzyConfig) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    /// Replaces the fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replaces the GA parameters.
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// Replaces the feedback parameters.
    pub fn with_hybrid(mut self, hybrid: HybridConfig) -> Self {
        self.hybrid = hybrid;
        self
    }

    /// Convenience: sets the random seed on the GA parameters.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ga = self.ga.with_seed(seed);
        self
    }

    /// Validates every section.
    ///
    /// Returns `Err` with a description naming the offending section.
    pub fn validate(&self) -> Result<(), String> {
        self.fuzzy.validate().map_err(|e| format!("fuzzy: {e}"))?;
        self.weights.validate().map_err(|e| format!("weights: {e}"))?;
        self.ga.validate().map_err(|e| format!("ga: {e}"))?;
        Ok(())
    }
}

/// Scores all patients, runs the optimizer, and projects the outputs.
///
/// # Errors
///
/// - [`TriageError::InvalidInputRange`] if any patient feature lies
///   outside [0, 1] — surfaced before any search begins.
/// - [`TriageError::InfeasibleInput`] if the bed or patient list is empty.
///
/// Everything else — constraint violations, overload, unassignable
/// patients — is data in the returned [`AllocationOutcome`], never an
/// error.
pub fn allocate(
    patients: Vec<Patient>,
    beds: Vec<Bed>,
    config: &TriageConfig,
) -> Result<AllocationOutcome, TriageError> {
    allocate_with_cancel(patients, beds, config, None)
}

/// [`allocate`] with a cooperative cancellation token, checked at
/// generation boundaries; a cancelled run returns the best-so-far result.
pub fn allocate_with_cancel(
    mut patients: Vec<Patient>,
    beds: Vec<Bed>,
    config: &TriageConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<AllocationOutcome, TriageError> {
    if beds.is_empty() {
        return Err(TriageError::InfeasibleInput("bed list is empty"));
    }
    if patients.is_empty() {
        return Err(TriageError::InfeasibleInput("patient list is empty"));
    }

    let engine = FuzzyEngine::new(config.fuzzy.clone());
    engine.rescore_all(&mut patients)?;

    let mut pool = CandidatePool::new(patients, beds);
    let outcome = GaRunner::run_with_cancel(&mut pool, config, cancel)?;
    Ok(report::build_outcome(outcome, &pool, &config.weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriorityBand;
    use crate::report::{ConflictKind, ReasonCode};

    fn small_config(seed: u64) -> TriageConfig {
        TriageConfig::default()
            .with_ga(
                GaConfig::default()
                    .with_population_size(24)
                    .with_max_generations(40)
                    .with_parallel(false),
            )
            .with_seed(seed)
    }

    fn scenario_patients() -> Vec<Patient> {
        vec![
            Patient::new("P1", "general")
                .with_severity(0.9)
                .with_stability(0.1)
                .with_uncertainty(0.1)
                .with_survival_proxy(0.8)
                .with_ventilator(true, 0.9),
            Patient::new("P2", "general")
                .with_severity(0.5)
                .with_stability(0.5)
                .with_uncertainty(0.1)
                .with_survival_proxy(0.7),
            Patient::new("P3", "general")
                .with_severity(0.1)
                .with_stability(0.9)
                .with_uncertainty(0.1)
                .with_survival_proxy(0.3),
        ]
    }

    fn scenario_beds() -> Vec<Bed> {
        vec![
            Bed::new("B1", "general")
                .with_ventilator(true)
                .with_nurse_capacity(4.0),
            Bed::new("B2", "general").with_nurse_capacity(4.0),
        ]
    }

    #[test]
    fn test_end_to_end_ventilator_scenario() {
        let outcome = allocate(scenario_patients(), scenario_beds(), &small_config(42)).unwrap();

        let row_b1 = &outcome.assignments[0];
        let row_b2 = &outcome.assignments[1];
        assert_eq!(row_b1.patient.as_ref().unwrap().id, "P1");
        assert!(row_b1.reason_codes.contains(&ReasonCode::VentilatorProvided));
        assert_eq!(row_b2.patient.as_ref().unwrap().id, "P2");

        // P3 waits, logged with its reason.
        assert!(outcome.report.conflicts.iter().any(|c| {
            c.kind == ConflictKind::NoBedAvailable && c.patient_id.as_deref() == Some("P3")
        }));

        // Fuzzy bands derived, not hand-set.
        assert_eq!(row_b1.patient.as_ref().unwrap().band, PriorityBand::Critical);
        assert!(row_b1.patient.as_ref().unwrap().priority_score > 0.9);
    }

    #[test]
    fn test_out_of_range_feature_fails_before_search() {
        let mut patients = scenario_patients();
        patients[1].severity = 1.5;
        let err = allocate(patients, scenario_beds(), &small_config(1)).unwrap_err();
        assert!(matches!(
            err,
            TriageError::InvalidInputRange { field: "severity", .. }
        ));
    }

    #[test]
    fn test_empty_inputs_are_infeasible() {
        let err = allocate(Vec::new(), scenario_beds(), &small_config(1)).unwrap_err();
        assert!(matches!(err, TriageError::InfeasibleInput(_)));

        let err = allocate(scenario_patients(), Vec::new(), &small_config(1)).unwrap_err();
        assert!(matches!(err, TriageError::InfeasibleInput(_)));
    }

    #[test]
    fn test_more_beds_than_patients() {
        let patients = vec![Patient::new("P1", "general")
            .with_severity(0.6)
            .with_stability(0.4)
            .with_survival_proxy(0.8)];
        let beds = vec![
            Bed::new("B1", "general").with_nurse_capacity(4.0),
            Bed::new("B2", "general").with_nurse_capacity(4.0),
            Bed::new("B3", "general").with_nurse_capacity(4.0),
        ];
        let outcome = allocate(patients, beds, &small_config(9)).unwrap();

        let occupied = outcome.assignments.iter().filter(|r| r.patient.is_some()).count();
        assert_eq!(occupied, 1);
        let vacant_codes: Vec<_> = outcome
            .assignments
            .iter()
            .filter(|r| r.patient.is_none())
            .flat_map(|r| r.reason_codes.clone())
            .collect();
        assert!(vacant_codes.iter().all(|c| *c == ReasonCode::NoPatientWaiting));
    }

    #[test]
    fn test_outcome_serializes_for_the_report_collaborator() {
        let outcome = allocate(scenario_patients(), scenario_beds(), &small_config(42)).unwrap();
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"no_bed_available\""));
        assert!(json.contains("\"ventilator_provided\""));

        let back: AllocationOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn test_allocate_is_deterministic() {
        let a = allocate(scenario_patients(), scenario_beds(), &small_config(7)).unwrap();
        let b = allocate(scenario_patients(), scenario_beds(), &small_config(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_validation_names_section() {
        let config = TriageConfig::default().with_ga(GaConfig {
            population_size: 1,
            ..GaConfig::default()
        });
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("ga:"), "got: {err}");
    }
}
