//! Output projection: assignment table, reason codes, conflict log.
//!
//! Everything here is a pure projection over the best chromosome and its
//! [`FitnessRecord`] — machine-readable codes and numbers for the report/UI
//! collaborator. Narrative text is deliberately out of scope; the core
//! produces data, not prose.

use serde::{Deserialize, Serialize};

use crate::fitness::{FitnessRecord, FitnessWeights};
use crate::ga::{Chromosome, GenerationStats, OptimizeOutcome};
use crate::model::{CandidatePool, PriorityBand, SpecialtyMatch};

/// Machine-readable explanation codes attached to assignment rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Bed is specialized in the patient's required specialty.
    SpecialtyMatch,
    /// Bed covers the specialty without being specialized in it.
    SpecialtyPartial,
    /// Bed cannot serve the patient's specialty.
    SpecialtyMismatch,
    /// Needed ventilator is available on this bed.
    VentilatorProvided,
    /// Needed ventilator is missing on this bed.
    VentilatorMissing,
    /// Needed dialysis is available on this bed.
    DialysisProvided,
    /// Needed dialysis is missing on this bed.
    DialysisMissing,
    /// Patient data uncertainty exceeds the high-risk threshold.
    HighUncertainty,
    /// Vacant: unassigned patients exist, but none is equipment-compatible.
    NoCompatiblePatient,
    /// Vacant: every patient is already assigned.
    NoPatientWaiting,
    /// Vacant: compatible patients exist, but occupancy lost the
    /// workload/penalty trade-off.
    WorkloadRelief,
}

/// Patient attributes echoed on an assignment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedPatientView {
    /// Patient identifier.
    pub id: String,
    /// Required specialty.
    pub specialty_need: String,
    /// Ventilator requirement.
    pub ventilator_need: bool,
    /// Dialysis requirement.
    pub dialysis_need: bool,
    /// Nursing demand.
    pub nurse_intensity: f64,
    /// Defuzzified priority.
    pub priority_score: f64,
    /// Blended survival estimate.
    pub survival_score: f64,
    /// Priority band.
    pub band: PriorityBand,
}

/// One row of the assignment table: a bed and its (possibly vacant)
/// occupant with the reason code set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRow {
    /// Bed identifier.
    pub bed_id: String,
    /// Unit classification.
    pub icu_type: String,
    /// Bed specialty.
    pub specialty: String,
    /// Ventilator readiness.
    pub ventilator_ready: bool,
    /// Dialysis readiness.
    pub dialysis_ready: bool,
    /// Nursing capacity.
    pub nurse_capacity: f64,
    /// Assigned patient, or `None` for an explicit vacancy.
    pub patient: Option<AssignedPatientView>,
    /// Machine-readable explanation codes.
    pub reason_codes: Vec<ReasonCode>,
}

/// Category of a logged conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Ventilator need unmet at the assigned bed.
    VentilatorUnmet,
    /// Dialysis need unmet at the assigned bed.
    DialysisUnmet,
    /// Specialty cannot be served at the assigned bed.
    SpecialtyMismatch,
    /// Low-confidence record placed despite the uncertainty threshold.
    HighUncertaintyPlacement,
    /// Bed finished the run without an occupant.
    BedLeftVacant,
    /// Patient finished the run without a bed.
    NoBedAvailable,
}

/// One conflict: the violated capability and the identities involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictEntry {
    /// What went unsatisfied.
    pub kind: ConflictKind,
    /// Bed involved, if any.
    pub bed_id: Option<String>,
    /// Patient involved, if any.
    pub patient_id: Option<String>,
}

/// The optimization report consumed by the report/UI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// Final scoring breakdown of the best chromosome.
    pub fitness: FitnessRecord,
    /// Per-generation best/mean fitness.
    pub history: Vec<GenerationStats>,
    /// Conflict log built from the best chromosome.
    pub conflicts: Vec<ConflictEntry>,
    /// Generations executed.
    pub generations: usize,
    /// Early stop on fitness stall.
    pub stagnated: bool,
    /// External cancellation.
    pub cancelled: bool,
}

/// Everything [`crate::allocate`] returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// One row per bed.
    pub assignments: Vec<AssignmentRow>,
    /// Totals, history, conflicts.
    pub report: OptimizationReport,
    /// The winning chromosome (patient indices into the input order).
    pub best: Chromosome,
}

/// Builds the assignment table for a chromosome.
pub fn build_assignment_table(
    best: &Chromosome,
    pool: &CandidatePool,
    weights: &FitnessWeights,
) -> Vec<AssignmentRow> {
    let unassigned = best.unassigned_by_priority(pool);
    (0..pool.bed_count())
        .map(|bed_idx| {
            let bed = pool.bed(bed_idx);
            let (patient, reason_codes) = match best.gene(bed_idx) {
                Some(patient_idx) => {
                    let patient = pool.patient(patient_idx);
                    let codes = occupied_codes(pool, bed_idx, patient_idx, weights);
                    (
                        Some(AssignedPatientView {
                            id: patient.id.clone(),
                            specialty_need: patient.specialty_need.clone(),
                            ventilator_need: patient.ventilator_need,
                            dialysis_need: patient.dialysis_need,
                            nurse_intensity: patient.nurse_intensity,
                            priority_score: patient.priority_score,
                            survival_score: patient.survival_score,
                            band: patient.band,
                        }),
                        codes,
                    )
                }
                None => (None, vec![vacancy_code(pool, bed_idx, &unassigned)]),
            };
            AssignmentRow {
                bed_id: bed.id.clone(),
                icu_type: bed.icu_type.clone(),
                specialty: bed.specialty.clone(),
                ventilator_ready: bed.ventilator_ready,
                dialysis_ready: bed.dialysis_ready,
                nurse_capacity: bed.nurse_capacity,
                patient,
                reason_codes,
            }
        })
        .collect()
}

fn occupied_codes(
    pool: &CandidatePool,
    bed_idx: usize,
    patient_idx: usize,
    weights: &FitnessWeights,
) -> Vec<ReasonCode> {
    let compat = pool.compat(bed_idx, patient_idx);
    let patient = pool.patient(patient_idx);
    let mut codes = vec![match compat.specialty {
        SpecialtyMatch::Exact => ReasonCode::SpecialtyMatch,
        SpecialtyMatch::Partial => ReasonCode::SpecialtyPartial,
        SpecialtyMatch::Mismatch => ReasonCode::SpecialtyMismatch,
    }];
    if patient.ventilator_need {
        codes.push(if compat.ventilator_ok {
            ReasonCode::VentilatorProvided
        } else {
            ReasonCode::VentilatorMissing
        });
    }
    if patient.dialysis_need {
        codes.push(if compat.dialysis_ok {
            ReasonCode::DialysisProvided
        } else {
            ReasonCode::DialysisMissing
        });
    }
    if patient.uncertainty > weights.high_uncertainty_threshold {
        codes.push(ReasonCode::HighUncertainty);
    }
    codes
}

fn vacancy_code(pool: &CandidatePool, bed_idx: usize, unassigned: &[usize]) -> ReasonCode {
    if unassigned.is_empty() {
        ReasonCode::NoPatientWaiting
    } else if pool.best_feasible_candidate(bed_idx, unassigned).is_none() {
        ReasonCode::NoCompatiblePatient
    } else {
        ReasonCode::WorkloadRelief
    }
}

/// Builds the conflict log: capability violations in bed order, then
/// unassigned patients, then vacant beds.
pub fn build_conflicts(
    best: &Chromosome,
    pool: &CandidatePool,
    weights: &FitnessWeights,
) -> Vec<ConflictEntry> {
    let mut conflicts = Vec::new();

    for (bed_idx, patient_idx) in best.occupied() {
        let compat = pool.compat(bed_idx, patient_idx);
        let bed_id = pool.bed(bed_idx).id.clone();
        let patient = pool.patient(patient_idx);
        let mut push = |kind: ConflictKind| {
            conflicts.push(ConflictEntry {
                kind,
                bed_id: Some(bed_id.clone()),
                patient_id: Some(patient.id.clone()),
            });
        };
        if !compat.ventilator_ok {
            push(ConflictKind::VentilatorUnmet);
        }
        if !compat.dialysis_ok {
            push(ConflictKind::DialysisUnmet);
        }
        if compat.specialty == SpecialtyMatch::Mismatch {
            push(ConflictKind::SpecialtyMismatch);
        }
        if patient.uncertainty > weights.high_uncertainty_threshold {
            push(ConflictKind::HighUncertaintyPlacement);
        }
    }

    let assigned = best.assigned_flags(pool.patient_count());
    for (patient_idx, assigned) in assigned.iter().enumerate() {
        if !assigned {
            conflicts.push(ConflictEntry {
                kind: ConflictKind::NoBedAvailable,
                bed_id: None,
                patient_id: Some(pool.patient(patient_idx).id.clone()),
            });
        }
    }

    for bed_idx in 0..pool.bed_count() {
        if best.gene(bed_idx).is_none() {
            conflicts.push(ConflictEntry {
                kind: ConflictKind::BedLeftVacant,
                bed_id: Some(pool.bed(bed_idx).id.clone()),
                patient_id: None,
            });
        }
    }

    conflicts
}

/// Assembles the full outcome from a finished run.
pub fn build_outcome(
    outcome: OptimizeOutcome,
    pool: &CandidatePool,
    weights: &FitnessWeights,
) -> AllocationOutcome {
    let assignments = build_assignment_table(&outcome.best, pool, weights);
    let conflicts = build_conflicts(&outcome.best, pool, weights);
    AllocationOutcome {
        assignments,
        report: OptimizationReport {
            fitness: outcome.best_record,
            history: outcome.history,
            conflicts,
            generations: outcome.generations,
            stagnated: outcome.stagnated,
            cancelled: outcome.cancelled,
        },
        best: outcome.best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bed, Patient};

    fn scored(mut patient: Patient, priority: f64, survival: f64) -> Patient {
        patient.priority_score = priority;
        patient.survival_score = survival;
        patient
    }

    fn scenario_pool() -> CandidatePool {
        let patients = vec![
            scored(
                Patient::new("P1", "general").with_ventilator(true, 0.9),
                0.9,
                0.9,
            ),
            scored(Patient::new("P2", "general"), 0.5, 0.5),
            scored(Patient::new("P3", "general"), 0.2, 0.2),
        ];
        let beds = vec![
            Bed::new("B1", "general").with_ventilator(true),
            Bed::new("B2", "general"),
        ];
        CandidatePool::new(patients, beds)
    }

    #[test]
    fn test_assignment_rows_carry_reason_codes() {
        let pool = scenario_pool();
        let weights = FitnessWeights::default();
        let best = Chromosome::from_genes(vec![Some(0), Some(1)]);
        let rows = build_assignment_table(&best, &pool, &weights);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bed_id, "B1");
        assert_eq!(rows[0].patient.as_ref().unwrap().id, "P1");
        assert_eq!(
            rows[0].reason_codes,
            vec![ReasonCode::SpecialtyMatch, ReasonCode::VentilatorProvided]
        );
        assert_eq!(rows[1].reason_codes, vec![ReasonCode::SpecialtyMatch]);
    }

    #[test]
    fn test_unassigned_patient_logged_as_no_bed_available() {
        let pool = scenario_pool();
        let weights = FitnessWeights::default();
        let best = Chromosome::from_genes(vec![Some(0), Some(1)]);
        let conflicts = build_conflicts(&best, &pool, &weights);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::NoBedAvailable);
        assert_eq!(conflicts[0].patient_id.as_deref(), Some("P3"));
        assert!(conflicts[0].bed_id.is_none());
    }

    #[test]
    fn test_violation_conflicts_name_both_parties() {
        let pool = scenario_pool();
        let weights = FitnessWeights::default();
        // P1 (ventilator) forced onto B2.
        let best = Chromosome::from_genes(vec![Some(1), Some(0)]);
        let conflicts = build_conflicts(&best, &pool, &weights);

        let vent: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::VentilatorUnmet)
            .collect();
        assert_eq!(vent.len(), 1);
        assert_eq!(vent[0].bed_id.as_deref(), Some("B2"));
        assert_eq!(vent[0].patient_id.as_deref(), Some("P1"));
    }

    #[test]
    fn test_vacancy_codes() {
        let weights = FitnessWeights::default();

        // All patients assigned, bed to spare: no patient waiting.
        let pool = CandidatePool::new(
            vec![scored(Patient::new("P1", "general"), 0.5, 0.5)],
            vec![Bed::new("B1", "general"), Bed::new("B2", "general")],
        );
        let rows =
            build_assignment_table(&Chromosome::from_genes(vec![Some(0), None]), &pool, &weights);
        assert_eq!(rows[1].reason_codes, vec![ReasonCode::NoPatientWaiting]);

        // A waiting ventilator patient no bed can take: no compatible patient.
        let pool = CandidatePool::new(
            vec![scored(
                Patient::new("P1", "general").with_ventilator(true, 0.9),
                0.9,
                0.9,
            )],
            vec![Bed::new("B1", "general")],
        );
        let rows = build_assignment_table(&Chromosome::from_genes(vec![None]), &pool, &weights);
        assert_eq!(rows[0].reason_codes, vec![ReasonCode::NoCompatiblePatient]);

        // A compatible patient exists but the bed was held empty.
        let pool = CandidatePool::new(
            vec![scored(Patient::new("P1", "general"), 0.5, 0.5)],
            vec![Bed::new("B1", "general")],
        );
        let rows = build_assignment_table(&Chromosome::from_genes(vec![None]), &pool, &weights);
        assert_eq!(rows[0].reason_codes, vec![ReasonCode::WorkloadRelief]);
    }

    #[test]
    fn test_high_uncertainty_code() {
        let weights = FitnessWeights::default();
        let mut patient = scored(Patient::new("P1", "general"), 0.5, 0.5);
        patient.uncertainty = 0.9;
        let pool = CandidatePool::new(vec![patient], vec![Bed::new("B1", "general")]);
        let rows = build_assignment_table(&Chromosome::from_genes(vec![Some(0)]), &pool, &weights);
        assert!(rows[0].reason_codes.contains(&ReasonCode::HighUncertainty));

        let conflicts = build_conflicts(&Chromosome::from_genes(vec![Some(0)]), &pool, &weights);
        assert!(conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::HighUncertaintyPlacement));
    }

    #[test]
    fn test_reason_codes_serialize_snake_case() {
        let json = serde_json::to_string(&ReasonCode::NoCompatiblePatient).unwrap();
        assert_eq!(json, "\"no_compatible_patient\"");
        let json = serde_json::to_string(&ConflictKind::NoBedAvailable).unwrap();
        assert_eq!(json, "\"no_bed_available\"");
    }

    #[test]
    fn test_vacant_bed_conflict_logged() {
        let pool = scenario_pool();
        let weights = FitnessWeights::default();
        let best = Chromosome::from_genes(vec![Some(0), None]);
        let conflicts = build_conflicts(&best, &pool, &weights);
        assert!(conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::BedLeftVacant && c.bed_id.as_deref() == Some("B2")));
    }
}
