//! Fitness breakdown attached to an evaluated chromosome.

use serde::{Deserialize, Serialize};

/// Per-category counts of constraint violations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintCounts {
    /// Ventilator-needing patients on beds without a ventilator.
    pub ventilator_unmet: usize,
    /// Dialysis-needing patients on beds without dialysis.
    pub dialysis_unmet: usize,
    /// Patients on beds that cannot serve their specialty.
    pub specialty_mismatch: usize,
    /// Placements of patients whose data uncertainty exceeds the
    /// configured high-risk threshold.
    pub high_uncertainty: usize,
}

impl ConstraintCounts {
    /// Total violations across categories.
    pub fn total(&self) -> usize {
        self.ventilator_unmet + self.dialysis_unmet + self.specialty_mismatch + self.high_uncertainty
    }
}

/// Decomposed contribution of one occupied gene.
///
/// This is the hook the explanation collaborator consumes; the evaluator
/// produces the numbers, not the prose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneContribution {
    /// Bed index within the pool.
    pub bed: usize,
    /// Patient index within the pool.
    pub patient: usize,
    /// Contribution to the survival term (including any ventilator bonus).
    pub survival_delta: f64,
    /// Contribution to the workload penalty.
    pub workload_delta: f64,
    /// Contribution to the (unweighted-by-w3) constraint penalty.
    pub constraint_delta: f64,
}

/// Full scoring breakdown for one chromosome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
    /// Survival term (higher is better).
    pub survival_term: f64,
    /// Quadratic per-bed nurse overload penalty.
    pub workload_penalty: f64,
    /// Weighted sum of constraint-violation categories.
    pub constraint_penalty: f64,
    /// Negated variance of per-specialty occupancy shares over occupied
    /// beds (0 is perfectly fair).
    pub fairness_term: f64,
    /// Weighted total used for ranking; higher is better.
    pub total: f64,
    /// Violation counts behind `constraint_penalty`.
    pub counts: ConstraintCounts,
    /// Per-gene decomposition, one entry per occupied gene in bed order.
    pub contributions: Vec<GeneContribution>,
}

impl FitnessRecord {
    /// Number of occupied beds.
    pub fn occupancy(&self) -> usize {
        self.contributions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_total() {
        let counts = ConstraintCounts {
            ventilator_unmet: 1,
            dialysis_unmet: 2,
            specialty_mismatch: 3,
            high_uncertainty: 1,
        };
        assert_eq!(counts.total(), 7);
    }

    #[test]
    fn test_record_serializes() {
        let record = FitnessRecord {
            survival_term: 1.5,
            workload_penalty: 0.0,
            constraint_penalty: 0.4,
            fairness_term: -0.01,
            total: 1.1,
            counts: ConstraintCounts::default(),
            contributions: vec![GeneContribution {
                bed: 0,
                patient: 2,
                survival_delta: 0.9,
                workload_delta: 0.0,
                constraint_delta: 0.0,
            }],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"survival_term\":1.5"));
        let back: FitnessRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
