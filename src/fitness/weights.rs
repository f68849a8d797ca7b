//! Objective weights and penalty calibration.

use serde::{Deserialize, Serialize};

/// Weights of the fitness objective
/// `w1·survival − w2·workload − w3·constraint + w4·fairness`,
/// plus the per-category constraint calibration.
///
/// # Defaults
///
/// ```
/// use icu_triage::fitness::FitnessWeights;
///
/// let w = FitnessWeights::default();
/// assert_eq!(w.survival, 1.0);
/// assert_eq!(w.constraint, 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// w1: survival term weight.
    pub survival: f64,
    /// w2: workload penalty weight.
    pub workload: f64,
    /// w3: constraint penalty weight.
    pub constraint: f64,
    /// w4: fairness term weight.
    pub fairness: f64,
    /// Survival multiplier for a compatible-but-not-specialized bed.
    pub partial_specialty_credit: f64,
    /// Survival bonus when a ventilator-needing patient lands on a
    /// ventilator-ready bed.
    pub ventilator_bonus: f64,
    /// Constraint cost per unmet ventilator need.
    pub ventilator_unmet: f64,
    /// Constraint cost per unmet dialysis need.
    pub dialysis_unmet: f64,
    /// Constraint cost per specialty mismatch.
    pub specialty_mismatch: f64,
    /// Constraint cost per low-confidence placement.
    pub high_uncertainty: f64,
    /// Uncertainty above which a placement counts as low-confidence.
    pub high_uncertainty_threshold: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            survival: 1.0,
            workload: 1.0,
            constraint: 1.5,
            fairness: 0.3,
            partial_specialty_credit: 0.5,
            ventilator_bonus: 0.2,
            ventilator_unmet: 1.0,
            dialysis_unmet: 0.8,
            specialty_mismatch: 0.4,
            high_uncertainty: 0.5,
            high_uncertainty_threshold: 0.7,
        }
    }
}

impl FitnessWeights {
    /// Sets the four objective weights w1..w4.
    pub fn with_objective(mut self, w1: f64, w2: f64, w3: f64, w4: f64) -> Self {
        self.survival = w1;
        self.workload = w2;
        self.constraint = w3;
        self.fairness = w4;
        self
    }

    /// Sets the partial specialty credit.
    pub fn with_partial_specialty_credit(mut self, credit: f64) -> Self {
        self.partial_specialty_credit = credit.clamp(0.0, 1.0);
        self
    }

    /// Sets the ventilator compliance bonus.
    pub fn with_ventilator_bonus(mut self, bonus: f64) -> Self {
        self.ventilator_bonus = bonus;
        self
    }

    /// Sets the high-uncertainty threshold.
    pub fn with_high_uncertainty_threshold(mut self, threshold: f64) -> Self {
        self.high_uncertainty_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Validates the calibration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("survival", self.survival),
            ("workload", self.workload),
            ("constraint", self.constraint),
            ("fairness", self.fairness),
            ("ventilator_bonus", self.ventilator_bonus),
            ("ventilator_unmet", self.ventilator_unmet),
            ("dialysis_unmet", self.dialysis_unmet),
            ("specialty_mismatch", self.specialty_mismatch),
            ("high_uncertainty", self.high_uncertainty),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(format!("{name} weight must be non-negative"));
            }
        }
        if !(0.0..=1.0).contains(&self.partial_specialty_credit) {
            return Err("partial_specialty_credit must lie in [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.high_uncertainty_threshold) {
            return Err("high_uncertainty_threshold must lie in [0, 1]".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(FitnessWeights::default().validate().is_ok());
    }

    #[test]
    fn test_objective_builder() {
        let w = FitnessWeights::default().with_objective(2.0, 0.5, 3.0, 0.1);
        assert_eq!(w.survival, 2.0);
        assert_eq!(w.workload, 0.5);
        assert_eq!(w.constraint, 3.0);
        assert_eq!(w.fairness, 0.1);
    }

    #[test]
    fn test_clamps() {
        let w = FitnessWeights::default()
            .with_partial_specialty_credit(1.5)
            .with_high_uncertainty_threshold(-0.2);
        assert_eq!(w.partial_specialty_credit, 1.0);
        assert_eq!(w.high_uncertainty_threshold, 0.0);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let w = FitnessWeights::default().with_objective(-1.0, 1.0, 1.0, 1.0);
        assert!(w.validate().is_err());
    }
}
