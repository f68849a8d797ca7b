//! Mamdani inference and defuzzification.

use crate::error::TriageError;
use crate::model::{Patient, PriorityBand, RuleActivation};

use super::config::{FuzzyConfig, Variable};

/// Output of one scoring pass over a patient.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyScores {
    /// Defuzzified priority in [0, 1].
    pub priority_score: f64,
    /// Blended survival estimate in [0, 1].
    pub survival_score: f64,
    /// Band derived from the priority score.
    pub band: PriorityBand,
    /// Fired rules, sorted descending by activation strength.
    pub rule_trace: Vec<RuleActivation>,
}

/// The fuzzy priority engine.
///
/// Holds the configuration loaded once at construction; scoring is a pure,
/// deterministic function of the patient record.
#[derive(Debug, Clone)]
pub struct FuzzyEngine {
    config: FuzzyConfig,
}

impl FuzzyEngine {
    /// Creates an engine from a configuration.
    ///
    /// Call [`FuzzyConfig::validate`] first to reject malformed rule bases
    /// with a descriptive message.
    pub fn new(config: FuzzyConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }

    /// Scores one patient.
    ///
    /// Fails with [`TriageError::InvalidInputRange`] if any normalized
    /// feature lies outside [0, 1]; this is a contract violation by the
    /// ingestion layer and is not recovered.
    pub fn score(&self, patient: &Patient) -> Result<FuzzyScores, TriageError> {
        for (field, value) in patient.unit_range_features() {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(TriageError::InvalidInputRange {
                    patient: patient.id.clone(),
                    field,
                    value,
                });
            }
        }

        // Degrees indexed by Variable, then by Level.
        let degrees = [
            self.config.severity.degrees(patient.severity),
            self.config.stability.degrees(patient.stability),
            self.config.certainty.degrees(1.0 - patient.uncertainty),
        ];
        let stability_degrees = degrees[Variable::Stability.index()];
        let certainty_degrees = degrees[Variable::Certainty.index()];

        // Mamdani: min across antecedents, max across each band's rules.
        let mut band_activation = [0.0f64; 3];
        let mut rule_trace = Vec::new();
        for rule in &self.config.rules {
            let strength = rule
                .antecedents
                .iter()
                .map(|&(variable, level)| degrees[variable.index()][level.index()])
                .fold(f64::INFINITY, f64::min);
            if strength > 0.0 {
                let slot = &mut band_activation[band_index(rule.consequent)];
                *slot = slot.max(strength);
                rule_trace.push(RuleActivation {
                    rule: rule.label.clone(),
                    strength,
                });
            }
        }
        rule_trace.sort_by(|a, b| {
            b.strength
                .partial_cmp(&a.strength)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.rule.cmp(&b.rule))
        });

        let mass: f64 = band_activation.iter().sum();
        let priority_score = if mass > 1e-6 {
            (band_activation[0] * self.config.centroids.routine
                + band_activation[1] * self.config.centroids.urgent
                + band_activation[2] * self.config.centroids.critical)
                / mass
        } else {
            0.0
        };

        let band = if priority_score >= self.config.critical_threshold {
            PriorityBand::Critical
        } else if priority_score >= self.config.urgent_threshold {
            PriorityBand::Urgent
        } else {
            PriorityBand::Routine
        };

        // Survival blends the external proxy with the same stability and
        // certainty memberships the rules consume.
        let fuzzy_part = 0.5 * (1.0 - stability_degrees[0]) + 0.5 * certainty_degrees[2];
        let survival_score = (self.config.survival_proxy_weight * patient.survival_proxy
            + self.config.survival_fuzzy_weight * fuzzy_part)
            .clamp(0.0, 1.0);

        Ok(FuzzyScores {
            priority_score,
            survival_score,
            band,
            rule_trace,
        })
    }

    /// Scores a patient and writes the derived fields in place.
    pub fn rescore(&self, patient: &mut Patient) -> Result<(), TriageError> {
        let scores = self.score(patient)?;
        patient.priority_score = scores.priority_score;
        patient.survival_score = scores.survival_score;
        patient.band = scores.band;
        patient.rule_trace = scores.rule_trace;
        Ok(())
    }

    /// Scores every patient, failing fast on the first contract violation.
    pub fn rescore_all(&self, patients: &mut [Patient]) -> Result<(), TriageError> {
        for patient in patients {
            self.rescore(patient)?;
        }
        Ok(())
    }
}

fn band_index(band: PriorityBand) -> usize {
    match band {
        PriorityBand::Routine => 0,
        PriorityBand::Urgent => 1,
        PriorityBand::Critical => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> FuzzyEngine {
        FuzzyEngine::new(FuzzyConfig::default())
    }

    fn patient(severity: f64, stability: f64, uncertainty: f64) -> Patient {
        Patient::new("P", "general")
            .with_severity(severity)
            .with_stability(stability)
            .with_uncertainty(uncertainty)
            .with_survival_proxy(0.5)
    }

    fn priority(severity: f64, stability: f64, uncertainty: f64) -> f64 {
        engine()
            .score(&patient(severity, stability, uncertainty))
            .unwrap()
            .priority_score
    }

    #[test]
    fn test_severe_unstable_is_critical() {
        let scores = engine().score(&patient(0.9, 0.1, 0.0)).unwrap();
        assert!((scores.priority_score - 0.95).abs() < 1e-9);
        assert_eq!(scores.band, PriorityBand::Critical);
    }

    #[test]
    fn test_mild_stable_is_routine() {
        let scores = engine().score(&patient(0.1, 0.9, 0.0)).unwrap();
        assert!((scores.priority_score - 0.25).abs() < 1e-9);
        assert_eq!(scores.band, PriorityBand::Routine);
    }

    #[test]
    fn test_mid_mid_is_urgent() {
        let scores = engine().score(&patient(0.5, 0.5, 0.1)).unwrap();
        assert!((scores.priority_score - 0.6).abs() < 1e-9);
        assert_eq!(scores.band, PriorityBand::Urgent);
    }

    #[test]
    fn test_uncertainty_escalates_mid_mid() {
        // The medium/medium escalation rule lifts priority when the record
        // cannot be trusted.
        let trusted = priority(0.5, 0.5, 0.1);
        let murky = priority(0.5, 0.5, 0.9);
        assert!(
            murky > trusted,
            "expected escalation: {murky} <= {trusted}"
        );
    }

    #[test]
    fn test_rule_trace_sorted_and_labeled() {
        let scores = engine().score(&patient(0.9, 0.1, 0.0)).unwrap();
        assert_eq!(scores.rule_trace.len(), 1);
        assert_eq!(
            scores.rule_trace[0].rule,
            "severity=high & stability=low -> critical"
        );
        assert!((scores.rule_trace[0].strength - 1.0).abs() < 1e-9);

        let scores = engine().score(&patient(0.5, 0.5, 0.1)).unwrap();
        assert!(scores.rule_trace.len() > 1);
        for pair in scores.rule_trace.windows(2) {
            assert!(pair[0].strength >= pair[1].strength);
        }
    }

    #[test]
    fn test_survival_blend() {
        // Fully stable, fully certain, proxy 1.0 -> survival 1.0.
        let p = patient(0.2, 1.0, 0.0).with_survival_proxy(1.0);
        let scores = engine().score(&p).unwrap();
        assert!((scores.survival_score - 1.0).abs() < 1e-9);

        // Deep instability and uncertainty leave only the proxy share.
        let p = patient(0.2, 0.2, 0.8).with_survival_proxy(0.5);
        let scores = engine().score(&p).unwrap();
        assert!((scores.survival_score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let p = patient(1.2, 0.5, 0.0);
        match engine().score(&p) {
            Err(TriageError::InvalidInputRange { field, value, .. }) => {
                assert_eq!(field, "severity");
                assert!((value - 1.2).abs() < 1e-12);
            }
            other => panic!("expected InvalidInputRange, got {other:?}"),
        }

        let p = patient(0.5, 0.5, 0.0).with_survival_proxy(-0.1);
        assert!(engine().score(&p).is_err());
    }

    #[test]
    fn test_rescore_writes_patient_fields() {
        let mut p = patient(0.9, 0.1, 0.0);
        engine().rescore(&mut p).unwrap();
        assert!(p.priority_score > 0.9);
        assert_eq!(p.band, PriorityBand::Critical);
        assert!(!p.rule_trace.is_empty());
    }

    // ---- Monotonicity ----

    const GRID: [f64; 10] = [0.05, 0.15, 0.25, 0.35, 0.45, 0.55, 0.65, 0.75, 0.85, 0.95];

    #[test]
    fn test_priority_monotone_in_severity() {
        for &(stability, uncertainty) in &[(0.45, 0.2), (0.55, 0.2), (0.9, 0.7), (0.2, 0.5)] {
            let mut last = f64::NEG_INFINITY;
            for &severity in &GRID {
                let score = priority(severity, stability, uncertainty);
                assert!(
                    score >= last - 1e-9,
                    "priority dropped from {last} to {score} at severity {severity} \
                     (stability {stability}, uncertainty {uncertainty})"
                );
                last = score;
            }
        }
    }

    #[test]
    fn test_priority_monotone_in_instability() {
        for &(severity, uncertainty) in &[(0.45, 0.9), (0.7, 0.1), (0.2, 0.1), (0.55, 0.5)] {
            let mut last = f64::NEG_INFINITY;
            // Walk stability downward: instability rises.
            for &stability in GRID.iter().rev() {
                let score = priority(severity, stability, uncertainty);
                assert!(
                    score >= last - 1e-9,
                    "priority dropped from {last} to {score} at stability {stability} \
                     (severity {severity}, uncertainty {uncertainty})"
                );
                last = score;
            }
        }
    }
}
