//! Patient model.
//!
//! All clinical features consumed by the fuzzy engine arrive pre-scaled to
//! [0, 1] by the external ingestion layer; this crate validates the range
//! but never rescales. Derived scores (`priority_score`, `survival_score`,
//! `band`, `rule_trace`) are written by the fuzzy engine only; `uncertainty`
//! is additionally raised by the hybrid feedback loop while a patient waits.

use serde::{Deserialize, Serialize};

/// Priority band derived from the defuzzified priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBand {
    /// Immediate admission pressure.
    Critical,
    /// Elevated but not immediate.
    Urgent,
    /// Can safely wait.
    Routine,
}

impl Default for PriorityBand {
    fn default() -> Self {
        PriorityBand::Routine
    }
}

/// One fired fuzzy rule with its activation strength.
///
/// Collected per patient so the reporting collaborator can explain why a
/// score came out the way it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleActivation {
    /// Rule label, e.g. `"severity=high & stability=low -> critical"`.
    pub rule: String,
    /// Mamdani activation strength in [0, 1].
    pub strength: f64,
}

/// A patient awaiting an ICU bed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// Unique patient identifier.
    pub id: String,
    /// Composite acuity (SOFA/APACHE blend), scaled to [0, 1].
    pub severity: f64,
    /// Physiological stability (lab-derived), scaled to [0, 1].
    pub stability: f64,
    /// Data-uncertainty level in [0, 1] (0 = fully trusted record).
    pub uncertainty: f64,
    /// Externally supplied survival proxy in [0, 1].
    pub survival_proxy: f64,
    /// Requires mechanical ventilation.
    pub ventilator_need: bool,
    /// Probability of needing ventilation during the stay, [0, 1].
    pub ventilator_probability: f64,
    /// Requires renal replacement therapy.
    pub dialysis_need: bool,
    /// Probability of needing dialysis during the stay, [0, 1].
    pub dialysis_probability: f64,
    /// Required specialty (e.g. "cardiac", "neuro").
    pub specialty_need: String,
    /// Nursing demand in the same units as [`Bed::nurse_capacity`](crate::model::Bed).
    pub nurse_intensity: f64,
    /// Defuzzified priority in [0, 1]. Written by the fuzzy engine.
    pub priority_score: f64,
    /// Blended survival estimate in [0, 1]. Written by the fuzzy engine.
    pub survival_score: f64,
    /// Priority band derived from `priority_score`.
    pub band: PriorityBand,
    /// Fired rules, sorted descending by strength.
    pub rule_trace: Vec<RuleActivation>,
}

impl Patient {
    /// Creates a patient with neutral features and unset scores.
    pub fn new(id: impl Into<String>, specialty_need: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity: 0.0,
            stability: 1.0,
            uncertainty: 0.0,
            survival_proxy: 1.0,
            ventilator_need: false,
            ventilator_probability: 0.0,
            dialysis_need: false,
            dialysis_probability: 0.0,
            specialty_need: specialty_need.into(),
            nurse_intensity: 1.0,
            priority_score: 0.0,
            survival_score: 0.0,
            band: PriorityBand::Routine,
            rule_trace: Vec::new(),
        }
    }

    /// Sets severity.
    pub fn with_severity(mut self, severity: f64) -> Self {
        self.severity = severity;
        self
    }

    /// Sets stability.
    pub fn with_stability(mut self, stability: f64) -> Self {
        self.stability = stability;
        self
    }

    /// Sets data uncertainty.
    pub fn with_uncertainty(mut self, uncertainty: f64) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    /// Sets the survival proxy.
    pub fn with_survival_proxy(mut self, proxy: f64) -> Self {
        self.survival_proxy = proxy;
        self
    }

    /// Flags ventilator need with its probability.
    pub fn with_ventilator(mut self, need: bool, probability: f64) -> Self {
        self.ventilator_need = need;
        self.ventilator_probability = probability;
        self
    }

    /// Flags dialysis need with its probability.
    pub fn with_dialysis(mut self, need: bool, probability: f64) -> Self {
        self.dialysis_need = need;
        self.dialysis_probability = probability;
        self
    }

    /// Sets nursing demand.
    pub fn with_nurse_intensity(mut self, intensity: f64) -> Self {
        self.nurse_intensity = intensity;
        self
    }

    /// Features that must lie in [0, 1], with their names for diagnostics.
    pub(crate) fn unit_range_features(&self) -> [(&'static str, f64); 6] {
        [
            ("severity", self.severity),
            ("stability", self.stability),
            ("uncertainty", self.uncertainty),
            ("survival_proxy", self.survival_proxy),
            ("ventilator_probability", self.ventilator_probability),
            ("dialysis_probability", self.dialysis_probability),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let p = Patient::new("P1", "cardiac")
            .with_severity(0.8)
            .with_stability(0.2)
            .with_uncertainty(0.1)
            .with_ventilator(true, 0.9)
            .with_nurse_intensity(2.0);

        assert_eq!(p.id, "P1");
        assert_eq!(p.specialty_need, "cardiac");
        assert!((p.severity - 0.8).abs() < 1e-12);
        assert!(p.ventilator_need);
        assert_eq!(p.band, PriorityBand::Routine);
        assert!(p.rule_trace.is_empty());
    }

    #[test]
    fn test_band_serde_snake_case() {
        let json = serde_json::to_string(&PriorityBand::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
