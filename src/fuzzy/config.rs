//! Fuzzy engine configuration: partitions, rule base, defuzzification.
//!
//! The rule base is plain data so deployments can swap calibrations without
//! touching inference code.

use serde::{Deserialize, Serialize};

use crate::model::PriorityBand;

use super::membership::LinguisticPartition;

/// A linguistic input variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Composite acuity.
    Severity,
    /// Physiological stability.
    Stability,
    /// Data certainty (1 − uncertainty).
    Certainty,
}

impl Variable {
    fn name(self) -> &'static str {
        match self {
            Variable::Severity => "severity",
            Variable::Stability => "stability",
            Variable::Certainty => "certainty",
        }
    }

    /// Index into a `[severity, stability, certainty]` degree array.
    pub(crate) fn index(self) -> usize {
        match self {
            Variable::Severity => 0,
            Variable::Stability => 1,
            Variable::Certainty => 2,
        }
    }
}

/// A linguistic level within a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

impl Level {
    fn name(self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }

    /// Index into a `[low, medium, high]` degree array.
    pub(crate) fn index(self) -> usize {
        match self {
            Level::Low => 0,
            Level::Medium => 1,
            Level::High => 2,
        }
    }
}

/// One inference rule: a conjunction of (variable, level) antecedents
/// implying a priority band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyRule {
    /// Human-readable label, derived from the antecedents.
    pub label: String,
    /// Conjunctive antecedents (combined with min).
    pub antecedents: Vec<(Variable, Level)>,
    /// Output band.
    pub consequent: PriorityBand,
}

impl FuzzyRule {
    /// Builds a rule, deriving its label from the antecedents.
    pub fn new(antecedents: Vec<(Variable, Level)>, consequent: PriorityBand) -> Self {
        let lhs: Vec<String> = antecedents
            .iter()
            .map(|(v, l)| format!("{}={}", v.name(), l.name()))
            .collect();
        let rhs = match consequent {
            PriorityBand::Critical => "critical",
            PriorityBand::Urgent => "urgent",
            PriorityBand::Routine => "routine",
        };
        Self {
            label: format!("{} -> {}", lhs.join(" & "), rhs),
            antecedents,
            consequent,
        }
    }
}

/// Band centroids used by the weighted-centroid defuzzifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandCentroids {
    /// Centroid of the routine output set.
    pub routine: f64,
    /// Centroid of the urgent output set.
    pub urgent: f64,
    /// Centroid of the critical output set.
    pub critical: f64,
}

impl Default for BandCentroids {
    fn default() -> Self {
        Self {
            routine: 0.25,
            urgent: 0.6,
            critical: 0.95,
        }
    }
}

/// Full fuzzy engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    /// Severity partition.
    pub severity: LinguisticPartition,
    /// Stability partition.
    pub stability: LinguisticPartition,
    /// Certainty partition (over 1 − uncertainty).
    pub certainty: LinguisticPartition,
    /// The rule base.
    pub rules: Vec<FuzzyRule>,
    /// Defuzzification centroids per band.
    pub centroids: BandCentroids,
    /// Priority score at or above which a patient is banded critical.
    pub critical_threshold: f64,
    /// Priority score at or above which a patient is banded urgent.
    pub urgent_threshold: f64,
    /// Weight of the external survival proxy in the survival blend.
    pub survival_proxy_weight: f64,
    /// Weight of the fuzzy stability/certainty term in the survival blend.
    pub survival_fuzzy_weight: f64,
}

impl Default for FuzzyConfig {
    /// Default calibration: a complete severity × stability grid whose
    /// consequent band never decreases with rising severity or rising
    /// instability, plus a low-certainty escalation rule for the
    /// medium/medium cell.
    fn default() -> Self {
        use Level::{High, Low, Medium};
        use PriorityBand::{Critical, Routine, Urgent};
        use Variable::{Certainty, Severity, Stability};

        let rules = vec![
            FuzzyRule::new(vec![(Severity, Low), (Stability, High)], Routine),
            FuzzyRule::new(vec![(Severity, Low), (Stability, Medium)], Routine),
            FuzzyRule::new(vec![(Severity, Low), (Stability, Low)], Urgent),
            FuzzyRule::new(vec![(Severity, Medium), (Stability, High)], Routine),
            FuzzyRule::new(vec![(Severity, Medium), (Stability, Medium)], Urgent),
            FuzzyRule::new(vec![(Severity, Medium), (Stability, Low)], Critical),
            FuzzyRule::new(vec![(Severity, High), (Stability, High)], Urgent),
            FuzzyRule::new(vec![(Severity, High), (Stability, Medium)], Critical),
            FuzzyRule::new(vec![(Severity, High), (Stability, Low)], Critical),
            FuzzyRule::new(
                vec![(Severity, Medium), (Stability, Medium), (Certainty, Low)],
                Critical,
            ),
        ];

        Self {
            severity: LinguisticPartition::default(),
            stability: LinguisticPartition::default(),
            certainty: LinguisticPartition::default(),
            rules,
            centroids: BandCentroids::default(),
            critical_threshold: 0.75,
            urgent_threshold: 0.45,
            survival_proxy_weight: 0.6,
            survival_fuzzy_weight: 0.4,
        }
    }
}

impl FuzzyConfig {
    /// Replaces the rule base.
    pub fn with_rules(mut self, rules: Vec<FuzzyRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the band thresholds.
    pub fn with_band_thresholds(mut self, critical: f64, urgent: f64) -> Self {
        self.critical_threshold = critical;
        self.urgent_threshold = urgent;
        self
    }

    /// Sets the survival blend weights.
    pub fn with_survival_weights(mut self, proxy: f64, fuzzy: f64) -> Self {
        self.survival_proxy_weight = proxy;
        self.survival_fuzzy_weight = fuzzy;
        self
    }

    /// Sets the defuzzification centroids.
    pub fn with_centroids(mut self, centroids: BandCentroids) -> Self {
        self.centroids = centroids;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.rules.is_empty() {
            return Err("rule base must not be empty".into());
        }
        for rule in &self.rules {
            if rule.antecedents.is_empty() {
                return Err(format!("rule '{}' has no antecedents", rule.label));
            }
        }
        if !(0.0..=1.0).contains(&self.critical_threshold)
            || !(0.0..=1.0).contains(&self.urgent_threshold)
        {
            return Err("band thresholds must lie in [0, 1]".into());
        }
        if self.urgent_threshold > self.critical_threshold {
            return Err("urgent_threshold must not exceed critical_threshold".into());
        }
        let blend = self.survival_proxy_weight + self.survival_fuzzy_weight;
        if self.survival_proxy_weight < 0.0
            || self.survival_fuzzy_weight < 0.0
            || (blend - 1.0).abs() > 1e-9
        {
            return Err("survival blend weights must be non-negative and sum to 1".into());
        }
        Ok(())
    }
}
