//! Bed model.

use serde::{Deserialize, Serialize};

/// An ICU bed. Immutable for the duration of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bed {
    /// Unique bed identifier.
    pub id: String,
    /// Unit classification (e.g. "MICU", "SICU", "CCU").
    pub icu_type: String,
    /// Specialty the bed is staffed for.
    pub specialty: String,
    /// Additional specialties the bed can cover without being specialized
    /// in them (earns partial credit in the survival term).
    pub capabilities: Vec<String>,
    /// Ventilator hookup available.
    pub ventilator_ready: bool,
    /// Renal replacement therapy available.
    pub dialysis_ready: bool,
    /// Nursing capacity in the same units as patient nurse intensity.
    pub nurse_capacity: f64,
    /// Isolation room.
    pub isolation: bool,
    /// Continuous monitoring equipment.
    pub monitoring: bool,
}

impl Bed {
    /// Creates a bed with no equipment and unit nurse capacity.
    pub fn new(id: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            icu_type: String::new(),
            specialty: specialty.into(),
            capabilities: Vec::new(),
            ventilator_ready: false,
            dialysis_ready: false,
            nurse_capacity: 1.0,
            isolation: false,
            monitoring: false,
        }
    }

    /// Sets the unit classification.
    pub fn with_icu_type(mut self, icu_type: impl Into<String>) -> Self {
        self.icu_type = icu_type.into();
        self
    }

    /// Adds a coverable (non-specialized) specialty.
    pub fn with_capability(mut self, specialty: impl Into<String>) -> Self {
        self.capabilities.push(specialty.into());
        self
    }

    /// Sets ventilator readiness.
    pub fn with_ventilator(mut self, ready: bool) -> Self {
        self.ventilator_ready = ready;
        self
    }

    /// Sets dialysis readiness.
    pub fn with_dialysis(mut self, ready: bool) -> Self {
        self.dialysis_ready = ready;
        self
    }

    /// Sets nursing capacity.
    pub fn with_nurse_capacity(mut self, capacity: f64) -> Self {
        self.nurse_capacity = capacity;
        self
    }

    /// Sets the isolation flag.
    pub fn with_isolation(mut self, isolation: bool) -> Self {
        self.isolation = isolation;
        self
    }

    /// Sets the monitoring flag.
    pub fn with_monitoring(mut self, monitoring: bool) -> Self {
        self.monitoring = monitoring;
        self
    }

    /// Capability richness used to order beds for greedy seeding:
    /// equipment counts double, coverable specialties count once.
    pub(crate) fn richness(&self) -> usize {
        let mut score = self.capabilities.len();
        if self.ventilator_ready {
            score += 2;
        }
        if self.dialysis_ready {
            score += 2;
        }
        if self.isolation {
            score += 1;
        }
        if self.monitoring {
            score += 1;
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let bed = Bed::new("B1", "cardiac")
            .with_icu_type("CCU")
            .with_ventilator(true)
            .with_dialysis(true)
            .with_capability("general")
            .with_nurse_capacity(4.0);

        assert_eq!(bed.id, "B1");
        assert!(bed.ventilator_ready);
        assert_eq!(bed.capabilities, vec!["general".to_string()]);
        assert!((bed.nurse_capacity - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_richness_ordering() {
        let plain = Bed::new("B1", "general");
        let equipped = Bed::new("B2", "general")
            .with_ventilator(true)
            .with_dialysis(true)
            .with_monitoring(true);
        assert!(equipped.richness() > plain.richness());
    }
}
