//! Wait tracking and uncertainty decay.

use tracing::debug;

use crate::error::TriageError;
use crate::fuzzy::FuzzyEngine;
use crate::ga::Chromosome;
use crate::model::CandidatePool;

use super::HybridConfig;

/// Generations each patient has spent unassigned in the tracked best
/// chromosome.
#[derive(Debug, Clone)]
pub struct WaitTracker {
    waits: Vec<usize>,
}

impl WaitTracker {
    /// A tracker for `patient_count` patients, all at zero wait.
    pub fn new(patient_count: usize) -> Self {
        Self {
            waits: vec![0; patient_count],
        }
    }

    /// Records one generation: unassigned patients accumulate wait,
    /// assigned patients reset to zero.
    pub fn observe(&mut self, best: &Chromosome) {
        let assigned = best.assigned_flags(self.waits.len());
        for (patient, wait) in self.waits.iter_mut().enumerate() {
            if assigned[patient] {
                *wait = 0;
            } else {
                *wait += 1;
            }
        }
    }

    /// Current wait of one patient.
    pub fn wait(&self, patient_idx: usize) -> usize {
        self.waits[patient_idx]
    }
}

/// Raises uncertainty for patients waiting beyond the threshold and
/// re-scores exactly those patients through the fuzzy engine.
///
/// Returns the number of patients decayed. A patient at maximum
/// uncertainty with zero wait is never touched — decay is driven by wait,
/// not by the uncertainty value itself.
pub fn apply_uncertainty_decay(
    pool: &mut CandidatePool,
    tracker: &WaitTracker,
    engine: &FuzzyEngine,
    config: &HybridConfig,
) -> Result<usize, TriageError> {
    if config.uncertainty_decay_step <= 0.0 {
        return Ok(0);
    }
    let mut decayed = 0;
    for patient_idx in 0..pool.patient_count() {
        if tracker.wait(patient_idx) <= config.wait_threshold_generations {
            continue;
        }
        let patient = pool.patient_mut(patient_idx);
        patient.uncertainty = (patient.uncertainty + config.uncertainty_decay_step).min(1.0);
        engine.rescore(patient)?;
        decayed += 1;
    }
    if decayed > 0 {
        debug!(decayed, "uncertainty decay applied to waiting patients");
    }
    Ok(decayed)
}
