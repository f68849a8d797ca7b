//! Hybrid feedback between the fuzzy engine and the genetic search.
//!
//! Two mechanisms run strictly between generations, never concurrently
//! with an evaluation pass:
//!
//! - **Uncertainty decay**: patients left waiting beyond a threshold get
//!   their uncertainty raised and are re-scored by the fuzzy engine, so
//!   long waits escalate priority before the next generation evaluates.
//! - **Elite local search**: bounded greedy refinement of the top
//!   chromosomes — relocations and swaps accepted only on strict fitness
//!   improvement.

mod feedback;
mod local_search;

pub use feedback::{apply_uncertainty_decay, WaitTracker};
pub use local_search::refine;

use serde::{Deserialize, Serialize};

/// Configuration of the feedback loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Generations a patient must wait unassigned before decay applies.
    pub wait_threshold_generations: usize,
    /// Uncertainty increase per decayed generation (clamped at 1.0).
    pub uncertainty_decay_step: f64,
    /// Elite chromosomes refined by local search each generation
    /// (0 disables).
    pub local_search_elites: usize,
    /// Accepted-move budget per refinement pass.
    pub local_search_budget: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            wait_threshold_generations: 5,
            uncertainty_decay_step: 0.05,
            local_search_elites: 2,
            local_search_budget: 16,
        }
    }
}

impl HybridConfig {
    /// Sets the wait threshold.
    pub fn with_wait_threshold(mut self, generations: usize) -> Self {
        self.wait_threshold_generations = generations;
        self
    }

    /// Sets the decay step.
    pub fn with_decay_step(mut self, step: f64) -> Self {
        self.uncertainty_decay_step = step.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of elites refined by local search.
    pub fn with_local_search_elites(mut self, elites: usize) -> Self {
        self.local_search_elites = elites;
        self
    }

    /// Sets the local search move budget.
    pub fn with_local_search_budget(mut self, budget: usize) -> Self {
        self.local_search_budget = budget;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HybridConfig::default();
        assert_eq!(config.wait_threshold_generations, 5);
        assert!((config.uncertainty_decay_step - 0.05).abs() < 1e-12);
        assert_eq!(config.local_search_elites, 2);
        assert_eq!(config.local_search_budget, 16);
    }

    #[test]
    fn test_decay_step_clamped() {
        let config = HybridConfig::default().with_decay_step(1.5);
        assert!((config.uncertainty_decay_step - 1.0).abs() < 1e-12);
    }
}
