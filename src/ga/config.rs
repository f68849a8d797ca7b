//! GA configuration.

use serde::{Deserialize, Serialize};

use super::operators::Crossover;
use super::selection::Selection;

/// Parameters of the evolutionary loop.
///
/// # Defaults
///
/// ```
/// use icu_triage::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 80);
/// assert_eq!(config.max_generations, 120);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use icu_triage::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(5))
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of chromosomes per generation.
    pub population_size: usize,

    /// Generation budget.
    pub max_generations: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Crossover operator.
    pub crossover: Crossover,

    /// Probability of recombining a selected pair (otherwise the parents
    /// are cloned).
    pub crossover_rate: f64,

    /// Per-gene mutation probability.
    pub mutation_rate: f64,

    /// Best chromosomes copied unmodified into the next generation.
    pub elite_count: usize,

    /// Fraction of the initial population seeded greedily; the rest is
    /// randomized under the uniqueness invariant.
    pub greedy_fraction: f64,

    /// Consecutive non-improving generations before early stop
    /// (0 disables).
    pub stall_patience: usize,

    /// Random seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,

    /// Evaluate chromosomes in parallel (effective with the `parallel`
    /// feature; never changes results).
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 80,
            max_generations: 120,
            selection: Selection::default(),
            crossover: Crossover::default(),
            crossover_rate: 0.85,
            mutation_rate: 0.1,
            elite_count: 1,
            greedy_fraction: 0.3,
            stall_patience: 25,
            seed: None,
            parallel: true,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Convenience builder for tournament selection of size `k`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the greedy seeding fraction.
    pub fn with_greedy_fraction(mut self, fraction: f64) -> Self {
        self.greedy_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the stall patience (0 disables early stop).
    pub fn with_stall_patience(mut self, patience: usize) -> Self {
        self.stall_patience = patience;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.elite_count >= self.population_size {
            return Err("elite_count must leave room for offspring".into());
        }
        if self.elite_count == 0 {
            return Err("elite_count must be at least 1".into());
        }
        if let Selection::Tournament(k) = self.selection {
            if k == 0 {
                return Err("tournament size must be at least 1".into());
            }
        }
        let unit_ranged = [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("greedy_fraction", self.greedy_fraction),
        ];
        for (name, value) in unit_ranged {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must lie in [0, 1]"));
            }
        }
        Ok(())
    }
}
