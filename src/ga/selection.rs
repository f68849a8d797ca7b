//! Parent selection strategies.
//!
//! Both strategies assume **maximization** (higher fitness = better) and
//! are reproducible: given the same seed and population they pick the same
//! parents.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::Chromosome;

/// Selection strategy for choosing parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Tournament selection: pick `k` individuals at random, keep the best.
    ///
    /// Higher `k` = stronger selection pressure; k=3 is the usual default.
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection over fitness
    /// shifted to be positive.
    Roulette,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<R: Rng>(&self, population: &[Chromosome], rng: &mut R) -> usize {
        assert!(!population.is_empty(), "cannot select from empty population");
        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Roulette => roulette(population, rng),
        }
    }
}

/// Tournament: k draws with replacement, highest fitness wins.
fn tournament<R: Rng>(population: &[Chromosome], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();
    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness > population[best_idx].fitness {
            best_idx = idx;
        }
    }
    best_idx
}

/// Roulette wheel over fitness normalized to positive weights:
/// `weight_i = fitness_i − min_fitness + epsilon`.
fn roulette<R: Rng>(population: &[Chromosome], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let min_fitness = population
        .iter()
        .map(|c| c.fitness)
        .fold(f64::INFINITY, f64::min);

    let epsilon = 1e-10;
    let weights: Vec<f64> = population
        .iter()
        .map(|c| c.fitness - min_fitness + epsilon)
        .collect();

    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}
