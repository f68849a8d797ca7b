//! The evolutionary loop.
//!
//! [`GaRunner`] orchestrates the complete process: greedy + random
//! initialization → evaluation → feedback → selection → crossover → repair
//! → mutation → evaluation → elite local search → repeat until the
//! generation budget, a fitness stall, or cooperative cancellation ends
//! the run.
//!
//! # Determinism
//!
//! All random draws happen on the control thread from one seeded
//! generator, in an order independent of evaluation. Fitness evaluation is
//! a pure function, so evaluating the population in parallel (the
//! `parallel` feature) cannot change any result: the same inputs, seed,
//! and configuration reproduce the same best chromosome byte for byte.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TriageError;
use crate::fitness::{evaluate, FitnessRecord, FitnessWeights};
use crate::fuzzy::FuzzyEngine;
use crate::hybrid::{apply_uncertainty_decay, refine, WaitTracker};
use crate::model::CandidatePool;
use crate::TriageConfig;

use super::chromosome::Chromosome;
use super::operators::mutate;

/// Best/mean fitness snapshot of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (0 = initial population).
    pub generation: usize,
    /// Fitness of the tracked best chromosome so far.
    pub best_fitness: f64,
    /// Mean fitness across the population.
    pub mean_fitness: f64,
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizeOutcome {
    /// The best chromosome found during the entire run.
    pub best: Chromosome,
    /// Full scoring breakdown of `best`.
    pub best_record: FitnessRecord,
    /// Per-generation best/mean fitness for diagnostics.
    pub history: Vec<GenerationStats>,
    /// Generations executed (excluding the initial population).
    pub generations: usize,
    /// Whether the run stopped early on a fitness stall.
    pub stagnated: bool,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```no_run
/// use icu_triage::ga::GaRunner;
/// use icu_triage::model::CandidatePool;
/// use icu_triage::TriageConfig;
///
/// # let mut pool = CandidatePool::new(Vec::new(), Vec::new());
/// let config = TriageConfig::default();
/// let outcome = GaRunner::run(&mut pool, &config)?;
/// println!("best fitness: {}", outcome.best.fitness);
/// # Ok::<(), icu_triage::TriageError>(())
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the optimization to completion.
    ///
    /// Patients in the pool must already carry fuzzy scores (see
    /// [`crate::allocate`] for the full pipeline).
    ///
    /// # Errors
    /// [`TriageError::InfeasibleInput`] if the pool has no beds or no
    /// patients; everything else is expressed as fitness, not as an error.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`TriageConfig::validate`] first to get a descriptive error).
    pub fn run(
        pool: &mut CandidatePool,
        config: &TriageConfig,
    ) -> Result<OptimizeOutcome, TriageError> {
        Self::run_with_cancel(pool, config, None)
    }

    /// Runs the optimization with an optional cancellation token.
    ///
    /// When the flag is set, the loop stops at the next generation
    /// boundary and returns the best-so-far result with `cancelled = true`;
    /// no partial mutable state escapes.
    pub fn run_with_cancel(
        pool: &mut CandidatePool,
        config: &TriageConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<OptimizeOutcome, TriageError> {
        config.validate().expect("invalid TriageConfig");
        if pool.bed_count() == 0 {
            return Err(TriageError::InfeasibleInput("bed list is empty"));
        }
        if pool.patient_count() == 0 {
            return Err(TriageError::InfeasibleInput("patient list is empty"));
        }

        let ga = &config.ga;
        let seed = ga.seed.unwrap_or_else(rand::random);
        let mut rng = SmallRng::seed_from_u64(seed);
        let engine = FuzzyEngine::new(config.fuzzy.clone());
        info!(
            seed,
            beds = pool.bed_count(),
            patients = pool.patient_count(),
            population = ga.population_size,
            generations = ga.max_generations,
            "starting bed assignment optimization"
        );

        // Initial population: a greedy fraction plus randomized remainder.
        let greedy_count =
            (((ga.population_size as f64) * ga.greedy_fraction).round() as usize)
                .min(ga.population_size);
        let mut population: Vec<Chromosome> = Vec::with_capacity(ga.population_size);
        if greedy_count > 0 {
            let seedling = Chromosome::greedy(pool);
            population.extend(std::iter::repeat_with(|| seedling.clone()).take(greedy_count));
        }
        while population.len() < ga.population_size {
            population.push(Chromosome::random(pool, &mut rng));
        }
        evaluate_population(&mut population, pool, &config.weights, ga.parallel);
        sort_by_fitness(&mut population);
        refine_elites(&mut population, pool, config);
        sort_by_fitness(&mut population);

        let mut best = population[0].clone();
        let mut history = vec![snapshot(0, &best, &population)];
        let mut tracker = WaitTracker::new(pool.patient_count());
        let mut stall = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;
        let mut generations = 0usize;

        for generation in 1..=ga.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Feedback phase: strictly between evaluation passes.
            tracker.observe(&best);
            apply_uncertainty_decay(pool, &tracker, &engine, &config.hybrid)?;

            // Elites carry over unmodified, then offspring fill the rest.
            let mut next_gen: Vec<Chromosome> = population[..ga.elite_count].to_vec();
            while next_gen.len() < ga.population_size {
                let p1 = ga.selection.select(&population, &mut rng);
                let p2 = ga.selection.select(&population, &mut rng);
                let (mut child1, mut child2) = if rng.random_bool(ga.crossover_rate) {
                    ga.crossover
                        .recombine(&population[p1], &population[p2], &mut rng)
                } else {
                    (population[p1].clone(), population[p2].clone())
                };
                for child in [&mut child1, &mut child2] {
                    child.repair(pool, config.weights.partial_specialty_credit);
                    mutate(child, pool, ga.mutation_rate, &mut rng);
                    debug_assert!(child.satisfies_uniqueness());
                }
                next_gen.push(child1);
                if next_gen.len() < ga.population_size {
                    next_gen.push(child2);
                }
            }

            // Elites keep their cached fitness; offspring are evaluated
            // against the freshly decayed scores.
            evaluate_population(
                &mut next_gen[ga.elite_count..],
                pool,
                &config.weights,
                ga.parallel,
            );
            population = next_gen;
            sort_by_fitness(&mut population);
            refine_elites(&mut population, pool, config);
            sort_by_fitness(&mut population);

            if population[0].fitness > best.fitness {
                best = population[0].clone();
                stall = 0;
            } else {
                stall += 1;
            }
            generations = generation;
            history.push(snapshot(generation, &best, &population));
            debug!(
                generation,
                best = best.fitness,
                mean = history.last().map(|s| s.mean_fitness).unwrap_or_default(),
                "generation complete"
            );

            if ga.stall_patience > 0 && stall >= ga.stall_patience {
                stagnated = true;
                break;
            }
        }

        let best_record = evaluate(&best, pool, &config.weights);
        info!(
            best = best.fitness,
            generations,
            stagnated,
            cancelled,
            occupancy = best_record.occupancy(),
            "optimization finished"
        );
        Ok(OptimizeOutcome {
            best,
            best_record,
            history,
            generations,
            stagnated,
            cancelled,
        })
    }
}

fn sort_by_fitness(population: &mut [Chromosome]) {
    population.sort_by(|a, b| {
        b.fitness
            .partial_cmp(&a.fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn snapshot(generation: usize, best: &Chromosome, population: &[Chromosome]) -> GenerationStats {
    let mean = population.iter().map(|c| c.fitness).sum::<f64>() / population.len() as f64;
    GenerationStats {
        generation,
        best_fitness: best.fitness,
        mean_fitness: mean,
    }
}

fn refine_elites(population: &mut [Chromosome], pool: &CandidatePool, config: &TriageConfig) {
    let k = config.hybrid.local_search_elites.min(population.len());
    for chromosome in &mut population[..k] {
        refine(
            chromosome,
            pool,
            &config.weights,
            config.hybrid.local_search_budget,
        );
    }
}

fn evaluate_population(
    population: &mut [Chromosome],
    pool: &CandidatePool,
    weights: &FitnessWeights,
    parallel: bool,
) {
    #[cfg(feature = "parallel")]
    if parallel {
        population.par_iter_mut().for_each(|chromosome| {
            chromosome.fitness = evaluate(chromosome, pool, weights).total;
        });
        return;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;
    for chromosome in population.iter_mut() {
        chromosome.fitness = evaluate(chromosome, pool, weights).total;
    }
}

// ============================================================================
// Tests
// ============================================================================
