//! Genetic operators: crossover and mutation.
//!
//! Crossover can duplicate a patient across two genes; the runner therefore
//! repairs every child immediately after recombination. Mutation operators
//! preserve the uniqueness invariant by construction — a proposed move that
//! would duplicate a patient is skipped — so no second repair pass runs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::CandidatePool;

use super::chromosome::Chromosome;

/// Crossover operator choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossover {
    /// Per-gene coin flip between the parents.
    Uniform,
    /// Single cut point; prefix from one parent, suffix from the other.
    OnePoint,
}

impl Default for Crossover {
    fn default() -> Self {
        Crossover::Uniform
    }
}

impl Crossover {
    /// Produces two children. Children may violate the uniqueness
    /// invariant and carry unset fitness; callers repair and re-evaluate.
    pub fn recombine<R: Rng>(
        self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rng: &mut R,
    ) -> (Chromosome, Chromosome) {
        assert_eq!(
            parent1.len(),
            parent2.len(),
            "parents must have equal length"
        );
        match self {
            Crossover::Uniform => uniform(parent1, parent2, rng),
            Crossover::OnePoint => one_point(parent1, parent2, rng),
        }
    }
}

fn uniform<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let n = parent1.len();
    let mut genes1 = Vec::with_capacity(n);
    let mut genes2 = Vec::with_capacity(n);
    for i in 0..n {
        if rng.random_bool(0.5) {
            genes1.push(parent1.gene(i));
            genes2.push(parent2.gene(i));
        } else {
            genes1.push(parent2.gene(i));
            genes2.push(parent1.gene(i));
        }
    }
    (Chromosome::from_genes(genes1), Chromosome::from_genes(genes2))
}

fn one_point<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let n = parent1.len();
    if n < 2 {
        return (
            Chromosome::from_genes(parent1.genes().to_vec()),
            Chromosome::from_genes(parent2.genes().to_vec()),
        );
    }
    let point = rng.random_range(1..n);
    let mut genes1 = parent1.genes()[..point].to_vec();
    genes1.extend_from_slice(&parent2.genes()[point..]);
    let mut genes2 = parent2.genes()[..point].to_vec();
    genes2.extend_from_slice(&parent1.genes()[point..]);
    (Chromosome::from_genes(genes1), Chromosome::from_genes(genes2))
}

/// Applies per-gene mutation.
///
/// Each gene mutates with probability `rate` using one of three moves:
/// swap with another random gene, replace with the highest-priority
/// unassigned equipment-feasible patient, or clear the gene when its bed's
/// nurse load exceeds capacity.
pub fn mutate<R: Rng>(chromosome: &mut Chromosome, pool: &CandidatePool, rate: f64, rng: &mut R) {
    let n = chromosome.len();
    if n == 0 || rate <= 0.0 {
        return;
    }
    for bed in 0..n {
        if !rng.random_bool(rate) {
            continue;
        }
        match rng.random_range(0..3u8) {
            0 => {
                let other = rng.random_range(0..n);
                chromosome.swap_genes(bed, other);
            }
            1 => {
                let candidates = chromosome.unassigned_by_priority(pool);
                if let Some(patient) = pool.best_feasible_candidate(bed, &candidates) {
                    chromosome.set_gene(bed, Some(patient));
                }
            }
            _ => {
                if let Some(patient) = chromosome.gene(bed) {
                    let overloaded =
                        pool.patient(patient).nurse_intensity > pool.bed(bed).nurse_capacity;
                    if overloaded {
                        chromosome.set_gene(bed, None);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bed, Patient};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn scored(mut patient: Patient, priority: f64) -> Patient {
        patient.priority_score = priority;
        patient.survival_score = priority;
        patient
    }

    fn sample_pool() -> CandidatePool {
        let patients = vec![
            scored(Patient::new("P0", "cardiac"), 0.9),
            scored(Patient::new("P1", "neuro"), 0.6),
            scored(Patient::new("P2", "general"), 0.4),
            scored(Patient::new("P3", "general").with_nurse_intensity(5.0), 0.2),
        ];
        let beds = vec![
            Bed::new("B0", "cardiac").with_nurse_capacity(3.0),
            Bed::new("B1", "neuro").with_nurse_capacity(3.0),
            Bed::new("B2", "general").with_nurse_capacity(3.0),
        ];
        CandidatePool::new(patients, beds)
    }

    #[test]
    fn test_uniform_preserves_gene_positions() {
        let mut rng = SmallRng::seed_from_u64(7);
        let p1 = Chromosome::from_genes(vec![Some(0), Some(1), None]);
        let p2 = Chromosome::from_genes(vec![Some(2), None, Some(3)]);
        let (c1, c2) = Crossover::Uniform.recombine(&p1, &p2, &mut rng);
        for i in 0..3 {
            let from_parents = [p1.gene(i), p2.gene(i)];
            assert!(from_parents.contains(&c1.gene(i)));
            assert!(from_parents.contains(&c2.gene(i)));
            // The two children split the parents at each position.
            assert_ne!(
                (c1.gene(i) == p1.gene(i)) as u8 + (c2.gene(i) == p2.gene(i)) as u8,
                1
            );
        }
    }

    #[test]
    fn test_one_point_is_a_cut() {
        let mut rng = SmallRng::seed_from_u64(7);
        let p1 = Chromosome::from_genes(vec![Some(0), Some(1), Some(2)]);
        let p2 = Chromosome::from_genes(vec![None, None, None]);
        let (c1, _) = Crossover::OnePoint.recombine(&p1, &p2, &mut rng);
        // Prefix from p1, suffix from p2: once genes go vacant they stay so.
        let mut seen_vacant = false;
        for i in 0..3 {
            if c1.gene(i).is_none() {
                seen_vacant = true;
            } else {
                assert!(!seen_vacant, "one-point child mixed segments");
            }
        }
        assert!(seen_vacant, "cut point must move some suffix");
    }

    #[test]
    fn test_mutation_preserves_uniqueness() {
        let pool = sample_pool();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut ch = Chromosome::from_genes(vec![Some(0), Some(1), None]);
        for _ in 0..200 {
            mutate(&mut ch, &pool, 0.5, &mut rng);
            assert!(ch.satisfies_uniqueness());
        }
    }

    #[test]
    fn test_replace_pulls_unassigned_patient() {
        let pool = sample_pool();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ch = Chromosome::from_genes(vec![None, None, None]);
        // With rate 1.0 every gene mutates; replacements only ever insert
        // patients that are currently unassigned.
        for _ in 0..50 {
            mutate(&mut ch, &pool, 1.0, &mut rng);
            assert!(ch.satisfies_uniqueness());
        }
    }

    #[test]
    fn test_overload_clear_targets_overloaded_bed_only() {
        let pool = sample_pool();
        // P3 (intensity 5) on B0 (capacity 3) is overloaded; P0 is not.
        let mut ch = Chromosome::from_genes(vec![Some(3), Some(1), Some(2)]);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut cleared = false;
        for _ in 0..100 {
            mutate(&mut ch, &pool, 1.0, &mut rng);
            if !ch.contains_patient(3) {
                cleared = true;
                break;
            }
        }
        assert!(cleared, "overloaded gene was never cleared");
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let pool = sample_pool();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut ch = Chromosome::from_genes(vec![Some(0), Some(1), None]);
        let before = ch.clone();
        mutate(&mut ch, &pool, 0.0, &mut rng);
        assert_eq!(ch, before);
    }
}
