//! Bounded greedy refinement of elite chromosomes.

use crate::fitness::{evaluate, FitnessWeights};
use crate::ga::Chromosome;
use crate::model::CandidatePool;

const IMPROVEMENT_EPS: f64 = 1e-12;

/// Greedily improves a chromosome by relocating or swapping genes.
///
/// Scans every occupied gene against every other gene position (a swap
/// with an occupied gene, a relocation onto a vacant one) and accepts the
/// first move that strictly improves fitness, restarting the scan until no
/// move improves or `budget` accepted moves are spent. The scan order is
/// fixed, so refinement is deterministic; no randomness is involved.
///
/// The chromosome's cached fitness is kept current. Returns `true` when at
/// least one move was accepted.
pub fn refine(
    chromosome: &mut Chromosome,
    pool: &CandidatePool,
    weights: &FitnessWeights,
    budget: usize,
) -> bool {
    if budget == 0 || chromosome.len() < 2 {
        return false;
    }

    let mut current = evaluate(chromosome, pool, weights).total;
    chromosome.fitness = current;
    let mut accepted = 0;

    'outer: loop {
        for bed in 0..chromosome.len() {
            if chromosome.gene(bed).is_none() {
                continue;
            }
            for other in 0..chromosome.len() {
                if other == bed {
                    continue;
                }
                let mut candidate = chromosome.clone();
                candidate.swap_genes(bed, other);
                let total = evaluate(&candidate, pool, weights).total;
                if total > current + IMPROVEMENT_EPS {
                    candidate.fitness = total;
                    *chromosome = candidate;
                    current = total;
                    accepted += 1;
                    if accepted >= budget {
                        break 'outer;
                    }
                    continue 'outer;
                }
            }
        }
        break;
    }

    accepted > 0
}
