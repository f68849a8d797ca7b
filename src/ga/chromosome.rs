//! Chromosome representation and the repair operator.
//!
//! # Encoding
//!
//! A chromosome holds one gene per bed; a gene is either a patient index
//! into the pool or vacant. The uniqueness invariant — no patient appears
//! in more than one gene — is what makes a chromosome a valid assignment.
//! [`Chromosome::repair`] restores the invariant after crossover; it never
//! rejects a candidate.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::CandidatePool;

/// One candidate complete bed-to-patient assignment.
///
/// Higher fitness = better assignment (maximization convention).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    /// One gene per bed: `Some(patient index)` or vacant.
    genes: Vec<Option<usize>>,
    /// Cached fitness total; `f64::NEG_INFINITY` until evaluated.
    pub fitness: f64,
}

impl Chromosome {
    /// An all-vacant chromosome of the given length.
    pub fn vacant(bed_count: usize) -> Self {
        Self {
            genes: vec![None; bed_count],
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Builds a chromosome from raw genes (fitness unset).
    pub fn from_genes(genes: Vec<Option<usize>>) -> Self {
        Self {
            genes,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Greedy seed: beds in capability-richness order take the
    /// highest-priority equipment-feasible patient still available.
    pub fn greedy(pool: &CandidatePool) -> Self {
        let mut chromosome = Self::vacant(pool.bed_count());
        let mut available = pool.priority_order();
        for bed_idx in pool.beds_by_richness() {
            if let Some(patient) = pool.best_feasible_candidate(bed_idx, &available) {
                chromosome.genes[bed_idx] = Some(patient);
                available.retain(|&p| p != patient);
            }
        }
        chromosome
    }

    /// Random seed respecting the uniqueness invariant: a shuffled patient
    /// stream fills most beds, leaving some vacancy for the search to work
    /// with.
    pub fn random<R: Rng>(pool: &CandidatePool, rng: &mut R) -> Self {
        let mut chromosome = Self::vacant(pool.bed_count());
        let mut remaining: Vec<usize> = (0..pool.patient_count()).collect();
        remaining.shuffle(rng);
        for gene in &mut chromosome.genes {
            if remaining.is_empty() {
                break;
            }
            if rng.random_bool(0.8) {
                *gene = remaining.pop();
            }
        }
        chromosome
    }

    /// The gene slice, one entry per bed.
    pub fn genes(&self) -> &[Option<usize>] {
        &self.genes
    }

    /// The gene of one bed.
    pub fn gene(&self, bed_idx: usize) -> Option<usize> {
        self.genes[bed_idx]
    }

    /// Overwrites the gene of one bed.
    pub(crate) fn set_gene(&mut self, bed_idx: usize, gene: Option<usize>) {
        self.genes[bed_idx] = gene;
    }

    /// Swaps the genes of two beds.
    pub(crate) fn swap_genes(&mut self, a: usize, b: usize) {
        self.genes.swap(a, b);
    }

    /// Number of beds.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// True when there are no beds at all.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// `(bed index, patient index)` pairs for occupied genes, in bed order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.genes
            .iter()
            .enumerate()
            .filter_map(|(bed, gene)| gene.map(|patient| (bed, patient)))
    }

    /// Whether the patient is assigned anywhere in this chromosome.
    pub fn contains_patient(&self, patient_idx: usize) -> bool {
        self.genes.contains(&Some(patient_idx))
    }

    /// Uniqueness invariant: no patient index appears in two genes.
    pub fn satisfies_uniqueness(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.occupied().all(|(_, patient)| seen.insert(patient))
    }

    /// Per-patient assignment flags.
    pub(crate) fn assigned_flags(&self, patient_count: usize) -> Vec<bool> {
        let mut flags = vec![false; patient_count];
        for (_, patient) in self.occupied() {
            if patient < patient_count {
                flags[patient] = true;
            }
        }
        flags
    }

    /// Unassigned patient indices in priority order.
    pub(crate) fn unassigned_by_priority(&self, pool: &CandidatePool) -> Vec<usize> {
        let flags = self.assigned_flags(pool.patient_count());
        pool.priority_order()
            .into_iter()
            .filter(|&p| !flags[p])
            .collect()
    }

    /// Restores the uniqueness invariant and refills vacancies.
    ///
    /// Pass 1: a patient duplicated across genes keeps the gene with the
    /// better local fit (specialty/equipment match quality weighted by
    /// priority score); losing genes are reset to vacant. Genes referencing
    /// patients outside the pool are cleared the same way.
    ///
    /// Pass 2: every vacant gene is refilled with the highest-priority
    /// unassigned equipment-feasible patient, if one exists.
    ///
    /// Deterministic (ties keep the lower bed index) and idempotent.
    pub fn repair(&mut self, pool: &CandidatePool, partial_credit: f64) {
        let patient_count = pool.patient_count();
        let mut owner: Vec<Option<usize>> = vec![None; patient_count];
        for bed in 0..self.genes.len() {
            let Some(patient) = self.genes[bed] else {
                continue;
            };
            if patient >= patient_count {
                self.genes[bed] = None;
                continue;
            }
            match owner[patient] {
                None => owner[patient] = Some(bed),
                Some(holder) => {
                    if local_fit(pool, bed, patient, partial_credit)
                        > local_fit(pool, holder, patient, partial_credit)
                    {
                        self.genes[holder] = None;
                        owner[patient] = Some(bed);
                    } else {
                        self.genes[bed] = None;
                    }
                }
            }
        }

        let mut available = self.unassigned_by_priority(pool);
        for bed in 0..self.genes.len() {
            if self.genes[bed].is_some() {
                continue;
            }
            if let Some(patient) = pool.best_feasible_candidate(bed, &available) {
                self.genes[bed] = Some(patient);
                available.retain(|&p| p != patient);
            }
        }
    }
}

/// How well a patient fits a bed, for duplicate resolution: specialty and
/// equipment match quality scaled by the patient's priority.
fn local_fit(pool: &CandidatePool, bed_idx: usize, patient_idx: usize, partial_credit: f64) -> f64 {
    let compat = pool.compat(bed_idx, patient_idx);
    let patient = pool.patient(patient_idx);
    let mut quality = compat.specialty.factor(partial_credit);
    if patient.ventilator_need {
        quality += if compat.ventilator_ok { 1.0 } else { -1.0 };
    }
    if patient.dialysis_need {
        quality += if compat.dialysis_ok { 0.8 } else { -0.8 };
    }
    quality * (0.5 + 0.5 * patient.priority_score)
}
