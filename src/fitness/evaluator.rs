//! The fitness function.

use std::collections::BTreeMap;

use crate::ga::Chromosome;
use crate::model::{CandidatePool, SpecialtyMatch};

use super::record::{ConstraintCounts, FitnessRecord, GeneContribution};
use super::weights::FitnessWeights;

/// Scores one chromosome against the pool.
///
/// total = w1·survival − w2·workload − w3·constraint + w4·fairness
///
/// Pure function: no mutation of inputs, no randomness, deterministic
/// iteration order (genes in bed order, specialties in lexical order), so
/// concurrent evaluation of distinct chromosomes cannot change any result.
pub fn evaluate(
    chromosome: &Chromosome,
    pool: &CandidatePool,
    weights: &FitnessWeights,
) -> FitnessRecord {
    let mut survival_term = 0.0;
    let mut workload_penalty = 0.0;
    let mut constraint_penalty = 0.0;
    let mut counts = ConstraintCounts::default();
    let mut contributions = Vec::new();
    let mut specialty_occupancy: BTreeMap<&str, usize> = BTreeMap::new();

    for (bed_idx, gene) in chromosome.genes().iter().enumerate() {
        let Some(patient_idx) = *gene else {
            continue;
        };
        let bed = pool.bed(bed_idx);
        let patient = pool.patient(patient_idx);
        let compat = pool.compat(bed_idx, patient_idx);

        let mut survival_delta =
            patient.survival_score * compat.specialty.factor(weights.partial_specialty_credit);
        if patient.ventilator_need && bed.ventilator_ready {
            survival_delta += weights.ventilator_bonus;
        }
        survival_term += survival_delta;

        let overload = (patient.nurse_intensity - bed.nurse_capacity).max(0.0);
        let workload_delta = overload * overload;
        workload_penalty += workload_delta;

        let mut constraint_delta = 0.0;
        if !compat.ventilator_ok {
            counts.ventilator_unmet += 1;
            constraint_delta += weights.ventilator_unmet;
        }
        if !compat.dialysis_ok {
            counts.dialysis_unmet += 1;
            constraint_delta += weights.dialysis_unmet;
        }
        if compat.specialty == SpecialtyMatch::Mismatch {
            counts.specialty_mismatch += 1;
            constraint_delta += weights.specialty_mismatch;
        }
        if patient.uncertainty > weights.high_uncertainty_threshold {
            counts.high_uncertainty += 1;
            constraint_delta += weights.high_uncertainty;
        }
        constraint_penalty += constraint_delta;

        *specialty_occupancy.entry(bed.specialty.as_str()).or_insert(0) += 1;

        contributions.push(GeneContribution {
            bed: bed_idx,
            patient: patient_idx,
            survival_delta,
            workload_delta,
            constraint_delta,
        });
    }

    let fairness_term = -specialty_share_variance(&specialty_occupancy, contributions.len());

    let total = weights.survival * survival_term - weights.workload * workload_penalty
        - weights.constraint * constraint_penalty
        + weights.fairness * fairness_term;

    FitnessRecord {
        survival_term,
        workload_penalty,
        constraint_penalty,
        fairness_term,
        total,
        counts,
        contributions,
    }
}

/// Variance of per-specialty occupancy shares over occupied beds only.
/// Empty or single-specialty occupancies are perfectly fair (variance 0).
fn specialty_share_variance(occupancy: &BTreeMap<&str, usize>, occupied: usize) -> f64 {
    if occupied == 0 || occupancy.is_empty() {
        return 0.0;
    }
    let k = occupancy.len() as f64;
    let shares: Vec<f64> = occupancy
        .values()
        .map(|&count| count as f64 / occupied as f64)
        .collect();
    let mean = shares.iter().sum::<f64>() / k;
    shares.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / k
}
