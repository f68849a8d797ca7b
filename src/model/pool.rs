//! Candidate pool: patients, beds, and precomputed compatibility.
//!
//! The pool is the read-only shared state of an optimization run. The
//! compatibility table is computed once at construction so that fitness
//! evaluation and the genetic operators never re-derive specialty or
//! equipment matches. Patients mutate only between generations: the fuzzy
//! engine rewrites scores and the feedback loop raises uncertainty —
//! neither touches the compatibility table, which depends on specialty and
//! equipment attributes alone.

use serde::{Deserialize, Serialize};

use super::{Bed, Patient};

/// How a bed's specialty relates to a patient's requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialtyMatch {
    /// Bed is specialized in the required specialty.
    Exact,
    /// Bed can cover the specialty without being specialized in it.
    Partial,
    /// Bed cannot serve the specialty.
    Mismatch,
}

impl SpecialtyMatch {
    /// Survival-term multiplier: 1.0 exact, configurable partial credit,
    /// 0.0 mismatch.
    pub fn factor(self, partial_credit: f64) -> f64 {
        match self {
            SpecialtyMatch::Exact => 1.0,
            SpecialtyMatch::Partial => partial_credit,
            SpecialtyMatch::Mismatch => 0.0,
        }
    }
}

/// Precomputed compatibility between one bed and one patient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compatibility {
    /// Specialty relation.
    pub specialty: SpecialtyMatch,
    /// Ventilator requirement satisfied (vacuously true without need).
    pub ventilator_ok: bool,
    /// Dialysis requirement satisfied (vacuously true without need).
    pub dialysis_ok: bool,
}

impl Compatibility {
    /// Equipment needs satisfiable: the hard-feasibility bit used by greedy
    /// seeding, repair refill, and the replace mutation. Specialty mismatch
    /// is soft (penalized, not excluded).
    pub fn feasible(&self) -> bool {
        self.ventilator_ok && self.dialysis_ok
    }
}

/// Read-only view over patients and beds for one optimization run.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    patients: Vec<Patient>,
    beds: Vec<Bed>,
    /// Bed-major: `compat[bed_idx * patients.len() + patient_idx]`.
    compat: Vec<Compatibility>,
}

impl CandidatePool {
    /// Builds the pool and its compatibility table.
    pub fn new(patients: Vec<Patient>, beds: Vec<Bed>) -> Self {
        let mut compat = Vec::with_capacity(beds.len() * patients.len());
        for bed in &beds {
            for patient in &patients {
                compat.push(compatibility(bed, patient));
            }
        }
        Self {
            patients,
            beds,
            compat,
        }
    }

    /// Number of patients.
    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    /// Number of beds (also the chromosome length).
    pub fn bed_count(&self) -> usize {
        self.beds.len()
    }

    /// All patients.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// All beds.
    pub fn beds(&self) -> &[Bed] {
        &self.beds
    }

    /// One patient by index.
    pub fn patient(&self, idx: usize) -> &Patient {
        &self.patients[idx]
    }

    /// One bed by index.
    pub fn bed(&self, idx: usize) -> &Bed {
        &self.beds[idx]
    }

    /// Mutable patient access for the scoring and feedback phases.
    ///
    /// Callers must not hold this across a fitness-evaluation pass; the
    /// runner alternates evaluation and feedback phases strictly.
    pub(crate) fn patient_mut(&mut self, idx: usize) -> &mut Patient {
        &mut self.patients[idx]
    }

    /// Compatibility of `bed_idx` with `patient_idx`.
    pub fn compat(&self, bed_idx: usize, patient_idx: usize) -> Compatibility {
        self.compat[bed_idx * self.patients.len() + patient_idx]
    }

    /// Patient indices ordered by priority score descending, survival score
    /// descending, then index (stable across runs).
    pub fn priority_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.patients.len()).collect();
        order.sort_by(|&a, &b| {
            let pa = &self.patients[a];
            let pb = &self.patients[b];
            pb.priority_score
                .partial_cmp(&pa.priority_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    pb.survival_score
                        .partial_cmp(&pa.survival_score)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.cmp(&b))
        });
        order
    }

    /// Bed indices ordered by capability richness descending, then index.
    pub fn beds_by_richness(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.beds.len()).collect();
        order.sort_by(|&a, &b| {
            self.beds[b]
                .richness()
                .cmp(&self.beds[a].richness())
                .then(a.cmp(&b))
        });
        order
    }

    /// Highest-priority patient from `candidates` that is equipment-feasible
    /// for `bed_idx`, or `None`. `candidates` must already be in priority
    /// order.
    pub fn best_feasible_candidate(&self, bed_idx: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .find(|&p| self.compat(bed_idx, p).feasible())
    }
}

fn compatibility(bed: &Bed, patient: &Patient) -> Compatibility {
    let specialty = if bed.specialty == patient.specialty_need {
        SpecialtyMatch::Exact
    } else if bed.capabilities.iter().any(|c| *c == patient.specialty_need) {
        SpecialtyMatch::Partial
    } else {
        SpecialtyMatch::Mismatch
    };
    Compatibility {
        specialty,
        ventilator_ok: !patient.ventilator_need || bed.ventilator_ready,
        dialysis_ok: !patient.dialysis_need || bed.dialysis_ready,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pool() -> CandidatePool {
        let patients = vec![
            Patient::new("P1", "cardiac").with_ventilator(true, 0.9),
            Patient::new("P2", "neuro"),
            Patient::new("P3", "cardiac").with_dialysis(true, 0.8),
        ];
        let beds = vec![
            Bed::new("B1", "cardiac").with_ventilator(true),
            Bed::new("B2", "general").with_capability("neuro"),
        ];
        CandidatePool::new(patients, beds)
    }

    #[test]
    fn test_specialty_match_levels() {
        let pool = sample_pool();
        assert_eq!(pool.compat(0, 0).specialty, SpecialtyMatch::Exact);
        assert_eq!(pool.compat(1, 1).specialty, SpecialtyMatch::Partial);
        assert_eq!(pool.compat(1, 0).specialty, SpecialtyMatch::Mismatch);
    }

    #[test]
    fn test_equipment_feasibility() {
        let pool = sample_pool();
        // P1 needs a ventilator: only B1 qualifies.
        assert!(pool.compat(0, 0).feasible());
        assert!(!pool.compat(1, 0).feasible());
        // P2 has no equipment needs: feasible anywhere.
        assert!(pool.compat(0, 1).feasible());
        assert!(pool.compat(1, 1).feasible());
        // P3 needs dialysis: neither bed provides it.
        assert!(!pool.compat(0, 2).feasible());
        assert!(!pool.compat(1, 2).feasible());
    }

    #[test]
    fn test_match_factor() {
        assert!((SpecialtyMatch::Exact.factor(0.5) - 1.0).abs() < 1e-12);
        assert!((SpecialtyMatch::Partial.factor(0.5) - 0.5).abs() < 1e-12);
        assert!((SpecialtyMatch::Mismatch.factor(0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_priority_order_is_deterministic() {
        let mut pool = sample_pool();
        pool.patient_mut(1).priority_score = 0.9;
        pool.patient_mut(0).priority_score = 0.9;
        pool.patient_mut(2).priority_score = 0.1;
        // Equal scores fall back to index order.
        assert_eq!(pool.priority_order(), vec![0, 1, 2]);
    }

    #[test]
    fn test_beds_by_richness() {
        let pool = sample_pool();
        // B1 has a ventilator (richness 2), B2 one capability (richness 1).
        assert_eq!(pool.beds_by_richness(), vec![0, 1]);
    }

    #[test]
    fn test_best_feasible_candidate() {
        let pool = sample_pool();
        // Candidates in priority order; bed B2 has no ventilator, so P1 is
        // skipped in favor of P2.
        assert_eq!(pool.best_feasible_candidate(1, &[0, 1, 2]), Some(1));
        assert_eq!(pool.best_feasible_candidate(0, &[2]), None);
    }
}
