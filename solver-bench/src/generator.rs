//! Random project-selection instances.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use solver_robust::{ProjectInstance, RobustResult};

/// Seeded generator of project-selection instances.
///
/// Costs and utilities are integers in `1..=100`, the budget is half of the
/// total cost rounded down, and OWA weights are integers in
/// `1..=scenarios + 1`.
pub struct InstanceGenerator {
    rng: StdRng,
}

impl InstanceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn project_instance(&mut self, scenarios: usize, projects: usize) -> RobustResult<ProjectInstance> {
        let costs: Vec<f64> = (0..projects).map(|_| self.value()).collect();
        let utilities = (0..scenarios)
            .map(|_| (0..projects).map(|_| self.value()).collect())
            .collect();
        let budget = (0.5 * costs.iter().sum::<f64>()).floor();
        ProjectInstance::new(costs, utilities, budget)
    }

    pub fn owa_weights(&mut self, scenarios: usize) -> Vec<f64> {
        let hi = scenarios as u32 + 1;
        (0..scenarios)
            .map(|_| f64::from(self.rng.gen_range(1..=hi)))
            .collect()
    }

    fn value(&mut self) -> f64 {
        f64::from(self.rng.gen_range(1u32..=100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_instance() {
        let a = InstanceGenerator::new(7).project_instance(3, 5).unwrap();
        let b = InstanceGenerator::new(7).project_instance(3, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ranges() {
        let mut gen = InstanceGenerator::new(1);
        let inst = gen.project_instance(4, 12).unwrap();
        assert_eq!((inst.num_scenarios(), inst.num_projects()), (4, 12));
        assert!(inst.costs().iter().all(|&c| (1.0..=100.0).contains(&c)));
        for i in 0..4 {
            assert!(inst.utilities(i).iter().all(|&u| (1.0..=100.0).contains(&u)));
        }
        let total: f64 = inst.costs().iter().sum();
        assert_eq!(inst.budget(), (total / 2.0).floor());

        let w = gen.owa_weights(4);
        assert_eq!(w.len(), 4);
        assert!(w.iter().all(|&x| (1.0..=5.0).contains(&x) && x.fract() == 0.0));
    }
}
