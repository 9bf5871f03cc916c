use crate::config::{CoverageTerm, EnergyTerm, FitnessWeights, OptimizerConfig};
use crate::coverage::{CoverageEngine, CoverageInfo};
use crate::session::Session;
use serde::{Deserialize, Serialize};

/// Result of evaluating one sleep assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    /// Weighted sum `alpha * term1 + beta * term2 + gamma * term3`.
    pub total: f32,
    /// Energy term, see [`EnergyTerm`].
    pub term1: f32,
    /// Coverage retention, see [`CoverageTerm`].
    pub term2: f32,
    /// `1 - partial_overlapping / total_overlapping`.
    pub term3: f32,
    pub coverage: CoverageInfo,
}

/// Which terms make up the fitness and how they are weighted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessModel {
    pub weights: FitnessWeights,
    pub energy_term: EnergyTerm,
    pub coverage_term: CoverageTerm,
}

impl FitnessModel {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self {
            weights: config.weights,
            energy_term: config.energy_term,
            coverage_term: config.coverage_term,
        }
    }
}

fn ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Evaluates gene vectors against one session.
///
/// Cheap to copy and `Sync`, so a population can be evaluated in parallel.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    engine: &'a CoverageEngine,
    session: &'a Session,
    model: FitnessModel,
}

impl<'a> Evaluator<'a> {
    pub fn new(engine: &'a CoverageEngine, session: &'a Session, model: FitnessModel) -> Self {
        Self {
            engine,
            session,
            model,
        }
    }

    pub fn session(&self) -> &'a Session {
        self.session
    }

    pub fn model(&self) -> &FitnessModel {
        &self.model
    }

    pub fn evaluate(&self, genes: &[bool]) -> Fitness {
        let session = self.session;
        let coverage = self
            .engine
            .coverage(genes, session.alive(), session.coverage());

        let term1 = match self.model.energy_term {
            EnergyTerm::ActivityRatio => {
                let awake_energy: f32 = session
                    .energies()
                    .iter()
                    .zip(genes)
                    .filter(|(e, asleep)| **e != 0.0 && !**asleep)
                    .map(|(e, _)| *e)
                    .sum();
                let total_energy = session.total_energy();
                if total_energy == 0.0 {
                    0.0
                } else {
                    1.0 - awake_energy / total_energy
                }
            }
            EnergyTerm::Fairness => {
                let average = session.average_energy();
                let awake_deviation: f32 = session
                    .energies()
                    .iter()
                    .zip(genes)
                    .filter(|(e, asleep)| **e != 0.0 && !**asleep)
                    .map(|(e, _)| *e - average)
                    .sum();
                let (neg, pos) = session.deviation_bounds();
                ratio(awake_deviation - neg, pos - neg)
            }
        };

        let term2 = match self.model.coverage_term {
            CoverageTerm::Retained => ratio(coverage.partial_coverage, coverage.total_coverage),
            CoverageTerm::Exclusive => ratio(coverage.exclusive_area, coverage.total_coverage),
        };

        let term3 = if coverage.total_overlapping == 0.0 {
            0.0
        } else {
            1.0 - coverage.partial_overlapping / coverage.total_overlapping
        };

        let weights = self.model.weights;
        Fitness {
            total: weights.alpha * term1 + weights.beta * term2 + weights.gamma * term3,
            term1,
            term2,
            term3,
            coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::Region;

    fn engine() -> CoverageEngine {
        CoverageEngine::new(
            vec![1, 2, 3, 4],
            [(1, 1.0), (2, 1.0), (3, 1.0), (4, 1.0)],
            [Region::new(vec![1, 2], 2.0)],
        )
        .unwrap()
    }

    fn model(energy_term: EnergyTerm, coverage_term: CoverageTerm) -> FitnessModel {
        FitnessModel {
            weights: FitnessWeights {
                alpha: 0.5,
                beta: 0.5,
                gamma: 0.0,
            },
            energy_term,
            coverage_term,
        }
    }

    #[test]
    fn test_activity_ratio() {
        let engine = engine();
        let session = Session::new(&engine, &[1.0, 1.0, 2.0, 0.0], None).unwrap();
        let eval = Evaluator::new(
            &engine,
            &session,
            model(EnergyTerm::ActivityRatio, CoverageTerm::Retained),
        );

        let fitness = eval.evaluate(&[false, false, true, false]);
        assert_eq!(fitness.term1, 0.5);
        // total 1 + 1 + 1 + 2 (overlap), node 3 sleeps
        assert_eq!(fitness.coverage.total_coverage, 5.0);
        assert_eq!(fitness.term2, 4.0 / 5.0);
        assert_eq!(fitness.total, 0.5 * 0.5 + 0.5 * (4.0 / 5.0));
    }

    #[test]
    fn test_fairness_prefers_rich_nodes_awake() {
        let engine = engine();
        let session = Session::new(&engine, &[1.0, 3.0, 2.0, 2.0], None).unwrap();
        let eval = Evaluator::new(
            &engine,
            &session,
            model(EnergyTerm::Fairness, CoverageTerm::Retained),
        );

        let rich_awake = eval.evaluate(&[true, false, false, false]);
        let poor_awake = eval.evaluate(&[false, true, false, false]);
        assert!(rich_awake.term1 > poor_awake.term1);
        assert_eq!(rich_awake.term1, 1.0);
    }

    #[test]
    fn test_exclusive_term_and_overlap_term() {
        let engine = engine();
        let session = Session::new(&engine, &[1.0, 1.0, 1.0, 1.0], None).unwrap();
        let eval = Evaluator::new(
            &engine,
            &session,
            model(EnergyTerm::ActivityRatio, CoverageTerm::Exclusive),
        );

        let all_awake = eval.evaluate(&[false; 4]);
        assert_eq!(all_awake.term2, 4.0 / 6.0);
        assert_eq!(all_awake.term3, 0.0);

        let one_owner_asleep = eval.evaluate(&[true, false, false, false]);
        assert_eq!(one_owner_asleep.term2, 5.0 / 6.0);
        assert_eq!(one_owner_asleep.term3, 1.0);
    }

    #[test]
    fn test_model_follows_config() {
        let engine = engine();
        let session = Session::new(&engine, &[1.0; 4], None).unwrap();
        let config = OptimizerConfig {
            energy_term: EnergyTerm::Fairness,
            coverage_term: CoverageTerm::Exclusive,
            ..OptimizerConfig::default()
        };
        let eval = Evaluator::new(&engine, &session, FitnessModel::from_config(&config));
        assert_eq!(eval.model().weights, config.weights);
        assert_eq!(eval.model().energy_term, EnergyTerm::Fairness);
        assert_eq!(eval.model().coverage_term, CoverageTerm::Exclusive);
    }

    #[test]
    fn test_zero_denominators_fold_to_zero() {
        let engine = engine();
        let session = Session::new(&engine, &[0.0; 4], None).unwrap();
        for energy_term in [EnergyTerm::ActivityRatio, EnergyTerm::Fairness] {
            let eval = Evaluator::new(&engine, &session, model(energy_term, CoverageTerm::Retained));
            let fitness = eval.evaluate(&[false; 4]);
            assert_eq!(fitness.term1, 0.0);
            assert_eq!(fitness.term2, 0.0);
            assert_eq!(fitness.term3, 0.0);
            assert_eq!(fitness.total, 0.0);
        }
    }
}
