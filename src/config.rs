use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weights of the fitness terms.
///
/// `alpha` weighs the energy term, `beta` coverage retention and `gamma`
/// the reduction of overlapping area. The multi-objective strategy only
/// compares objectives whose weight is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    pub alpha: f32,
    pub beta: f32,
    #[serde(default)]
    pub gamma: f32,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            alpha: 0.7,
            beta: 0.3,
            gamma: 0.0,
        }
    }
}

/// Velocity update coefficients of the binary PSO.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsoCoefficients {
    pub inertia: f32,
    pub phi1: f32,
    pub phi2: f32,
}

impl Default for PsoCoefficients {
    fn default() -> Self {
        Self {
            inertia: 1.0,
            phi1: 2.0,
            phi2: 2.0,
        }
    }
}

/// How `term1` rewards putting nodes to sleep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyTerm {
    /// `1 - awake_energy / alive_energy`: share of the alive energy that sleeps.
    #[default]
    ActivityRatio,
    /// Normalised deviation from the average energy summed over awake nodes;
    /// rewards keeping energy-rich nodes awake.
    Fairness,
}

/// How `term2` measures retained coverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageTerm {
    /// `partial_coverage / total_coverage`
    #[default]
    Retained,
    /// `exclusive_area / total_coverage`
    Exclusive,
}

/// Dominance relation used by the multi-objective strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DominanceRule {
    /// Strictly better on every weighted objective.
    #[default]
    StrictAll,
    /// No worse on every weighted objective and strictly better on one.
    Pareto,
}

/// Gene source of a crossed-over child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentBlend {
    /// Every gene comes from the father; only mutation introduces change.
    #[default]
    Father,
    /// Each gene comes from father or mother with probability 0.5.
    Uniform,
}

fn default_selection_rate() -> f32 {
    0.6
}

fn default_stagnation_limit() -> usize {
    3
}

fn default_ecca_crossover_rate() -> f32 {
    0.98
}

/// Tunable parameters shared by every strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub max_iterations: usize,
    pub weights: FitnessWeights,
    /// Upper bound of the annealed mutation rate.
    pub wmax: f32,
    /// Lower bound of the annealed mutation rate.
    pub wmin: f32,
    /// Fraction of the population replaced every generation by the GA.
    #[serde(default = "default_selection_rate")]
    pub selection_rate: f32,
    /// Generations without improvement after which the GA mutates at rate 1.0.
    #[serde(default = "default_stagnation_limit")]
    pub stagnation_limit: usize,
    #[serde(default)]
    pub pso: PsoCoefficients,
    #[serde(default = "default_ecca_crossover_rate")]
    pub ecca_crossover_rate: f32,
    #[serde(default)]
    pub energy_term: EnergyTerm,
    #[serde(default)]
    pub coverage_term: CoverageTerm,
    #[serde(default)]
    pub dominance: DominanceRule,
    #[serde(default)]
    pub parent_blend: ParentBlend,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            max_iterations: 50,
            weights: FitnessWeights::default(),
            wmax: 0.6,
            wmin: 0.1,
            selection_rate: default_selection_rate(),
            stagnation_limit: default_stagnation_limit(),
            pso: PsoCoefficients::default(),
            ecca_crossover_rate: default_ecca_crossover_rate(),
            energy_term: EnergyTerm::default(),
            coverage_term: CoverageTerm::default(),
            dominance: DominanceRule::default(),
            parent_blend: ParentBlend::default(),
            seed: None,
        }
    }
}

fn validate_rate(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::RateOutOfRange { name, value });
    }
    Ok(())
}

fn validate_weight(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidWeight { name, value });
    }
    Ok(())
}

fn validate_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    Ok(())
}

impl OptimizerConfig {
    /// Checks every parameter; called by every optimizer constructor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        validate_rate("wmax", self.wmax)?;
        validate_rate("wmin", self.wmin)?;
        if self.wmin > self.wmax {
            return Err(ConfigError::InvertedBounds {
                wmin: self.wmin,
                wmax: self.wmax,
            });
        }
        validate_rate("selection_rate", self.selection_rate)?;
        validate_rate("ecca_crossover_rate", self.ecca_crossover_rate)?;
        validate_weight("alpha", self.weights.alpha)?;
        validate_weight("beta", self.weights.beta)?;
        validate_weight("gamma", self.weights.gamma)?;
        validate_finite("pso.inertia", self.pso.inertia)?;
        validate_finite("pso.phi1", self.pso.phi1)?;
        validate_finite("pso.phi2", self.pso.phi2)?;
        Ok(())
    }

    /// Reads the upper-case key/value bundle used by simulation scripts:
    /// integers `NB_INDIVIDUALS`, `MAX_ITERATIONS` and floats
    /// `FITNESS_ALPHA`, `FITNESS_BETA`, `WMAX`, `WMIN`, optionally
    /// `FITNESS_GAMMA`. Everything else keeps its default.
    pub fn from_key_values(
        ints: &HashMap<String, u32>,
        floats: &HashMap<String, f32>,
    ) -> Result<Self, ConfigError> {
        fn get<T: Copy>(map: &HashMap<String, T>, key: &'static str) -> Result<T, ConfigError> {
            map.get(key).copied().ok_or(ConfigError::MissingKey(key))
        }

        let config = Self {
            population_size: get(ints, "NB_INDIVIDUALS")? as usize,
            max_iterations: get(ints, "MAX_ITERATIONS")? as usize,
            weights: FitnessWeights {
                alpha: get(floats, "FITNESS_ALPHA")?,
                beta: get(floats, "FITNESS_BETA")?,
                gamma: floats.get("FITNESS_GAMMA").copied().unwrap_or(0.0),
            },
            wmax: get(floats, "WMAX")?,
            wmin: get(floats, "WMIN")?,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_values() -> (HashMap<String, u32>, HashMap<String, f32>) {
        let ints = HashMap::from([
            ("NB_INDIVIDUALS".to_string(), 12),
            ("MAX_ITERATIONS".to_string(), 30),
        ]);
        let floats = HashMap::from([
            ("FITNESS_ALPHA".to_string(), 0.5),
            ("FITNESS_BETA".to_string(), 0.5),
            ("WMAX".to_string(), 0.6),
            ("WMIN".to_string(), 0.1),
        ]);
        (ints, floats)
    }

    #[test]
    fn test_default_is_valid() {
        assert!(OptimizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_key_values() {
        let (ints, floats) = key_values();
        let config = OptimizerConfig::from_key_values(&ints, &floats).unwrap();
        assert_eq!(config.population_size, 12);
        assert_eq!(config.max_iterations, 30);
        assert_eq!(config.weights.gamma, 0.0);
        assert_eq!(config.selection_rate, 0.6);
    }

    #[test]
    fn test_missing_key_is_reported() {
        let (ints, mut floats) = key_values();
        floats.remove("WMIN");
        assert_eq!(
            OptimizerConfig::from_key_values(&ints, &floats),
            Err(ConfigError::MissingKey("WMIN"))
        );
    }

    #[test]
    fn test_validation_errors() {
        let mut config = OptimizerConfig::default();
        config.population_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));

        let mut config = OptimizerConfig::default();
        config.wmin = 0.9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedBounds { .. })
        ));

        let mut config = OptimizerConfig::default();
        config.wmax = 1.5;
        assert!(config.validate().is_err());

        let mut config = OptimizerConfig::default();
        config.weights.beta = f32::NAN;
        assert!(config.validate().is_err());
    }
}
