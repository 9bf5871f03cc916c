use symbios_coverage::algorithms::StrategyKind;
use symbios_coverage::config::{CoverageTerm, DominanceRule, EnergyTerm, ParentBlend};
use symbios_coverage::{ConfigError, Error, OptimizerConfig, RoundReport};

#[test]
fn test_minimal_json_fills_defaults() {
    let json = r#"{
        "population_size": 20,
        "max_iterations": 100,
        "weights": { "alpha": 0.6, "beta": 0.4 },
        "wmax": 0.6,
        "wmin": 0.1
    }"#;
    let config: OptimizerConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.population_size, 20);
    assert_eq!(config.weights.gamma, 0.0);
    assert_eq!(config.selection_rate, 0.6);
    assert_eq!(config.stagnation_limit, 3);
    assert_eq!(config.ecca_crossover_rate, 0.98);
    assert_eq!(config.energy_term, EnergyTerm::ActivityRatio);
    assert_eq!(config.coverage_term, CoverageTerm::Retained);
    assert_eq!(config.dominance, DominanceRule::StrictAll);
    assert_eq!(config.parent_blend, ParentBlend::Father);
    assert_eq!(config.seed, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_required_field_is_an_error() {
    let json = r#"{
        "population_size": 20,
        "weights": { "alpha": 0.6, "beta": 0.4 },
        "wmax": 0.6,
        "wmin": 0.1
    }"#;
    assert!(serde_json::from_str::<OptimizerConfig>(json).is_err());
}

#[test]
fn test_variants_by_name() {
    let json = r#"{
        "population_size": 10,
        "max_iterations": 10,
        "weights": { "alpha": 0.5, "beta": 0.3, "gamma": 0.2 },
        "wmax": 0.5,
        "wmin": 0.5,
        "energy_term": "Fairness",
        "coverage_term": "Exclusive",
        "dominance": "Pareto",
        "parent_blend": "Uniform",
        "seed": 7
    }"#;
    let config: OptimizerConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.energy_term, EnergyTerm::Fairness);
    assert_eq!(config.coverage_term, CoverageTerm::Exclusive);
    assert_eq!(config.dominance, DominanceRule::Pareto);
    assert_eq!(config.parent_blend, ParentBlend::Uniform);
    assert_eq!(config.seed, Some(7));
}

#[test]
fn test_config_roundtrip() {
    let config = OptimizerConfig {
        seed: Some(3),
        ..OptimizerConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: OptimizerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, back);
}

#[test]
fn test_strategy_kind_names() {
    for (name, kind) in [
        ("\"GeneticAlgorithm\"", StrategyKind::GeneticAlgorithm),
        ("\"Pso\"", StrategyKind::Pso),
        ("\"ModifiedPso\"", StrategyKind::ModifiedPso),
        ("\"InfluencePso\"", StrategyKind::InfluencePso),
        ("\"Ecca\"", StrategyKind::Ecca),
    ] {
        let parsed: StrategyKind = serde_json::from_str(name).unwrap();
        assert_eq!(parsed, kind);
        assert_eq!(format!("\"{}\"", parsed.build().name()), name);
    }
    assert!(serde_json::from_str::<StrategyKind>("\"Annealing\"").is_err());
}

#[test]
fn test_errors_render() {
    let err: Error = ConfigError::RateOutOfRange {
        name: "wmax",
        value: 1.5,
    }
    .into();
    assert_eq!(
        err.to_string(),
        "Configuration error: wmax must be between 0.0 and 1.0, got: 1.5"
    );
    assert_eq!(
        ConfigError::MissingKey("WMAX").to_string(),
        "missing configuration key: WMAX"
    );
}

#[test]
fn test_report_serialises() {
    let report = RoundReport {
        coverage: 0.75,
        overlapping: 0.5,
        sleeping_ratio: 0.25,
        initial_fitness: 0.4,
        final_fitness: 0.6,
    };
    let value = serde_json::to_value(report).unwrap();
    assert_eq!(value["coverage"], 0.75);
    assert_eq!(value["sleeping_ratio"], 0.25);
}
