use crate::NodeId;

/// Problems found while reading or validating an [`OptimizerConfig`](crate::config::OptimizerConfig).
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("missing configuration key: {0}")]
    MissingKey(&'static str),
    #[error("population_size must be greater than 0")]
    EmptyPopulation,
    #[error("{name} must be between 0.0 and 1.0, got: {value}")]
    RateOutOfRange { name: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative, got: {value}")]
    InvalidWeight { name: &'static str, value: f32 },
    #[error("{name} must be finite, got: {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("wmin ({wmin}) must not exceed wmax ({wmax})")]
    InvertedBounds { wmin: f32, wmax: f32 },
}

/// Errors raised while building the coverage model or running an optimizer.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("node {0} appears more than once in the node ordering")]
    DuplicateNode(NodeId),
    #[error("region references unknown node {0}")]
    UnknownNode(NodeId),
    #[error("node {0} owns more than one exclusive region")]
    DuplicateExclusive(NodeId),
    #[error("region area must be finite and non-negative, got: {0}")]
    InvalidArea(f32),
    #[error("overlapping region needs at least 2 distinct owners, got: {0}")]
    DegenerateRegion(usize),
    #[error("invalid grid: {0}")]
    InvalidGrid(&'static str),
    #[error("expected {expected} energies, got: {actual}")]
    EnergyLength { expected: usize, actual: usize },
    #[error("energy of node {node} must be finite and non-negative, got: {value}")]
    InvalidEnergy { node: NodeId, value: f32 },
    #[error("cluster head {0} is not part of the node ordering")]
    UnknownHead(NodeId),
}
