//! Coverage-preserving sleep scheduling for wireless sensor fields.
//!
//! Every round a host process hands the current residual energy of each
//! node to an [`Optimizer`]; the optimizer searches for a sleep assignment
//! (`true` = sleep) that saves energy while keeping as much of the sensed
//! area covered as possible.
//!
//! The search loop is shared; what changes between algorithms is the
//! [`Strategy`] plugged into it:
//!
//! - [`GeneticAlgorithm`](algorithms::genetic::GeneticAlgorithm): truncation GA with stagnation escape
//! - [`Pso`](algorithms::pso::Pso): binary PSO with sigmoid-discretised velocities
//! - [`ModifiedPso`](algorithms::modified_pso::ModifiedPso): velocity-free bit-flip PSO
//! - [`InfluencePso`](algorithms::influence_pso::InfluencePso): bit-copy PSO driven by annealed influence rates
//! - [`Ecca`](algorithms::ecca::Ecca): NSGA-II style multi-objective search

pub mod config;
pub mod coverage;
pub mod error;
pub mod fitness;
pub mod geometry;
pub mod optimizer;
pub mod session;
pub mod trace;

mod candidate;

pub mod algorithms {
    pub mod ecca;
    pub mod genetic;
    pub mod influence_pso;
    pub mod modified_pso;
    pub mod pso;

    mod ops;

    pub use ops::StrategyKind;
}

pub use candidate::Candidate;
pub use config::OptimizerConfig;
pub use coverage::{CoverageEngine, CoverageInfo, Region};
pub use error::{ConfigError, Error};
pub use fitness::{Evaluator, Fitness, FitnessModel};
pub use optimizer::{Elites, Optimizer, RoundReport, SearchContext};
pub use session::Session;
pub use trace::{LearningTrace, TraceEntry};

/// Stable external identifier of a sensor node.
pub type NodeId = u32;

/// A per-generation move/selection rule driven by [`Optimizer`].
///
/// The optimizer owns the population, the elites and the random generator;
/// a strategy only rewrites the population through the [`SearchContext`]
/// it receives.
pub trait Strategy {
    fn name(&self) -> &'static str;

    /// Called once per run after the initial population is evaluated.
    fn prepare(&mut self, _ctx: &mut SearchContext<'_>) {}

    /// Advances the population by one generation.
    fn step(&mut self, ctx: &mut SearchContext<'_>);

    /// Multi-objective strategies track their own elite; the optimizer then
    /// skips its per-generation elite update.
    fn is_multi_objective(&self) -> bool {
        false
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn prepare(&mut self, ctx: &mut SearchContext<'_>) {
        (**self).prepare(ctx)
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) {
        (**self).step(ctx)
    }

    fn is_multi_objective(&self) -> bool {
        (**self).is_multi_objective()
    }
}
