//! The generational loop shared by every strategy.
//!
//! An [`Optimizer`] is built once per cluster with the static coverage
//! model and reused every round. Each [`Optimizer::run`]:
//!
//! 1. clears the learning trace
//! 2. builds a [`Session`] from the round's energies
//! 3. samples and evaluates a fresh population
//! 4. seeds the elites from it
//! 5. runs `max_iterations` generations of the plugged [`Strategy`]
//! 6. returns the genes of the best candidate found
//!
//! Elite updates happen after each generation, in population order, so a
//! run is reproducible for a fixed seed whether or not fitness evaluation
//! is parallel.

use crate::candidate::{Candidate, evaluate_batch, reevaluate_all};
use crate::config::OptimizerConfig;
use crate::coverage::CoverageEngine;
use crate::fitness::{Evaluator, FitnessModel};
use crate::session::Session;
use crate::trace::LearningTrace;
use crate::{Error, NodeId, Strategy};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Best candidates of the current run.
#[derive(Debug, Clone, Default)]
pub struct Elites {
    global: Option<Candidate>,
    locals: Vec<Candidate>,
}

impl Elites {
    /// Every slot starts as its own local best.
    pub fn seed(population: &[Candidate]) -> Self {
        let mut elites = Self {
            global: None,
            locals: population.to_vec(),
        };
        for candidate in population {
            elites.offer_global(candidate);
        }
        elites
    }

    pub fn global(&self) -> Option<&Candidate> {
        self.global.as_ref()
    }

    pub fn best_total(&self) -> Option<f32> {
        self.global.as_ref().map(|c| c.fitness().total)
    }

    pub fn local(&self, slot: usize) -> Option<&Candidate> {
        self.locals.get(slot)
    }

    /// Replaces the global best if `candidate` is strictly better.
    pub fn offer_global(&mut self, candidate: &Candidate) -> bool {
        let improved = self
            .global
            .as_ref()
            .is_none_or(|best| candidate.fitness().total > best.fitness().total);
        if improved {
            self.global = Some(candidate.clone());
        }
        improved
    }

    /// Offers `candidate` as the best of `slot` and as the global best.
    pub fn offer(&mut self, slot: usize, candidate: &Candidate) -> bool {
        if slot == self.locals.len() {
            self.locals.push(candidate.clone());
        } else if let Some(local) = self.locals.get_mut(slot) {
            if candidate.fitness().total > local.fitness().total {
                *local = candidate.clone();
            }
        }
        self.offer_global(candidate)
    }

    pub fn update_from(&mut self, population: &[Candidate]) {
        for (slot, candidate) in population.iter().enumerate() {
            self.offer(slot, candidate);
        }
    }
}

/// Everything a [`Strategy`] may touch during one generation.
pub struct SearchContext<'a> {
    pub config: &'a OptimizerConfig,
    pub evaluator: Evaluator<'a>,
    pub rng: &'a mut Pcg64,
    pub population: &'a mut Vec<Candidate>,
    pub elites: &'a mut Elites,
    pub iteration: usize,
}

impl<'a> SearchContext<'a> {
    pub fn session(&self) -> &'a Session {
        self.evaluator.session()
    }

    pub fn can_sleep(&self) -> &'a [usize] {
        self.evaluator.session().can_sleep()
    }

    /// `iteration / max_iterations`, in `[0, 1)`.
    pub fn progress(&self) -> f32 {
        if self.config.max_iterations == 0 {
            return 0.0;
        }
        self.iteration as f32 / self.config.max_iterations as f32
    }

    /// Linear interpolation from `high` at the first generation towards `low`.
    pub fn annealed(&self, high: f32, low: f32) -> f32 {
        high - (high - low) * self.progress()
    }

    /// Mutation rate annealed from `wmax` to `wmin`.
    pub fn mutation_rate(&self) -> f32 {
        self.annealed(self.config.wmax, self.config.wmin)
    }

    /// Writes staged gene vectors back into the population and re-evaluates.
    pub fn reevaluate(&mut self, staged: Vec<Vec<bool>>) {
        self.reevaluate_from(0, staged);
    }

    /// Like [`reevaluate`](Self::reevaluate) for the slots starting at `first`.
    pub fn reevaluate_from(&mut self, first: usize, staged: Vec<Vec<bool>>) {
        reevaluate_all(&mut self.population[first..], staged, &self.evaluator);
    }
}

/// Summary of the last round, as logged by a host simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub coverage: f32,
    pub overlapping: f32,
    /// Sleeping nodes over alive nodes.
    pub sleeping_ratio: f32,
    pub initial_fitness: f32,
    pub final_fitness: f32,
}

/// Population-based sleep scheduler driven by a [`Strategy`].
///
/// `run` takes `&mut self`: one instance serves one round at a time.
pub struct Optimizer<S> {
    engine: CoverageEngine,
    strategy: S,
    config: OptimizerConfig,
    rng: Pcg64,
    population: Vec<Candidate>,
    elites: Elites,
    trace: LearningTrace,
    session: Option<Session>,
}

impl<S: Strategy> Optimizer<S> {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `config` does not validate.
    pub fn new(engine: CoverageEngine, strategy: S, config: OptimizerConfig) -> Result<Self, Error> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            engine,
            strategy,
            config,
            rng,
            population: Vec::new(),
            elites: Elites::default(),
            trace: LearningTrace::default(),
            session: None,
        })
    }

    /// Restarts the random generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg64::seed_from_u64(seed);
    }

    /// Searches a sleep assignment for this round.
    ///
    /// `energies` is aligned with the engine's node ordering, `0.0` meaning
    /// dead. `head`, if given, is kept awake. The returned vector holds
    /// `true` for every node that should sleep; dead and pinned nodes are
    /// always `false`.
    #[instrument(
        level = "debug",
        skip(self, energies, head),
        fields(strategy = self.strategy.name(), nodes = energies.len())
    )]
    pub fn run(&mut self, energies: &[f32], head: Option<NodeId>) -> Result<Vec<bool>, Error> {
        self.trace.clear();
        let session = Session::new(&self.engine, energies, head)?;
        if session.alive_count() == 0 {
            tracing::warn!("every node is dead, nothing to schedule");
        }

        let evaluator = Evaluator::new(&self.engine, &session, FitnessModel::from_config(&self.config));
        let batch = (0..self.config.population_size)
            .map(|_| Candidate::sample_genes(&mut self.rng, &session))
            .collect();
        self.population = evaluate_batch(batch, &evaluator);
        self.elites = Elites::seed(&self.population);

        let multi_objective = self.strategy.is_multi_objective();
        let mut ctx = SearchContext {
            config: &self.config,
            evaluator,
            rng: &mut self.rng,
            population: &mut self.population,
            elites: &mut self.elites,
            iteration: 0,
        };
        self.strategy.prepare(&mut ctx);

        for iteration in 0..self.config.max_iterations {
            ctx.iteration = iteration;
            if let Some(best) = ctx.elites.global() {
                self.trace.push(iteration, best.fitness());
            }
            self.strategy.step(&mut ctx);
            if !multi_objective {
                ctx.elites.update_from(&ctx.population[..]);
            }
            tracing::trace!(
                iteration,
                best = ctx.elites.best_total().unwrap_or_default(),
                "generation finished"
            );
        }

        let best = self
            .elites
            .global()
            .map(|c| c.genes().to_vec())
            .unwrap_or_else(|| vec![false; session.node_count()]);
        tracing::debug!(
            best = self.elites.best_total().unwrap_or_default(),
            sleeping = best.iter().filter(|&&g| g).count(),
            alive = session.alive_count(),
            "round scheduled"
        );
        self.session = Some(session);
        Ok(best)
    }

    pub fn engine(&self) -> &CoverageEngine {
        &self.engine
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Population left by the last run.
    pub fn population(&self) -> &[Candidate] {
        &self.population
    }

    /// Session of the last run.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Best candidate of the last run.
    pub fn best(&self) -> Option<&Candidate> {
        self.elites.global()
    }

    pub fn learning_trace(&self) -> &LearningTrace {
        &self.trace
    }

    /// `partial_coverage / total_coverage` of the best candidate, 0 if undefined.
    pub fn best_coverage(&self) -> f32 {
        self.best()
            .map(|c| c.fitness().coverage)
            .filter(|info| info.total_coverage != 0.0)
            .map_or(0.0, |info| info.partial_coverage / info.total_coverage)
    }

    /// `partial_overlapping / total_overlapping` of the best candidate, 0 if undefined.
    pub fn best_overlapping(&self) -> f32 {
        self.best()
            .map(|c| c.fitness().coverage)
            .filter(|info| info.total_overlapping != 0.0)
            .map_or(0.0, |info| info.partial_overlapping / info.total_overlapping)
    }

    /// Summary of the last run, `None` before the first one.
    pub fn report(&self) -> Option<RoundReport> {
        let best = self.best()?;
        let session = self.session.as_ref()?;
        let sleeping_ratio = match session.alive_count() {
            0 => 0.0,
            alive => best.sleeping() as f32 / alive as f32,
        };
        Some(RoundReport {
            coverage: self.best_coverage(),
            overlapping: self.best_overlapping(),
            sleeping_ratio,
            initial_fitness: self.trace.first().map_or(best.fitness().total, |e| e.total),
            final_fitness: best.fitness().total,
        })
    }
}
