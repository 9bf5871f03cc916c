//! Truncation genetic algorithm.
//!
//! Each generation the population is sorted by descending fitness. The
//! top `1 - selection_rate` fraction survives unchanged; every other slot
//! is rebuilt from two parents drawn among the survivors and then mutated.
//!
//! Both rates are annealed over the run: crossover goes from 1 to 0 and
//! mutation from `wmax` to `wmin`. When the best fitness has not moved for
//! `stagnation_limit` generations, mutation jumps to 1.0 so the rebuilt
//! slots land far from the current optimum.

use super::ops::{cmp_f32_nan_last, flip_count, flip_distinct};
use crate::{SearchContext, Strategy};
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct GeneticAlgorithm {
    last_best: Option<f32>,
    stagnant: usize,
    scratch: Vec<usize>,
}

impl GeneticAlgorithm {
    /// Generations the best fitness has stayed unchanged.
    pub fn stagnant_generations(&self) -> usize {
        self.stagnant
    }

    fn sort_population(ctx: &mut SearchContext<'_>) {
        ctx.population
            .sort_by(|a, b| cmp_f32_nan_last(b.fitness().total, a.fitness().total));
    }
}

impl Strategy for GeneticAlgorithm {
    fn name(&self) -> &'static str {
        "GeneticAlgorithm"
    }

    fn prepare(&mut self, ctx: &mut SearchContext<'_>) {
        self.last_best = None;
        self.stagnant = 0;
        Self::sort_population(ctx);
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) {
        let best = ctx.elites.best_total();
        if best == self.last_best {
            self.stagnant += 1;
        } else {
            self.stagnant = 0;
            self.last_best = best;
        }

        let mutation_rate = if self.stagnant >= ctx.config.stagnation_limit {
            1.0
        } else {
            ctx.mutation_rate()
        };
        let crossover_rate = 1.0 - ctx.progress();
        let can_sleep = ctx.can_sleep();
        let mutations = flip_count(can_sleep.len(), mutation_rate);

        Self::sort_population(ctx);
        let size = ctx.population.len();
        let unfit = ((ctx.config.selection_rate * size as f32) as usize).min(size.saturating_sub(1));
        let survivors = size - unfit;

        let mut staged = Vec::with_capacity(unfit);
        for slot in survivors..size {
            let mut genes = ctx.population[slot].genes().to_vec();
            if ctx.rng.random::<f32>() < crossover_rate {
                // father and mother may be the same individual
                let father = ctx.population[ctx.rng.random_range(0..survivors)].genes();
                let mother = ctx.population[ctx.rng.random_range(0..survivors)].genes();
                for &idx in can_sleep {
                    genes[idx] = if ctx.rng.random_bool(0.5) {
                        father[idx]
                    } else {
                        mother[idx]
                    };
                }
            }
            flip_distinct(&mut genes, can_sleep, mutations, &mut self.scratch, ctx.rng);
            staged.push(genes);
        }
        ctx.reevaluate_from(survivors, staged);

        Self::sort_population(ctx);
    }
}
