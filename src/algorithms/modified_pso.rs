//! Velocity-free swarm.
//!
//! Particles drift by mutation and by copying genes from the bests: early in
//! the run they mostly follow their own local best, later mostly the global
//! best.

use super::ops::{blend_from, flip_count, flip_distinct};
use crate::{SearchContext, Strategy};
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct ModifiedPso {
    scratch: Vec<usize>,
}

impl Strategy for ModifiedPso {
    fn name(&self) -> &'static str {
        "ModifiedPso"
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) {
        let Some(global) = ctx.elites.global() else {
            return;
        };
        let can_sleep = ctx.can_sleep();
        let mutations = flip_count(can_sleep.len(), ctx.mutation_rate());
        let follow_local = 1.0 - ctx.progress();
        let follow_global = ctx.progress();

        let mut staged = Vec::with_capacity(ctx.population.len());
        for (slot, particle) in ctx.population.iter().enumerate() {
            let mut genes = particle.genes().to_vec();
            flip_distinct(&mut genes, can_sleep, mutations, &mut self.scratch, ctx.rng);
            if ctx.rng.random::<f32>() < follow_local {
                let local = ctx.elites.local(slot).unwrap_or(particle);
                blend_from(&mut genes, local.genes(), can_sleep, ctx.rng);
            }
            if ctx.rng.random::<f32>() < follow_global {
                blend_from(&mut genes, global.genes(), can_sleep, ctx.rng);
            }
            staged.push(genes);
        }
        ctx.reevaluate(staged);
    }
}
