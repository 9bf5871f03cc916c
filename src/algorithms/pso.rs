//! Binary particle swarm optimisation.
//!
//! Each particle keeps one real-valued velocity per gene. The velocity is
//! pulled towards the global and local bests, and the gene is resampled as
//! `sleep` with probability `sigmoid(velocity)`.

use super::ops::sigmoid;
use crate::{SearchContext, Strategy};
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct Pso {
    velocity: Vec<Vec<f32>>,
}

impl Pso {
    pub fn velocities(&self) -> &[Vec<f32>] {
        &self.velocity
    }
}

impl Strategy for Pso {
    fn name(&self) -> &'static str {
        "Pso"
    }

    fn prepare(&mut self, ctx: &mut SearchContext<'_>) {
        let genes = ctx.session().node_count();
        self.velocity = (0..ctx.population.len())
            .map(|_| (0..genes).map(|_| ctx.rng.random_range(-0.5..0.5)).collect())
            .collect();
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) {
        let Some(global) = ctx.elites.global() else {
            return;
        };
        let coeffs = ctx.config.pso;
        let can_sleep = ctx.can_sleep();

        let mut staged = Vec::with_capacity(ctx.population.len());
        for (slot, particle) in ctx.population.iter().enumerate() {
            let local = ctx.elites.local(slot).unwrap_or(particle);
            let velocity = &mut self.velocity[slot];
            let mut genes = particle.genes().to_vec();
            for &idx in can_sleep {
                let x = f32::from(u8::from(genes[idx]));
                let g = f32::from(u8::from(global.genes()[idx]));
                let l = f32::from(u8::from(local.genes()[idx]));
                let r1: f32 = ctx.rng.random();
                let r2: f32 = ctx.rng.random();
                velocity[idx] =
                    coeffs.inertia * velocity[idx] + coeffs.phi1 * r1 * (g - x) + coeffs.phi2 * r2 * (l - x);
                genes[idx] = ctx.rng.random::<f32>() < sigmoid(velocity[idx]);
            }
            staged.push(genes);
        }
        ctx.reevaluate(staged);
    }
}
