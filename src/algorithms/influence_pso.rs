//! Swarm driven by gene-wise influence.
//!
//! A particle copies each gene on which it disagrees with an influencer,
//! with a per-particle influence rate. Local bests dominate early and the
//! global best late. The particle then moves by flipping a decreasing
//! number of distinct genes.

use super::ops::{flip_count, flip_distinct};
use crate::{SearchContext, Strategy};
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct InfluencePso {
    scratch: Vec<usize>,
}

/// Copies into `target` each gene where `original` and `influencer`
/// disagree, with probability `rate`.
fn influence<R: Rng>(
    original: &[bool],
    influencer: &[bool],
    target: &mut [bool],
    can_sleep: &[usize],
    rate: f32,
    rng: &mut R,
) {
    for &idx in can_sleep {
        if original[idx] != influencer[idx] && rng.random::<f32>() < rate {
            target[idx] = influencer[idx];
        }
    }
}

impl Strategy for InfluencePso {
    fn name(&self) -> &'static str {
        "InfluencePso"
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) {
        let Some(global) = ctx.elites.global() else {
            return;
        };
        let can_sleep = ctx.can_sleep();
        let moves = flip_count(can_sleep.len(), ctx.mutation_rate());
        let phi1 = 1.0 - ctx.progress();
        let phi2 = 1.0 - phi1;

        let mut staged = Vec::with_capacity(ctx.population.len());
        for (slot, particle) in ctx.population.iter().enumerate() {
            let r1: f32 = ctx.rng.random();
            let r2: f32 = ctx.rng.random();
            let original = particle.genes();
            let local = ctx.elites.local(slot).unwrap_or(particle);

            let mut genes = original.to_vec();
            influence(original, local.genes(), &mut genes, can_sleep, phi1 * r1, ctx.rng);
            influence(original, global.genes(), &mut genes, can_sleep, phi2 * r2, ctx.rng);
            flip_distinct(&mut genes, can_sleep, moves, &mut self.scratch, ctx.rng);
            staged.push(genes);
        }
        ctx.reevaluate(staged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_influence_copies_only_disagreeing_genes() {
        let mut rng = Pcg64::seed_from_u64(3);
        let original = [false, true, false, true];
        let influencer = [true, true, true, false];
        let mut target = original.to_vec();
        influence(&original, &influencer, &mut target, &[0, 1, 2], 1.0, &mut rng);
        assert_eq!(target, vec![true, true, true, true]);
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let mut rng = Pcg64::seed_from_u64(3);
        let original = [false, true];
        let mut target = original.to_vec();
        influence(&original, &[true, false], &mut target, &[0, 1], 0.0, &mut rng);
        assert_eq!(target, original.to_vec());
    }
}
