//! Gene operators shared by the strategies.

use super::ecca::Ecca;
use super::genetic::GeneticAlgorithm;
use super::influence_pso::InfluencePso;
use super::modified_pso::ModifiedPso;
use super::pso::Pso;
use crate::Strategy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Compare two f32 values, treating NaN as less than all other values.
pub(crate) fn cmp_f32_nan_last(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Number of genes to flip for a given rate: `floor(len * rate)`, capped at `len`.
pub(crate) fn flip_count(len: usize, rate: f32) -> usize {
    ((len as f32 * rate.clamp(0.0, 1.0)) as usize).min(len)
}

/// Flips `count` distinct genes drawn uniformly from `can_sleep`.
///
/// `scratch` is reused between calls to avoid reallocating the index pool.
/// Each draw swaps the chosen index to the end of the live pool and shrinks it.
pub(crate) fn flip_distinct<R: Rng>(
    genes: &mut [bool],
    can_sleep: &[usize],
    count: usize,
    scratch: &mut Vec<usize>,
    rng: &mut R,
) {
    scratch.clear();
    scratch.extend_from_slice(can_sleep);
    let mut live = scratch.len();
    for _ in 0..count.min(live) {
        let pick = rng.random_range(0..live);
        let gene = scratch[pick];
        genes[gene] = !genes[gene];
        scratch.swap(pick, live - 1);
        live -= 1;
    }
}

/// Overwrites each gene of `can_sleep` with `source`'s value with probability 0.5.
pub(crate) fn blend_from<R: Rng>(genes: &mut [bool], source: &[bool], can_sleep: &[usize], rng: &mut R) {
    for &idx in can_sleep {
        if rng.random_bool(0.5) {
            genes[idx] = source[idx];
        }
    }
}

/// Logistic function used to turn a velocity into a probability.
pub(crate) fn sigmoid(v: f32) -> f32 {
    1.0 / (1.0 + (-v).exp())
}

/// Strategy selection by name, as found in simulation configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    GeneticAlgorithm,
    Pso,
    ModifiedPso,
    InfluencePso,
    Ecca,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn Strategy + Send> {
        match self {
            StrategyKind::GeneticAlgorithm => Box::new(GeneticAlgorithm::default()),
            StrategyKind::Pso => Box::new(Pso::default()),
            StrategyKind::ModifiedPso => Box::new(ModifiedPso::default()),
            StrategyKind::InfluencePso => Box::new(InfluencePso::default()),
            StrategyKind::Ecca => Box::new(Ecca::default()),
        }
    }
}
