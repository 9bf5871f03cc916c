use crate::config::ParentBlend;
use crate::fitness::{Evaluator, Fitness};
use crate::session::Session;
use rand::Rng;
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One sleep assignment (`true` = sleep) and its cached fitness.
///
/// Genes can only be replaced through [`Candidate::set_genes`], which
/// re-evaluates, so the cached fitness always matches the genes. For the
/// same reason a candidate can be serialized but not deserialized; rebuild
/// one from stored genes with [`Candidate::from_genes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    genes: Vec<bool>,
    fitness: Fitness,
    /// Front index assigned by non-dominated sorting (0 = non-dominated).
    pub rank: usize,
    /// Crowding distance within its front (higher is more isolated).
    pub crowding_distance: f32,
}

impl Candidate {
    /// Draws genes uniformly for every node that may sleep; dead and pinned
    /// nodes stay awake.
    pub fn sample_genes<R: Rng>(rng: &mut R, session: &Session) -> Vec<bool> {
        let mut genes = vec![false; session.node_count()];
        for &idx in session.can_sleep() {
            genes[idx] = rng.random_bool(0.5);
        }
        genes
    }

    pub fn from_genes(genes: Vec<bool>, evaluator: &Evaluator<'_>) -> Self {
        let fitness = evaluator.evaluate(&genes);
        Self {
            genes,
            fitness,
            rank: 0,
            crowding_distance: 0.0,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_fitness(genes: Vec<bool>, fitness: Fitness) -> Self {
        Self {
            genes,
            fitness,
            rank: 0,
            crowding_distance: 0.0,
        }
    }

    pub fn random<R: Rng>(rng: &mut R, evaluator: &Evaluator<'_>) -> Self {
        let genes = Self::sample_genes(rng, evaluator.session());
        Self::from_genes(genes, evaluator)
    }

    /// Produces a child of `father` and `mother`.
    ///
    /// With probability `1 - crossover_rate` the father passes through
    /// unchanged, fitness included. Otherwise the child's genes are drawn
    /// according to `blend`, every gene that may sleep is flipped with
    /// probability `1 / gene_count`, and the child is evaluated.
    pub fn offspring<R: Rng>(
        father: &Candidate,
        mother: &Candidate,
        crossover_rate: f32,
        blend: ParentBlend,
        rng: &mut R,
        evaluator: &Evaluator<'_>,
    ) -> Self {
        if rng.random::<f32>() >= crossover_rate {
            return father.clone();
        }

        let session = evaluator.session();
        let mut genes = vec![false; father.genes.len()];
        for &idx in session.can_sleep() {
            let from_father = rng.random_bool(0.5);
            genes[idx] = match blend {
                ParentBlend::Father => father.genes[idx],
                ParentBlend::Uniform if from_father => father.genes[idx],
                ParentBlend::Uniform => mother.genes[idx],
            };
        }

        let flip_probability = 1.0 / genes.len() as f32;
        for &idx in session.can_sleep() {
            if rng.random::<f32>() < flip_probability {
                genes[idx] = !genes[idx];
            }
        }
        Self::from_genes(genes, evaluator)
    }

    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    pub fn into_genes(self) -> Vec<bool> {
        self.genes
    }

    pub fn fitness(&self) -> &Fitness {
        &self.fitness
    }

    pub fn sleeping(&self) -> usize {
        self.genes.iter().filter(|&&g| g).count()
    }

    /// Replaces the genes and re-evaluates.
    pub fn set_genes(&mut self, genes: Vec<bool>, evaluator: &Evaluator<'_>) {
        debug_assert_eq!(genes.len(), self.genes.len());
        self.fitness = evaluator.evaluate(&genes);
        self.genes = genes;
    }
}

/// Evaluates a batch of gene vectors, in parallel with the `parallel` feature.
pub(crate) fn evaluate_batch(batch: Vec<Vec<bool>>, evaluator: &Evaluator<'_>) -> Vec<Candidate> {
    #[cfg(feature = "parallel")]
    let candidates = batch
        .into_par_iter()
        .map(|genes| Candidate::from_genes(genes, evaluator))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let candidates = batch
        .into_iter()
        .map(|genes| Candidate::from_genes(genes, evaluator))
        .collect();
    candidates
}

/// Replaces every candidate's genes with the staged ones, slot by slot.
pub(crate) fn reevaluate_all(
    population: &mut [Candidate],
    staged: Vec<Vec<bool>>,
    evaluator: &Evaluator<'_>,
) {
    debug_assert_eq!(population.len(), staged.len());
    #[cfg(feature = "parallel")]
    population
        .par_iter_mut()
        .zip(staged.into_par_iter())
        .for_each(|(candidate, genes)| candidate.set_genes(genes, evaluator));
    #[cfg(not(feature = "parallel"))]
    for (candidate, genes) in population.iter_mut().zip(staged) {
        candidate.set_genes(genes, evaluator);
    }
}
