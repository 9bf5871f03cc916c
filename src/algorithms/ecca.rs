//! Elitist multi-objective search in the NSGA-II family.
//!
//! Objectives are the energy term (`term1`) and the coverage term (`term2`),
//! each only when its weight is non-zero; the overlap term never takes part
//! in dominance or crowding. Each generation the previous children are
//! merged into the population, the merged set is sorted into non-dominated
//! fronts, and the best `population_size` candidates are kept front by
//! front, the overflowing front by descending crowding distance. Neighbours in the kept order are
//! then crossed over to produce the next children.

use super::ops::cmp_f32_nan_last;
use crate::candidate::Candidate;
use crate::config::{DominanceRule, FitnessWeights};
use crate::fitness::Fitness;
use crate::{SearchContext, Strategy};

#[derive(Debug, Clone, Default)]
pub struct Ecca {
    children: Vec<Candidate>,
}

type Objective = fn(&Fitness) -> f32;

/// Accessors of `term1` and `term2`, skipping a zero-weighted one.
fn objectives(weights: &FitnessWeights) -> impl Iterator<Item = Objective> {
    let all: [(f32, Objective); 2] = [
        (weights.alpha, |f: &Fitness| f.term1),
        (weights.beta, |f: &Fitness| f.term2),
    ];
    all.into_iter()
        .filter(|(weight, _)| *weight != 0.0)
        .map(|(_, get)| get)
}

/// Whether `a` dominates `b` on the weighted objectives.
///
/// Always `false` when neither `alpha` nor `beta` is set, and for `a == b`.
pub fn dominates(a: &Fitness, b: &Fitness, weights: &FitnessWeights, rule: DominanceRule) -> bool {
    let mut compared = false;
    let mut better_in_all = true;
    let mut better_in_any = false;
    let mut worse_in_any = false;
    for get in objectives(weights) {
        let (oa, ob) = (get(a), get(b));
        compared = true;
        if oa > ob {
            better_in_any = true;
        } else {
            better_in_all = false;
        }
        if oa < ob {
            worse_in_any = true;
        }
    }
    compared
        && match rule {
            DominanceRule::StrictAll => better_in_all,
            DominanceRule::Pareto => better_in_any && !worse_in_any,
        }
}

/// Splits `population` into fronts of indices, front 0 being non-dominated.
pub fn fast_non_dominated_sort(
    population: &[Candidate],
    weights: &FitnessWeights,
    rule: DominanceRule,
) -> Vec<Vec<usize>> {
    let n = population.len();
    let mut fronts = vec![vec![]];
    let mut domination_count = vec![0usize; n];
    let mut dominated_indices = vec![vec![]; n];

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let (fi, fj) = (population[i].fitness(), population[j].fitness());
            if dominates(fi, fj, weights, rule) {
                dominated_indices[i].push(j);
            } else if dominates(fj, fi, weights, rule) {
                domination_count[i] += 1;
            }
        }
        if domination_count[i] == 0 {
            fronts[0].push(i);
        }
    }

    let mut curr = 0;
    while curr < fronts.len() && !fronts[curr].is_empty() {
        let mut next_front = vec![];
        for &i in &fronts[curr] {
            for &j in &dominated_indices[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next_front.push(j);
                }
            }
        }
        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
        curr += 1;
    }
    fronts
}

/// Assigns crowding distances within one front. The front is left sorted
/// by its last weighted objective.
pub fn calculate_crowding_distance(front: &mut [Candidate], weights: &FitnessWeights) {
    let n = front.len();
    for candidate in front.iter_mut() {
        candidate.crowding_distance = 0.0;
    }
    let getters: Vec<Objective> = objectives(weights).collect();
    if n <= 2 || getters.is_empty() {
        for candidate in front {
            candidate.crowding_distance = f32::INFINITY;
        }
        return;
    }

    for get in getters {
        front.sort_by(|a, b| cmp_f32_nan_last(get(a.fitness()), get(b.fitness())));
        let range = get(front[n - 1].fitness()) - get(front[0].fitness());
        front[0].crowding_distance = f32::INFINITY;
        front[n - 1].crowding_distance = f32::INFINITY;
        if range > 0.0 {
            for i in 1..(n - 1) {
                if front[i].crowding_distance != f32::INFINITY {
                    front[i].crowding_distance +=
                        (get(front[i + 1].fitness()) - get(front[i - 1].fitness())) / range;
                }
            }
        }
    }
}

/// Keeps at most `quota` candidates, whole fronts first.
///
/// Ranks and crowding distances are written on the kept candidates.
pub fn find_best_parents(
    population: Vec<Candidate>,
    fronts: &[Vec<usize>],
    quota: usize,
    weights: &FitnessWeights,
) -> Vec<Candidate> {
    let mut slots: Vec<Option<Candidate>> = population.into_iter().map(Some).collect();
    let mut selected = Vec::with_capacity(quota);
    for (rank, indices) in fronts.iter().enumerate() {
        let mut front: Vec<Candidate> = indices.iter().filter_map(|&i| slots[i].take()).collect();
        for candidate in &mut front {
            candidate.rank = rank;
        }
        calculate_crowding_distance(&mut front, weights);
        if selected.len() + front.len() <= quota {
            selected.extend(front);
        } else {
            front.sort_by(|a, b| cmp_f32_nan_last(b.crowding_distance, a.crowding_distance));
            selected.extend(front.into_iter().take(quota - selected.len()));
            break;
        }
    }
    selected
}

impl Ecca {
    /// Children produced by the last generation, merged at the next one.
    pub fn children(&self) -> &[Candidate] {
        &self.children
    }

    fn reproduce(&mut self, ctx: &mut SearchContext<'_>) {
        self.children.clear();
        let parents = &ctx.population;
        let n = parents.len();
        if n == 0 {
            return;
        }
        let config = ctx.config;
        let mut i = 0;
        while self.children.len() < config.population_size {
            let idx = i % n;
            let mate = if idx + 1 < n { idx + 1 } else { idx.saturating_sub(1) };
            self.children.push(Candidate::offspring(
                &parents[idx],
                &parents[mate],
                config.ecca_crossover_rate,
                config.parent_blend,
                ctx.rng,
                &ctx.evaluator,
            ));
            i += 1;
        }
    }
}

impl Strategy for Ecca {
    fn name(&self) -> &'static str {
        "Ecca"
    }

    fn prepare(&mut self, _ctx: &mut SearchContext<'_>) {
        self.children.clear();
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) {
        let weights = ctx.config.weights;
        let rule = ctx.config.dominance;

        let mut merged = std::mem::take(&mut *ctx.population);
        merged.append(&mut self.children);
        let fronts = fast_non_dominated_sort(&merged, &weights, rule);
        if let Some(front) = fronts.first() {
            for &i in front {
                ctx.elites.offer_global(&merged[i]);
            }
        }
        *ctx.population = find_best_parents(merged, &fronts, ctx.config.population_size, &weights);

        self.reproduce(ctx);
    }

    fn is_multi_objective(&self) -> bool {
        true
    }
}
