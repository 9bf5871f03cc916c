use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::Rng;
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;
use symbios_coverage::algorithms::StrategyKind;
use symbios_coverage::algorithms::ecca::{calculate_crowding_distance, fast_non_dominated_sort};
use symbios_coverage::config::DominanceRule;
use symbios_coverage::geometry::{FieldGrid, SensorDisk, rasterize};
use symbios_coverage::{
    Candidate, CoverageEngine, Evaluator, FitnessModel, Optimizer, OptimizerConfig, Session,
};

// =============================================================================
// Helper functions
// =============================================================================

/// Square field with `side * side` sensors on a regular lattice.
fn lattice_field(side: u32, seed: u64) -> (CoverageEngine, Vec<f32>) {
    let grid = FieldGrid::new(100.0, 100.0, 1.0).unwrap();
    let step = 100.0 / side as f32;
    let disks: Vec<SensorDisk> = (0..side * side)
        .map(|i| SensorDisk {
            id: i,
            x: (i % side) as f32 * step + step / 2.0,
            y: (i / side) as f32 * step + step / 2.0,
        })
        .collect();
    let map = rasterize(&grid, &disks, step).unwrap();
    let ids = disks.iter().map(|d| d.id).collect();
    let mut rng = Pcg64::seed_from_u64(seed);
    let energies = (0..side * side).map(|_| rng.random_range(0.1..2.0)).collect();
    (CoverageEngine::from_region_map(ids, &map).unwrap(), energies)
}

fn random_genes(size: usize, nodes: usize, seed: u64) -> Vec<Vec<bool>> {
    let mut rng = Pcg64::seed_from_u64(seed);
    (0..size)
        .map(|_| (0..nodes).map(|_| rng.random_bool(0.5)).collect())
        .collect()
}

// =============================================================================
// Coverage engine
// =============================================================================

fn bench_coverage(c: &mut Criterion) {
    let mut group = c.benchmark_group("CoverageEngine/coverage");

    for side in [5u32, 10, 15].iter() {
        let nodes = (side * side) as usize;
        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), side, |b, &side| {
            let (engine, _) = lattice_field(side, 42);
            let alive = vec![true; nodes];
            let totals = engine.init_session(&alive);
            let genes = random_genes(1, nodes, 42).remove(0);
            b.iter(|| black_box(engine.coverage(&genes, &alive, totals)));
        });
    }
    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Geometry/rasterize");

    for precision in [2.0f32, 1.0, 0.5].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(precision),
            precision,
            |b, &precision| {
                let grid = FieldGrid::new(100.0, 100.0, precision).unwrap();
                let disks: Vec<SensorDisk> = (0..100)
                    .map(|i| SensorDisk {
                        id: i,
                        x: (i % 10) as f32 * 10.0 + 5.0,
                        y: (i / 10) as f32 * 10.0 + 5.0,
                    })
                    .collect();
                b.iter(|| black_box(rasterize(&grid, &disks, 10.0).unwrap()));
            },
        );
    }
    group.finish();
}

// =============================================================================
// Strategy rounds
// =============================================================================

fn bench_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("Optimizer/run");
    let (engine, energies) = lattice_field(10, 42);

    for kind in [
        StrategyKind::GeneticAlgorithm,
        StrategyKind::Pso,
        StrategyKind::ModifiedPso,
        StrategyKind::InfluencePso,
        StrategyKind::Ecca,
    ] {
        group.bench_function(format!("{kind:?}"), |b| {
            let config = OptimizerConfig {
                population_size: 20,
                max_iterations: 20,
                seed: Some(42),
                ..OptimizerConfig::default()
            };
            let mut optimizer = Optimizer::new(engine.clone(), kind.build(), config).unwrap();
            b.iter(|| black_box(optimizer.run(&energies, None).unwrap()));
        });
    }
    group.finish();
}

fn bench_population_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Optimizer/population_size");
    let (engine, energies) = lattice_field(10, 42);

    for pop_size in [10, 50, 100].iter() {
        group.throughput(Throughput::Elements(*pop_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pop_size), pop_size, |b, &size| {
            let config = OptimizerConfig {
                population_size: size,
                max_iterations: 10,
                seed: Some(42),
                ..OptimizerConfig::default()
            };
            let mut optimizer =
                Optimizer::new(engine.clone(), StrategyKind::GeneticAlgorithm.build(), config).unwrap();
            b.iter(|| black_box(optimizer.run(&energies, None).unwrap()));
        });
    }
    group.finish();
}

// =============================================================================
// Ecca sorting
// =============================================================================

fn bench_non_dominated_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ecca/non_dominated_sort");
    let (engine, energies) = lattice_field(8, 42);
    let session = Session::new(&engine, &energies, None).unwrap();
    let config = OptimizerConfig::default();
    let evaluator = Evaluator::new(&engine, &session, FitnessModel::from_config(&config));

    for pop_size in [50, 100, 200].iter() {
        group.throughput(Throughput::Elements(*pop_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pop_size), pop_size, |b, &size| {
            let population: Vec<Candidate> = random_genes(size, engine.node_count(), 42)
                .into_iter()
                .map(|genes| Candidate::from_genes(genes, &evaluator))
                .collect();
            b.iter(|| {
                black_box(fast_non_dominated_sort(
                    &population,
                    &config.weights,
                    DominanceRule::Pareto,
                ))
            });
        });
    }
    group.finish();
}

fn bench_crowding_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ecca/crowding_distance");
    let (engine, energies) = lattice_field(8, 42);
    let session = Session::new(&engine, &energies, None).unwrap();
    let config = OptimizerConfig::default();
    let evaluator = Evaluator::new(&engine, &session, FitnessModel::from_config(&config));

    for front_size in [20, 50, 100].iter() {
        group.throughput(Throughput::Elements(*front_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(front_size),
            front_size,
            |b, &size| {
                let mut front: Vec<Candidate> = random_genes(size, engine.node_count(), 42)
                    .into_iter()
                    .map(|genes| Candidate::from_genes(genes, &evaluator))
                    .collect();
                b.iter(|| {
                    calculate_crowding_distance(&mut front, &config.weights);
                    black_box(front.len())
                });
            },
        );
    }
    group.finish();
}

// =============================================================================
// Criterion setup
// =============================================================================

criterion_group!(
    coverage_benches,
    bench_coverage,
    bench_rasterize,
);

criterion_group!(
    optimizer_benches,
    bench_round,
    bench_population_scaling,
);

criterion_group!(
    ecca_benches,
    bench_non_dominated_sort,
    bench_crowding_distance,
);

criterion_main!(coverage_benches, optimizer_benches, ecca_benches);
