//! Schedules a few rounds on a random sensor field and prints how coverage
//! and the number of sleeping nodes evolve as nodes drain their batteries.
//!
//! Pick the strategy by name: `cargo run --example field_round -- Ecca`.

use rand::Rng;
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;
use symbios_coverage::algorithms::StrategyKind;
use symbios_coverage::geometry::{FieldGrid, SensorDisk, rasterize};
use symbios_coverage::{CoverageEngine, Optimizer, OptimizerConfig};

const NODES: u32 = 40;
const RADIUS: f32 = 12.0;
const ROUNDS: usize = 5;
const AWAKE_COST: f32 = 0.3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to see each round being scheduled
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let kind: StrategyKind = match std::env::args().nth(1) {
        Some(name) => serde_json::from_str(&format!("\"{name}\""))?,
        None => StrategyKind::ModifiedPso,
    };

    let mut rng = Pcg64::seed_from_u64(7);
    let grid = FieldGrid::new(100.0, 100.0, 1.0)?;
    let disks: Vec<SensorDisk> = (0..NODES)
        .map(|id| SensorDisk {
            id,
            x: rng.random_range(0.0..100.0),
            y: rng.random_range(0.0..100.0),
        })
        .collect();

    let mut map = rasterize(&grid, &disks, RADIUS)?;
    let dropped = map.drop_small(0.0005);
    println!(
        "{} exclusive, {} overlapping regions ({dropped} dropped)",
        map.exclusive.len(),
        map.overlapping.len()
    );

    let ids: Vec<_> = disks.iter().map(|d| d.id).collect();
    let engine = CoverageEngine::from_region_map(ids, &map)?;
    let config = OptimizerConfig {
        population_size: 20,
        max_iterations: 40,
        seed: Some(7),
        ..OptimizerConfig::default()
    };
    let mut optimizer = Optimizer::new(engine, kind.build(), config)?;

    let mut energies: Vec<f32> = (0..NODES).map(|_| rng.random_range(0.5..2.0)).collect();
    for round in 0..ROUNDS {
        let head = pick_head(&energies, optimizer.engine());
        let schedule = optimizer.run(&energies, head)?;
        if let Some(report) = optimizer.report() {
            println!(
                "round {round}: coverage {:.3}, overlap {:.3}, sleeping {:.2}, fitness {:.3} -> {:.3}",
                report.coverage,
                report.overlapping,
                report.sleeping_ratio,
                report.initial_fitness,
                report.final_fitness,
            );
        }
        for (energy, asleep) in energies.iter_mut().zip(&schedule) {
            if !asleep {
                *energy = (*energy - AWAKE_COST).max(0.0);
            }
        }
    }
    Ok(())
}

/// The richest alive node heads the cluster.
fn pick_head(energies: &[f32], engine: &CoverageEngine) -> Option<u32> {
    energies
        .iter()
        .enumerate()
        .filter(|(_, e)| **e > 0.0)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| engine.ids()[idx])
}
