use crate::coverage::{CoverageEngine, SessionCoverage};
use crate::{Error, NodeId};

/// State of one scheduling round.
///
/// Built at the start of every [`Optimizer::run`](crate::Optimizer::run)
/// from the energies of that round; everything that does not depend on a
/// particular sleep assignment is computed here once.
#[derive(Debug, Clone)]
pub struct Session {
    energies: Vec<f32>,
    alive: Vec<bool>,
    pinned: Option<usize>,
    can_sleep: Vec<usize>,
    alive_count: usize,
    total_energy: f32,
    average_energy: f32,
    neg_deviation: f32,
    pos_deviation: f32,
    coverage: SessionCoverage,
}

impl Session {
    /// Classifies nodes for this round. A node with zero energy is dead;
    /// `head` (the cluster head) is pinned awake.
    pub fn new(engine: &CoverageEngine, energies: &[f32], head: Option<NodeId>) -> Result<Self, Error> {
        let ids = engine.ids();
        if energies.len() != ids.len() {
            return Err(Error::EnergyLength {
                expected: ids.len(),
                actual: energies.len(),
            });
        }
        for (&node, &value) in ids.iter().zip(energies) {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidEnergy { node, value });
            }
        }
        let pinned = head
            .map(|id| engine.index_of(id).ok_or(Error::UnknownHead(id)))
            .transpose()?;

        let alive: Vec<bool> = energies.iter().map(|&e| e != 0.0).collect();
        let alive_count = alive.iter().filter(|&&a| a).count();
        let total_energy: f32 = energies.iter().sum();
        let average_energy = if alive_count == 0 {
            0.0
        } else {
            total_energy / alive_count as f32
        };

        let (mut neg_deviation, mut pos_deviation) = (0.0, 0.0);
        for &energy in energies.iter().filter(|&&e| e != 0.0) {
            let deviation = energy - average_energy;
            if deviation < 0.0 {
                neg_deviation += deviation;
            } else {
                pos_deviation += deviation;
            }
        }

        let can_sleep = (0..energies.len())
            .filter(|&idx| alive[idx] && Some(idx) != pinned)
            .collect();
        let coverage = engine.init_session(&alive);

        Ok(Self {
            energies: energies.to_vec(),
            alive,
            pinned,
            can_sleep,
            alive_count,
            total_energy,
            average_energy,
            neg_deviation,
            pos_deviation,
            coverage,
        })
    }

    pub fn node_count(&self) -> usize {
        self.energies.len()
    }

    pub fn energies(&self) -> &[f32] {
        &self.energies
    }

    pub fn alive(&self) -> &[bool] {
        &self.alive
    }

    pub fn is_alive(&self, idx: usize) -> bool {
        self.alive[idx]
    }

    pub fn pinned(&self) -> Option<usize> {
        self.pinned
    }

    /// Indices of alive, non-pinned nodes; the only genes any operator may set.
    pub fn can_sleep(&self) -> &[usize] {
        &self.can_sleep
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn total_energy(&self) -> f32 {
        self.total_energy
    }

    pub fn average_energy(&self) -> f32 {
        self.average_energy
    }

    /// Sum of the negative and positive deviations from the average energy
    /// over alive nodes.
    pub fn deviation_bounds(&self) -> (f32, f32) {
        (self.neg_deviation, self.pos_deviation)
    }

    pub fn coverage(&self) -> SessionCoverage {
        self.coverage
    }
}
