use crate::fitness::Fitness;
use serde::{Deserialize, Serialize};

/// Best-so-far fitness recorded at the start of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub iteration: usize,
    pub total: f32,
    pub term1: f32,
    pub term2: f32,
    pub term3: f32,
}

/// Append-only record of how the best fitness evolved during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningTrace {
    entries: Vec<TraceEntry>,
}

impl LearningTrace {
    pub fn push(&mut self, iteration: usize, fitness: &Fitness) {
        self.entries.push(TraceEntry {
            iteration,
            total: fitness.total,
            term1: fitness.term1,
            term2: fitness.term2,
            term3: fitness.term3,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn first(&self) -> Option<&TraceEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&TraceEntry> {
        self.entries.last()
    }

    pub fn totals(&self) -> Vec<f32> {
        self.entries.iter().map(|e| e.total).collect()
    }

    pub fn term1(&self) -> Vec<f32> {
        self.entries.iter().map(|e| e.term1).collect()
    }

    pub fn term2(&self) -> Vec<f32> {
        self.entries.iter().map(|e| e.term2).collect()
    }

    pub fn term3(&self) -> Vec<f32> {
        self.entries.iter().map(|e| e.term3).collect()
    }
}
