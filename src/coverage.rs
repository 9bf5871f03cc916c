//! Coverage accounting for a sensor field.
//!
//! The field is described once, at construction, as a set of *exclusive*
//! regions (covered by exactly one node) and *overlapping* regions (covered
//! jointly by two or more nodes). Every fitness evaluation then asks the
//! engine how much of that area survives a given sleep assignment.
//!
//! Two totals are derived per session from the alive/dead classification
//! and reused by every [`CoverageEngine::coverage`] call of that session:
//!
//! - `total_coverage`: area covered while every alive node is awake
//! - `total_overlapping`: area covered by at least two alive nodes

use crate::geometry::RegionMap;
use crate::{Error, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An overlapping region as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub owners: Vec<NodeId>,
    pub area: f32,
}

impl Region {
    pub fn new(owners: Vec<NodeId>, area: f32) -> Self {
        Self { owners, area }
    }
}

/// Coverage figures of one sleep assignment within one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageInfo {
    /// Area still covered by at least one awake, alive node.
    pub partial_coverage: f32,
    /// Area covered while every alive node is awake.
    pub total_coverage: f32,
    /// Area covered by at least two awake, alive nodes.
    pub partial_overlapping: f32,
    /// Area covered by at least two alive nodes.
    pub total_overlapping: f32,
    /// Area covered by exactly one awake, alive node.
    pub exclusive_area: f32,
}

/// Per-session totals computed by [`CoverageEngine::init_session`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionCoverage {
    pub total_coverage: f32,
    pub total_overlapping: f32,
}

#[derive(Debug, Clone)]
struct IndexedRegion {
    owners: Vec<usize>,
    area: f32,
}

/// Static region geometry addressed by node index.
///
/// The node ordering passed to [`CoverageEngine::new`] fixes the index of
/// every node for the lifetime of the engine; gene vectors, energy vectors
/// and alive masks are all aligned with it.
#[derive(Debug, Clone)]
pub struct CoverageEngine {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    exclusive: Vec<f32>,
    overlapping: Vec<IndexedRegion>,
}

fn validate_area(area: f32) -> Result<f32, Error> {
    if !area.is_finite() || area < 0.0 {
        return Err(Error::InvalidArea(area));
    }
    Ok(area)
}

impl CoverageEngine {
    /// Builds the engine from the node ordering, the exclusive area of each
    /// node and the list of overlapping regions.
    ///
    /// Nodes without an exclusive entry own no exclusive area. Repeated
    /// owners inside one overlapping region are collapsed.
    ///
    /// # Errors
    ///
    /// Fails when the ordering repeats a node, a region names a node outside
    /// the ordering, a node has two exclusive entries, an area is negative or
    /// non-finite, or an overlapping region has fewer than two distinct owners.
    pub fn new<E, O>(ids: Vec<NodeId>, exclusive: E, overlapping: O) -> Result<Self, Error>
    where
        E: IntoIterator<Item = (NodeId, f32)>,
        O: IntoIterator<Item = Region>,
    {
        let mut index = HashMap::with_capacity(ids.len());
        for (idx, &id) in ids.iter().enumerate() {
            if index.insert(id, idx).is_some() {
                return Err(Error::DuplicateNode(id));
            }
        }

        let mut exclusive_areas = vec![0.0; ids.len()];
        let mut seen = vec![false; ids.len()];
        for (id, area) in exclusive {
            let idx = *index.get(&id).ok_or(Error::UnknownNode(id))?;
            if seen[idx] {
                return Err(Error::DuplicateExclusive(id));
            }
            seen[idx] = true;
            exclusive_areas[idx] = validate_area(area)?;
        }

        let mut regions = Vec::new();
        for region in overlapping {
            let area = validate_area(region.area)?;
            let mut owners = region
                .owners
                .iter()
                .map(|id| index.get(id).copied().ok_or(Error::UnknownNode(*id)))
                .collect::<Result<Vec<_>, _>>()?;
            owners.sort_unstable();
            owners.dedup();
            if owners.len() < 2 {
                return Err(Error::DegenerateRegion(owners.len()));
            }
            regions.push(IndexedRegion { owners, area });
        }

        Ok(Self {
            ids,
            index,
            exclusive: exclusive_areas,
            overlapping: regions,
        })
    }

    /// Builds the engine from a rasterised [`RegionMap`].
    pub fn from_region_map(ids: Vec<NodeId>, map: &RegionMap) -> Result<Self, Error> {
        Self::new(
            ids,
            map.exclusive.iter().map(|(&id, &area)| (id, area)),
            map.overlapping.iter().cloned(),
        )
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn overlapping_len(&self) -> usize {
        self.overlapping.len()
    }

    /// Computes the session totals for the given alive mask.
    ///
    /// With no alive node both totals are exactly `0.0`.
    pub fn init_session(&self, alive: &[bool]) -> SessionCoverage {
        debug_assert_eq!(alive.len(), self.ids.len());
        if !alive.iter().any(|&a| a) {
            return SessionCoverage::default();
        }

        let mut total_coverage: f32 = self
            .exclusive
            .iter()
            .zip(alive)
            .filter(|(_, alive)| **alive)
            .map(|(area, _)| *area)
            .sum();
        let mut total_overlapping = 0.0;
        for region in &self.overlapping {
            let alive_owners = region.owners.iter().filter(|&&o| alive[o]).count();
            if alive_owners >= 1 {
                total_coverage += region.area;
            }
            if alive_owners >= 2 {
                total_overlapping += region.area;
            }
        }

        SessionCoverage {
            total_coverage,
            total_overlapping,
        }
    }

    /// Coverage retained when the nodes whose gene is `true` sleep.
    ///
    /// `genes` and `alive` are indexed like the node ordering. Dead nodes are
    /// ignored whatever their gene says.
    pub fn coverage(&self, genes: &[bool], alive: &[bool], totals: SessionCoverage) -> CoverageInfo {
        debug_assert_eq!(genes.len(), self.ids.len());
        debug_assert_eq!(alive.len(), self.ids.len());

        let mut partial_coverage = totals.total_coverage;
        let mut exclusive_area = 0.0;
        let mut partial_overlapping = 0.0;

        for (idx, &area) in self.exclusive.iter().enumerate() {
            if !alive[idx] {
                continue;
            }
            if genes[idx] {
                partial_coverage -= area;
            } else {
                exclusive_area += area;
            }
        }

        for region in &self.overlapping {
            let mut alive_owners = 0usize;
            let mut awake_owners = 0usize;
            for &owner in &region.owners {
                if alive[owner] {
                    alive_owners += 1;
                    if !genes[owner] {
                        awake_owners += 1;
                    }
                }
            }
            match (alive_owners, awake_owners) {
                // not part of total_coverage in the first place
                (0, _) => {}
                (_, 0) => partial_coverage -= region.area,
                (_, 1) => exclusive_area += region.area,
                _ => partial_overlapping += region.area,
            }
        }

        CoverageInfo {
            partial_coverage: partial_coverage.max(0.0),
            total_coverage: totals.total_coverage,
            partial_overlapping,
            total_overlapping: totals.total_overlapping,
            exclusive_area: exclusive_area.max(0.0),
        }
    }
}
