//! Grid rasterisation of circular sensing footprints into regions.
//!
//! Each node covers a disk of fixed radius. The field is sampled on a
//! square grid; every sample point is painted with the ids of the nodes
//! whose disk contains it. Points painted with the same owner set form one
//! region, single-owner regions become exclusive.
//!
//! The result is an approximation whose accuracy is set by
//! [`FieldGrid::precision`].

use crate::coverage::Region;
use crate::{Error, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rectangular field `[0, width] x [0, length]` sampled every `precision` units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGrid {
    pub width: f32,
    pub length: f32,
    pub precision: f32,
}

/// Position of one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorDisk {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
}

/// Regions ready to feed [`CoverageEngine`](crate::coverage::CoverageEngine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionMap {
    pub exclusive: BTreeMap<NodeId, f32>,
    pub overlapping: Vec<Region>,
}

impl RegionMap {
    /// Sum of every region's area.
    pub fn total_area(&self) -> f32 {
        self.exclusive.values().sum::<f32>() + self.overlapping.iter().map(|r| r.area).sum::<f32>()
    }

    /// Removes every region smaller than `fraction` of the total area and
    /// returns how many were dropped.
    pub fn drop_small(&mut self, fraction: f32) -> usize {
        let total = self.total_area();
        if total <= 0.0 {
            return 0;
        }
        let before = self.exclusive.len() + self.overlapping.len();
        self.exclusive.retain(|_, area| *area / total >= fraction);
        self.overlapping.retain(|r| r.area / total >= fraction);
        before - (self.exclusive.len() + self.overlapping.len())
    }
}

impl FieldGrid {
    pub fn new(width: f32, length: f32, precision: f32) -> Result<Self, Error> {
        if !(precision.is_finite() && precision > 0.0) {
            return Err(Error::InvalidGrid("precision must be finite and positive"));
        }
        if !(width.is_finite() && width >= 0.0 && length.is_finite() && length >= 0.0) {
            return Err(Error::InvalidGrid("field dimensions must be finite and non-negative"));
        }
        Ok(Self {
            width,
            length,
            precision,
        })
    }

    fn cell_range(&self, centre: f32, radius: f32, limit: f32) -> std::ops::Range<i64> {
        let first = ((centre - radius) / self.precision).floor().max(0.0) as i64;
        let last = ((centre + radius).min(limit) / self.precision).floor().max(0.0) as i64;
        first..last
    }

    fn cell_area(&self) -> f32 {
        self.precision * self.precision
    }
}

/// Paints every disk on the grid and groups the painted cells by owner set.
pub fn rasterize(grid: &FieldGrid, disks: &[SensorDisk], radius: f32) -> Result<RegionMap, Error> {
    if !(radius.is_finite() && radius >= 0.0) {
        return Err(Error::InvalidGrid("radius must be finite and non-negative"));
    }

    let mut cells: BTreeMap<(i64, i64), Vec<NodeId>> = BTreeMap::new();
    for disk in disks {
        tracing::trace!(node = disk.id, x = disk.x, y = disk.y, "painting sensor footprint");
        for cx in grid.cell_range(disk.x, radius, grid.width) {
            for cy in grid.cell_range(disk.y, radius, grid.length) {
                let px = cx as f32 * grid.precision;
                let py = cy as f32 * grid.precision;
                let (dx, dy) = (px - disk.x, py - disk.y);
                if (dx * dx + dy * dy).sqrt() < radius {
                    cells.entry((cx, cy)).or_default().push(disk.id);
                }
            }
        }
    }

    let mut by_owners: BTreeMap<Vec<NodeId>, u64> = BTreeMap::new();
    for (_, mut owners) in cells {
        owners.sort_unstable();
        owners.dedup();
        *by_owners.entry(owners).or_default() += 1;
    }

    let cell_area = grid.cell_area();
    let mut map = RegionMap::default();
    for (owners, count) in by_owners {
        let area = count as f32 * cell_area;
        if let [single] = owners.as_slice() {
            map.exclusive.insert(*single, area);
        } else {
            map.overlapping.push(Region::new(owners, area));
        }
    }
    tracing::debug!(
        exclusive = map.exclusive.len(),
        overlapping = map.overlapping.len(),
        "rasterised sensor field"
    );
    Ok(map)
}
