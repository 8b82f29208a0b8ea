//! Spatial hash index
//!
//! Uniform grid over unbounded 2D space for broad-phase collision
//! queries, replacing O(N*M) all-pairs checks. The grid is rebuilt
//! from scratch every frame, so it never goes stale against moving
//! entities.
//!
//! Cell size is [`crate::consts::GRID_CELL_SIZE`]; see the constant's
//! docs for the sizing constraint. Cell coordinates are `i32` packed
//! into a `u64` key; positions beyond roughly 2e11 units wrap the key
//! space, which is far outside any reachable play area.

use std::collections::HashMap;

use glam::Vec2;

use crate::consts::GRID_CELL_SIZE;

/// Index of an entity in one of the world's live lists.
///
/// The grid stores indices rather than references so a query result
/// never borrows the entity storage it will be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridRef {
    Hostile(usize),
    Boss,
}

/// Per-frame spatial hash over hostiles and the boss.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cells: HashMap<u64, Vec<GridRef>>,
    /// Emptied buckets waiting for reuse, so rebuilds neither
    /// allocate nor leave stale cells in the map
    spare: Vec<Vec<GridRef>>,
}

#[inline]
fn cell_coords(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / GRID_CELL_SIZE).floor() as i32,
        (pos.y / GRID_CELL_SIZE).floor() as i32,
    )
}

#[inline]
fn cell_key(cx: i32, cy: i32) -> u64 {
    ((cx as u32 as u64) << 32) | (cy as u32 as u64)
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all occupants. Bucket allocations move to the spare list
    /// for the next frame's rebuild; the map keeps only live cells,
    /// so iteration cost tracks the current frame, not every cell
    /// ever touched.
    pub fn clear(&mut self) {
        for (_, mut bucket) in self.cells.drain() {
            bucket.clear();
            self.spare.push(bucket);
        }
    }

    /// Insert an entity reference at a world position.
    pub fn insert(&mut self, entry: GridRef, pos: Vec2) {
        let (cx, cy) = cell_coords(pos);
        self.cells
            .entry(cell_key(cx, cy))
            .or_insert_with(|| self.spare.pop().unwrap_or_default())
            .push(entry);
    }

    /// Number of cells holding at least one occupant.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Collect every occupant of the 3x3 cell block around `pos` into
    /// `out`. Results are a conservative over-approximation: callers
    /// must do the exact distance check themselves. `out` is cleared
    /// first so callers can reuse one buffer across queries.
    pub fn query(&self, pos: Vec2, out: &mut Vec<GridRef>) {
        out.clear();
        let (cx, cy) = cell_coords(pos);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.cells.get(&cell_key(cx + dx, cy + dy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
    }
}
