//! Terrain access for placement searches

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{Cell, GRID_SIZE};
use crate::spatial::grid::Grid;

/// Read-only view of a site's terrain
pub trait Terrain {
    /// Whether the cell is impassable rock
    fn is_wall(&self, cell: Cell) -> bool;
}

/// Wall mask for one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainMask {
    walls: Grid<bool>,
}

impl Default for TerrainMask {
    fn default() -> Self {
        Self::open()
    }
}

impl TerrainMask {
    /// Terrain with no walls at all
    pub fn open() -> Self {
        Self { walls: Grid::site() }
    }

    /// Terrain whose outermost ring of cells is wall
    pub fn walled_border() -> Self {
        let mut mask = Self::open();
        let last = GRID_SIZE - 1;
        for i in 0..GRID_SIZE {
            mask.set_wall(Cell::new(i, 0));
            mask.set_wall(Cell::new(i, last));
            mask.set_wall(Cell::new(0, i));
            mask.set_wall(Cell::new(last, i));
        }
        mask
    }

    /// Walled border plus scattered rock outcrops
    ///
    /// Each outcrop is a filled square of side 1-4. The central 11x11 block is
    /// left open so a core layout always has somewhere to go.
    pub fn generate<R: Rng>(rng: &mut R, outcrops: usize) -> Self {
        let mut mask = Self::walled_border();
        let center = GRID_SIZE / 2;

        for _ in 0..outcrops {
            let size = rng.gen_range(1..=4);
            let x0 = rng.gen_range(1..GRID_SIZE - size);
            let y0 = rng.gen_range(1..GRID_SIZE - size);
            for x in x0..x0 + size {
                for y in y0..y0 + size {
                    if x.abs_diff(center) <= 5 && y.abs_diff(center) <= 5 {
                        continue;
                    }
                    mask.set_wall(Cell::new(x, y));
                }
            }
        }
        mask
    }

    pub fn set_wall(&mut self, cell: Cell) {
        self.walls.set_at(cell, true);
    }

    pub fn clear_wall(&mut self, cell: Cell) {
        self.walls.set_at(cell, false);
    }

    pub fn wall_count(&self) -> usize {
        self.walls.count_set()
    }
}

impl Terrain for TerrainMask {
    fn is_wall(&self, cell: Cell) -> bool {
        self.walls.at(cell).copied().unwrap_or(true)
    }
}
