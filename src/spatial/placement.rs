//! Placement searches over a site grid
//!
//! Both searches are pure: they read the terrain and the cells reserved by the
//! current plan, and never modify either.

use crate::core::types::{Cell, GRID_SIZE};
use crate::plan::SitePlan;
use crate::spatial::grid::Grid;
use crate::spatial::terrain::Terrain;

/// Neighbour offsets in search order: NW, N, NE, W, E, SW, S, SE
pub const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Mask of every cell the plan already claims
pub fn reserved_mask(plan: &SitePlan) -> Grid<bool> {
    let mut mask = Grid::site();
    for cell in plan.reserved_cells() {
        mask.set_at(cell, true);
    }
    mask
}

fn is_open(cell: Cell, terrain: &impl Terrain, reserved: &Grid<bool>) -> bool {
    !terrain.is_wall(cell) && !reserved.at(cell).copied().unwrap_or(true)
}

/// Find the unobstructed `width x height` window closest to the grid center
///
/// Returns the top-left anchor of the window. Distance is measured from the
/// window's center cell `(x + width/2, y + height/2)` to `(25, 25)`. Anchors
/// are scanned x-outer, y-inner, ascending; among equally distant windows the
/// first one scanned wins.
pub fn find_clear_area(width: u32, height: u32, plan: &SitePlan, terrain: &impl Terrain) -> Option<Cell> {
    if width == 0 || height == 0 || width > GRID_SIZE || height > GRID_SIZE {
        return None;
    }

    let reserved = reserved_mask(plan);
    let center = (GRID_SIZE / 2) as f64;
    let mut best: Option<(Cell, f64)> = None;

    for x in 0..=GRID_SIZE - width {
        for y in 0..=GRID_SIZE - height {
            let clear = (0..width)
                .all(|i| (0..height).all(|j| is_open(Cell::new(x + i, y + j), terrain, &reserved)));
            if !clear {
                continue;
            }

            let dx = (x + width / 2) as f64 - center;
            let dy = (y + height / 2) as f64 - center;
            let dist = (dx * dx + dy * dy).sqrt();

            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((Cell::new(x, y), dist)),
            }
        }
    }

    best.map(|(cell, _)| cell)
}

/// Find the first open neighbour of `(x, y)` in NW, N, NE, W, E, SW, S, SE order
///
/// Neighbours off the grid, on walls, or reserved by the plan are skipped.
pub fn find_clear_adjacent(x: u32, y: u32, plan: &SitePlan, terrain: &impl Terrain) -> Option<Cell> {
    let origin = Cell::checked(x as i64, y as i64)?;
    let reserved = reserved_mask(plan);

    NEIGHBOURS
        .iter()
        .filter_map(|&(dx, dy)| origin.offset(dx, dy))
        .find(|&cell| is_open(cell, terrain, &reserved))
}
