//! Site grids, terrain, and placement searches

pub mod grid;
pub mod placement;
pub mod terrain;

pub use grid::Grid;
pub use placement::{find_clear_adjacent, find_clear_area, reserved_mask};
pub use terrain::{Terrain, TerrainMask};
