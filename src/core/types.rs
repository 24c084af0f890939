//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Width and height of every site grid, in cells
pub const GRID_SIZE: u32 = 50;

/// Simulation tick counter
pub type Tick = u64;

/// Name of a controlled site (e.g. "W3N7")
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct SiteId(pub String);

impl SiteId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Identifier of an energy source inside a site
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Identifier of a production facility
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "facility#{}", _0)]
pub struct FacilityId(pub u32);

/// A single grid cell, always inside `[0, GRID_SIZE)`
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "({}, {})", x, y)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    /// Panics in debug builds when the coordinates fall outside the grid.
    pub fn new(x: u32, y: u32) -> Self {
        debug_assert!(x < GRID_SIZE && y < GRID_SIZE, "cell ({x}, {y}) outside grid");
        Self { x, y }
    }

    /// Bounds-checked construction from signed coordinates
    pub fn checked(x: i64, y: i64) -> Option<Self> {
        let size = GRID_SIZE as i64;
        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(Self { x: x as u32, y: y as u32 })
        } else {
            None
        }
    }

    /// Neighbour at the given offset, if it is still on the grid
    pub fn offset(&self, dx: i64, dy: i64) -> Option<Self> {
        Self::checked(self.x as i64 + dx, self.y as i64 + dy)
    }

    /// Chebyshev distance, the number of moves between two cells
    pub fn range_to(&self, other: Cell) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// What a site is being run as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteKind {
    /// A full colony with its own production facilities
    Colony,
    /// A harvesting-only expansion fed by facilities elsewhere
    Expansion,
}

impl SiteKind {
    /// Whether requests from this site may be realized by any facility in the territory
    pub fn spawns_globally(&self) -> bool {
        matches!(self, SiteKind::Expansion)
    }
}

/// Kind of physical structure that can be planned and built
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    #[display(fmt = "spawn")]
    Spawn,
    #[display(fmt = "extension")]
    Extension,
    #[display(fmt = "tower")]
    Tower,
    #[display(fmt = "storage")]
    Storage,
    #[display(fmt = "terminal")]
    Terminal,
    #[display(fmt = "link")]
    Link,
    #[display(fmt = "container")]
    Container,
    #[display(fmt = "road")]
    Road,
    #[display(fmt = "rampart")]
    Rampart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_checked_bounds() {
        assert_eq!(Cell::checked(0, 0), Some(Cell::new(0, 0)));
        assert_eq!(Cell::checked(49, 49), Some(Cell::new(49, 49)));
        assert!(Cell::checked(-1, 3).is_none());
        assert!(Cell::checked(3, 50).is_none());
    }

    #[test]
    fn test_cell_offset_at_edge() {
        let corner = Cell::new(0, 0);
        assert!(corner.offset(-1, 0).is_none());
        assert_eq!(corner.offset(1, 1), Some(Cell::new(1, 1)));
    }

    #[test]
    fn test_range_to() {
        assert_eq!(Cell::new(10, 10).range_to(Cell::new(13, 11)), 3);
        assert_eq!(Cell::new(5, 5).range_to(Cell::new(5, 5)), 0);
    }

    #[test]
    fn test_spawn_scope_by_kind() {
        assert!(SiteKind::Expansion.spawns_globally());
        assert!(!SiteKind::Colony.spawns_globally());
    }

    #[test]
    fn test_display_ids() {
        assert_eq!(SiteId::new("W1N1").to_string(), "W1N1");
        assert_eq!(FacilityId(3).to_string(), "facility#3");
        assert_eq!(Cell::new(4, 7).to_string(), "(4, 7)");
        assert_eq!(StructureKind::Container.to_string(), "container");
    }
}
