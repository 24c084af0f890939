//! Incremental plan construction on top of the placement searches

use tracing::{debug, trace};

use crate::core::error::{Result, SiteError};
use crate::core::types::{Cell, SourceId, StructureKind};
use crate::plan::{MineralPlan, PlannedStructure, SitePlan, SourcePlan};
use crate::spatial::placement::{find_clear_adjacent, find_clear_area};
use crate::spatial::terrain::Terrain;

/// A fixed arrangement of structures, roads and ramparts relative to a
/// top-left anchor
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub structures: Vec<(u32, u32, StructureKind)>,
    pub roads: Vec<(u32, u32)>,
    pub ramparts: Vec<(u32, u32)>,
}

impl Stamp {
    /// 5x5 core: spawn in the middle, tower above, storage below, extensions
    /// on the diagonals and a road cross between them
    pub fn core() -> Self {
        use StructureKind::*;
        Self {
            structures: vec![
                (2, 2, Spawn),
                (2, 1, Tower),
                (2, 3, Storage),
                (1, 1, Extension),
                (3, 1, Extension),
                (1, 3, Extension),
                (3, 3, Extension),
                (0, 0, Extension),
                (4, 0, Extension),
                (0, 4, Extension),
                (4, 4, Extension),
            ],
            roads: vec![(2, 0), (0, 2), (1, 2), (3, 2), (4, 2), (2, 4)],
            ramparts: vec![(2, 2), (2, 1), (2, 3)],
        }
    }

    /// Bounding box of everything in the stamp
    pub fn size(&self) -> (u32, u32) {
        let cells = self
            .structures
            .iter()
            .map(|&(x, y, _)| (x, y))
            .chain(self.roads.iter().copied())
            .chain(self.ramparts.iter().copied());

        cells.fold((0, 0), |(w, h), (x, y)| (w.max(x + 1), h.max(y + 1)))
    }
}

/// Accumulates a [`SitePlan`]; every placement avoids cells already claimed
#[derive(Debug, Clone, Default)]
pub struct SitePlanBuilder {
    plan: SitePlan,
}

impl SitePlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan a container next to an energy source
    pub fn add_source(&mut self, id: SourceId, source: Cell, terrain: &impl Terrain) -> Result<Cell> {
        let container =
            find_clear_adjacent(source.x, source.y, &self.plan, terrain).ok_or(SiteError::NoClearAdjacent(source))?;
        debug!("planned container {} for source {}", container, id);
        self.plan.sources.push(SourcePlan { id, container });
        Ok(container)
    }

    /// Plan a container next to a mineral deposit
    pub fn add_mineral(&mut self, mineral: Cell, terrain: &impl Terrain) -> Result<Cell> {
        let container = find_clear_adjacent(mineral.x, mineral.y, &self.plan, terrain)
            .ok_or(SiteError::NoClearAdjacent(mineral))?;
        self.plan.minerals.push(MineralPlan { container });
        Ok(container)
    }

    /// Lay a stamp down in the clear area closest to the site center
    ///
    /// Returns the anchor the stamp was placed at.
    pub fn place_stamp(&mut self, stamp: &Stamp, terrain: &impl Terrain) -> Result<Cell> {
        let (width, height) = stamp.size();
        let anchor =
            find_clear_area(width, height, &self.plan, terrain).ok_or(SiteError::NoClearArea { width, height })?;

        let at = |dx: u32, dy: u32| Cell::new(anchor.x + dx, anchor.y + dy);
        self.plan.structures.extend(
            stamp
                .structures
                .iter()
                .map(|&(dx, dy, kind)| PlannedStructure { cell: at(dx, dy), kind }),
        );
        self.plan.roads.extend(stamp.roads.iter().map(|&(dx, dy)| at(dx, dy)));
        self.plan.ramparts.extend(stamp.ramparts.iter().map(|&(dx, dy)| at(dx, dy)));

        debug!("placed {}x{} stamp at {}", width, height, anchor);
        Ok(anchor)
    }

    pub fn add_road(&mut self, cell: Cell) {
        self.plan.roads.push(cell);
    }

    /// Lay roads on the diagonal-first steps from `from` up to the cell next
    /// to `to`. Walls, planned structures and existing roads are stepped over.
    /// Returns the number of road cells added.
    pub fn connect(&mut self, from: Cell, to: Cell, terrain: &impl Terrain) -> usize {
        let step = |a: u32, b: u32| (i64::from(b) - i64::from(a)).signum();
        let mut at = from;
        let mut added = 0;

        while at.range_to(to) > 1 {
            let Some(next) = at.offset(step(at.x, to.x), step(at.y, to.y)) else {
                break;
            };
            at = next;
            let taken = self.plan.roads.contains(&at) || self.plan.reserved_cells().any(|c| c == at);
            if !terrain.is_wall(at) && !taken {
                self.add_road(at);
                added += 1;
            }
        }

        trace!("connected {} to {} with {} roads", from, to, added);
        added
    }

    pub fn plan(&self) -> &SitePlan {
        &self.plan
    }

    pub fn build(self) -> SitePlan {
        self.plan
    }
}
