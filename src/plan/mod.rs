//! Site plans - the layered, pre-computed set of cells to build on
//!
//! A plan is produced once (see [`SitePlanBuilder`]) and treated as immutable
//! input afterwards. Its layers are drained in a fixed priority by the
//! construction materializer.

mod builder;

pub use builder::{SitePlanBuilder, Stamp};

use serde::{Deserialize, Serialize};

use crate::core::types::{Cell, SiteKind, SourceId, StructureKind};

/// Container planned next to an energy source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePlan {
    pub id: SourceId,
    pub container: Cell,
}

/// Container planned next to a mineral deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineralPlan {
    pub container: Cell,
}

/// A core structure at a fixed cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedStructure {
    pub cell: Cell,
    pub kind: StructureKind,
}

/// Plan layers in the order they are materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanLayer {
    SourceContainers,
    MineralContainers,
    CoreStructures,
    Roads,
    Ramparts,
}

impl PlanLayer {
    /// Materialization priority, highest first
    pub const PRIORITY: [PlanLayer; 5] = [
        PlanLayer::SourceContainers,
        PlanLayer::MineralContainers,
        PlanLayer::CoreStructures,
        PlanLayer::Roads,
        PlanLayer::Ramparts,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitePlan {
    pub sources: Vec<SourcePlan>,
    pub minerals: Vec<MineralPlan>,
    pub structures: Vec<PlannedStructure>,
    pub roads: Vec<Cell>,
    pub ramparts: Vec<Cell>,
}

impl SitePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Planned cells of one layer, in stored order, with the structure kind
    /// each cell should end up holding
    pub fn layer(&self, layer: PlanLayer) -> Vec<PlannedStructure> {
        let container = |cell: Cell| PlannedStructure {
            cell,
            kind: StructureKind::Container,
        };
        match layer {
            PlanLayer::SourceContainers => self.sources.iter().map(|s| container(s.container)).collect(),
            PlanLayer::MineralContainers => self.minerals.iter().map(|m| container(m.container)).collect(),
            PlanLayer::CoreStructures => self.structures.clone(),
            PlanLayer::Roads => self
                .roads
                .iter()
                .map(|&cell| PlannedStructure {
                    cell,
                    kind: StructureKind::Road,
                })
                .collect(),
            PlanLayer::Ramparts => self
                .ramparts
                .iter()
                .map(|&cell| PlannedStructure {
                    cell,
                    kind: StructureKind::Rampart,
                })
                .collect(),
        }
    }

    /// Cells that later placement searches must stay off
    ///
    /// Roads and ramparts are not reserved: they may share a cell with other
    /// structures.
    pub fn reserved_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.structures
            .iter()
            .map(|s| s.cell)
            .chain(self.sources.iter().map(|s| s.container))
            .chain(self.minerals.iter().map(|m| m.container))
    }

    pub fn source(&self, id: &SourceId) -> Option<&SourcePlan> {
        self.sources.iter().find(|s| &s.id == id)
    }

    /// Whether a site with this plan can be run as the given kind
    pub fn supports(&self, kind: SiteKind) -> bool {
        match kind {
            SiteKind::Colony | SiteKind::Expansion => !self.sources.is_empty(),
        }
    }

    /// Total number of cells across all layers
    pub fn planned_cell_count(&self) -> usize {
        self.sources.len() + self.minerals.len() + self.structures.len() + self.roads.len() + self.ramparts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> SitePlan {
        SitePlan {
            sources: vec![SourcePlan {
                id: SourceId::new("src-a"),
                container: Cell::new(10, 11),
            }],
            minerals: vec![MineralPlan {
                container: Cell::new(40, 40),
            }],
            structures: vec![PlannedStructure {
                cell: Cell::new(25, 25),
                kind: StructureKind::Spawn,
            }],
            roads: vec![Cell::new(24, 25), Cell::new(23, 25)],
            ramparts: vec![Cell::new(25, 25)],
        }
    }

    #[test]
    fn test_layers_carry_expected_kinds() {
        let plan = sample_plan();
        assert_eq!(
            plan.layer(PlanLayer::SourceContainers),
            vec![PlannedStructure {
                cell: Cell::new(10, 11),
                kind: StructureKind::Container
            }]
        );
        assert_eq!(plan.layer(PlanLayer::MineralContainers)[0].kind, StructureKind::Container);
        assert_eq!(plan.layer(PlanLayer::CoreStructures)[0].kind, StructureKind::Spawn);
        let roads = plan.layer(PlanLayer::Roads);
        assert_eq!(roads.len(), 2);
        assert!(roads.iter().all(|r| r.kind == StructureKind::Road));
        assert_eq!(roads[1].cell, Cell::new(23, 25));
        assert_eq!(plan.layer(PlanLayer::Ramparts)[0].kind, StructureKind::Rampart);
    }

    #[test]
    fn test_reserved_cells_skip_roads_and_ramparts() {
        let plan = sample_plan();
        let reserved: Vec<Cell> = plan.reserved_cells().collect();
        assert_eq!(reserved, vec![Cell::new(25, 25), Cell::new(10, 11), Cell::new(40, 40)]);
        assert!(!reserved.contains(&Cell::new(24, 25)));
    }

    #[test]
    fn test_supports_requires_a_source() {
        assert!(sample_plan().supports(SiteKind::Expansion));
        assert!(sample_plan().supports(SiteKind::Colony));
        assert!(!SitePlan::new().supports(SiteKind::Expansion));
    }

    #[test]
    fn test_source_lookup() {
        let plan = sample_plan();
        assert!(plan.source(&SourceId::new("src-a")).is_some());
        assert!(plan.source(&SourceId::new("missing")).is_none());
        assert_eq!(plan.planned_cell_count(), 6);
    }
}
