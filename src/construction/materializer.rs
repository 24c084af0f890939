//! Construction materializer - drains plan layers into commitments
//!
//! Layers are visited in [`PlanLayer::PRIORITY`] order and cells in their
//! stored order. A shared counter of active commitments is checked before
//! every attempt; the whole pass stops as soon as it reaches the cap, leaving
//! the rest of the plan for the next firing.

use tracing::{debug, trace};

use crate::construction::StructureIndex;
use crate::core::types::{Cell, StructureKind};
use crate::plan::{PlanLayer, PlannedStructure, SitePlan};

/// Outcome of one materialization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Commitments created this pass, in creation order
    pub created: Vec<PlannedStructure>,
    /// Cells whose commitment was refused; retried next pass
    pub refused: Vec<PlannedStructure>,
    /// Active commitments stood at the cap when the pass ended
    pub capped: bool,
}

/// Whether a structure of exactly this kind already stands on the cell
pub fn is_built<S: StructureIndex>(structures: &S, cell: Cell, kind: StructureKind) -> bool {
    structures.structures_at(cell).contains(&kind)
}

/// Schedule construction for unbuilt plan cells, up to `cap` active commitments
pub fn materialize<S: StructureIndex>(plan: &SitePlan, structures: &mut S, cap: usize) -> MaterializeReport {
    let mut report = MaterializeReport::default();
    let mut active = structures.count_active_commitments();

    if active >= cap {
        trace!("{} commitments already active, skipping materialization", active);
        report.capped = true;
        return report;
    }

    'layers: for layer in PlanLayer::PRIORITY {
        for planned in plan.layer(layer) {
            if is_built(structures, planned.cell, planned.kind) {
                continue;
            }
            if active >= cap {
                report.capped = true;
                break 'layers;
            }

            match structures.create_commitment(planned.cell, planned.kind) {
                Ok(()) => {
                    active += 1;
                    report.created.push(planned);
                }
                Err(refusal) => {
                    trace!("commitment for {} at {} refused: {}", planned.kind, planned.cell, refusal);
                    report.refused.push(planned);
                }
            }
        }
    }
    report.capped |= active >= cap;

    if !report.created.is_empty() {
        debug!(
            "materialized {} commitments ({} active, {} refused)",
            report.created.len(),
            active,
            report.refused.len()
        );
    }

    report
}
