//! Construction layer - turning the site plan into build commitments

pub mod materializer;

pub use materializer::{is_built, materialize, MaterializeReport};

use thiserror::Error;

use crate::core::types::{Cell, StructureKind};

/// Why a construction commitment could not be placed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitmentRefusal {
    #[error("cell {0} is blocked")]
    Blocked(Cell),

    #[error("a commitment already exists at {0}")]
    Occupied(Cell),

    #[error("not permitted to build a {kind} at {cell}")]
    NotPermitted { cell: Cell, kind: StructureKind },
}

/// Structures and construction commitments of one site
pub trait StructureIndex {
    /// Kinds of every finished structure standing on the cell
    fn structures_at(&self, cell: Cell) -> Vec<StructureKind>;

    /// Start a construction commitment
    fn create_commitment(&mut self, cell: Cell, kind: StructureKind) -> Result<(), CommitmentRefusal>;

    /// Commitments not yet completed into structures
    fn count_active_commitments(&self) -> usize;

    /// Finished structures below full health
    fn damaged_structure_count(&self) -> usize;
}
