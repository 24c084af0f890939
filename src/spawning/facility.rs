//! Production facilities as seen by the spawn scheduler

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{FacilityId, SiteId};
use crate::population::roles::{BodyPart, WorkerRequestSpec};

/// Largest body a facility can grow
pub const MAX_BODY_PARTS: usize = 50;

/// Snapshot of one facility at the start of a spawn attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityStatus {
    pub id: FacilityId,
    pub site: SiteId,
    /// Not currently growing a worker
    pub idle: bool,
    /// Energy the facility can draw on right now
    pub energy_available: u32,
}

/// Why a facility would not (or did not) grow a body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnRefusal {
    #[error("{0} is busy")]
    Busy(FacilityId),

    #[error("not enough energy: need {needed}, have {available}")]
    NotEnoughEnergy { needed: u32, available: u32 },

    #[error("body of {0} parts exceeds the limit")]
    BodyTooLarge(usize),

    #[error("body has no parts")]
    EmptyBody,

    #[error("unknown facility {0}")]
    UnknownFacility(FacilityId),
}

/// Registry of every production facility in the controlled territory
pub trait FacilityRegistry {
    /// All facilities, in a stable order
    fn facilities(&self) -> Vec<FacilityStatus>;

    /// Dry run: would `spawn` succeed with this body right now
    fn check_spawn(&self, facility: FacilityId, body: &[BodyPart]) -> Result<(), SpawnRefusal>;

    /// Start growing a worker; the facility stays busy until it is done
    fn spawn(
        &mut self,
        facility: FacilityId,
        body: Vec<BodyPart>,
        name: String,
        request: WorkerRequestSpec,
    ) -> Result<(), SpawnRefusal>;
}
