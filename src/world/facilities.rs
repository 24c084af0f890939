//! Simulated production facilities

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::types::{FacilityId, SiteId};
use crate::population::roles::{body_cost, BodyPart, WorkerRequestSpec};
use crate::spawning::facility::{FacilityRegistry, FacilityStatus, SpawnRefusal, MAX_BODY_PARTS};

/// Ticks needed to grow one body part
pub const TICKS_PER_PART: u32 = 3;

/// A worker whose spawn started since the last advance
///
/// Workers count toward their site's population from the moment growth
/// starts, the same as a worker still in the facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enlisted {
    pub facility: FacilityId,
    pub name: String,
    pub body: Vec<BodyPart>,
    pub request: WorkerRequestSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Growing {
    name: String,
    remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFacility {
    pub id: FacilityId,
    pub site: SiteId,
    pub energy: u32,
    pub energy_capacity: u32,
    /// Energy refilled per tick
    pub refill_rate: u32,
    growing: Option<Growing>,
}

impl SimFacility {
    pub fn new(id: FacilityId, site: SiteId, energy_capacity: u32, refill_rate: u32) -> Self {
        Self {
            id,
            site,
            energy: energy_capacity,
            energy_capacity,
            refill_rate,
            growing: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.growing.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimFacilities {
    facilities: Vec<SimFacility>,
    enlisted: Vec<Enlisted>,
}

impl SimFacilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, facility: SimFacility) {
        self.facilities.push(facility);
        self.facilities.sort_by_key(|f| f.id.0);
    }

    pub fn get(&self, id: FacilityId) -> Option<&SimFacility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    pub fn get_mut(&mut self, id: FacilityId) -> Option<&mut SimFacility> {
        self.facilities.iter_mut().find(|f| f.id == id)
    }

    /// Refill energy, progress growing workers by one tick, and hand over
    /// the workers enlisted since the last call
    pub fn advance(&mut self) -> Vec<Enlisted> {
        for facility in &mut self.facilities {
            facility.energy = (facility.energy + facility.refill_rate).min(facility.energy_capacity);

            if let Some(growing) = facility.growing.as_mut() {
                growing.remaining = growing.remaining.saturating_sub(1);
                if growing.remaining == 0 {
                    trace!("{} left {}", growing.name, facility.id);
                    facility.growing = None;
                }
            }
        }

        std::mem::take(&mut self.enlisted)
    }
}

impl FacilityRegistry for SimFacilities {
    fn facilities(&self) -> Vec<FacilityStatus> {
        self.facilities
            .iter()
            .map(|f| FacilityStatus {
                id: f.id,
                site: f.site.clone(),
                idle: f.is_idle(),
                energy_available: f.energy,
            })
            .collect()
    }

    fn check_spawn(&self, facility: FacilityId, body: &[BodyPart]) -> Result<(), SpawnRefusal> {
        let f = self.get(facility).ok_or(SpawnRefusal::UnknownFacility(facility))?;
        if !f.is_idle() {
            return Err(SpawnRefusal::Busy(facility));
        }
        if body.is_empty() {
            return Err(SpawnRefusal::EmptyBody);
        }
        if body.len() > MAX_BODY_PARTS {
            return Err(SpawnRefusal::BodyTooLarge(body.len()));
        }
        let needed = body_cost(body);
        if needed > f.energy {
            return Err(SpawnRefusal::NotEnoughEnergy {
                needed,
                available: f.energy,
            });
        }
        Ok(())
    }

    fn spawn(
        &mut self,
        facility: FacilityId,
        body: Vec<BodyPart>,
        name: String,
        request: WorkerRequestSpec,
    ) -> Result<(), SpawnRefusal> {
        self.check_spawn(facility, &body)?;
        let f = self.get_mut(facility).ok_or(SpawnRefusal::UnknownFacility(facility))?;
        f.energy -= body_cost(&body);
        f.growing = Some(Growing {
            name: name.clone(),
            remaining: body.len() as u32 * TICKS_PER_PART,
        });
        self.enlisted.push(Enlisted {
            facility,
            name,
            body,
            request,
        });
        Ok(())
    }
}
