//! In-memory territory - simulated sites and facilities behind the control loop's traits

pub mod facilities;
pub mod site;

pub use facilities::{Enlisted, SimFacilities, SimFacility};
pub use site::{BuiltStructure, Commitment, SimSite, Worker};

use std::collections::BTreeMap;

use tracing::warn;

use crate::core::types::{SiteId, Tick};
use crate::site::registry::Territory;

#[derive(Debug, Clone, Default)]
pub struct SimWorld {
    pub tick: Tick,
    pub sites: BTreeMap<SiteId, SimSite>,
    pub facilities: SimFacilities,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_site(&mut self, id: SiteId, site: SimSite) {
        self.sites.insert(id, site);
    }

    pub fn site(&self, id: &SiteId) -> Option<&SimSite> {
        self.sites.get(id)
    }

    pub fn site_mut(&mut self, id: &SiteId) -> Option<&mut SimSite> {
        self.sites.get_mut(id)
    }

    /// Step the environment once, after every site has been ticked
    pub fn advance(&mut self) {
        self.tick += 1;

        for enlisted in self.facilities.advance() {
            let home = enlisted.request.site.clone();
            match self.sites.get_mut(&home) {
                Some(site) => site.add_worker(enlisted.name, enlisted.body, enlisted.request),
                None => warn!("{} enlisted for unknown site {}", enlisted.name, home),
            }
        }

        for site in self.sites.values_mut() {
            site.advance();
        }
    }
}

impl Territory for SimWorld {
    type Site = SimSite;
    type Facilities = SimFacilities;

    fn split_site(&mut self, site: &SiteId) -> Option<(&mut SimSite, &mut SimFacilities)> {
        let state = self.sites.get_mut(site)?;
        Some((state, &mut self.facilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FacilityId;
    use crate::population::roles::{BodyPart, Role, WorkerRequestSpec};
    use crate::site::controller::PopulationSource;
    use crate::spatial::terrain::TerrainMask;
    use crate::spawning::facility::FacilityRegistry;

    #[test]
    fn test_enlisted_worker_joins_requesting_site() {
        let home = SiteId::new("W1N1");
        let remote = SiteId::new("W2N1");
        let mut world = SimWorld::new();
        world.add_site(home.clone(), SimSite::new(TerrainMask::open()));
        world.add_site(remote.clone(), SimSite::new(TerrainMask::open()));
        world.facilities.add(SimFacility::new(FacilityId(1), home.clone(), 1000, 0));

        world
            .facilities
            .spawn(
                FacilityId(1),
                vec![BodyPart::Claim, BodyPart::Move],
                "claimer-x".into(),
                WorkerRequestSpec::claimer(remote.clone()),
            )
            .unwrap();

        world.advance();
        assert_eq!(world.tick, 1);
        assert_eq!(world.site(&remote).unwrap().population().count(Role::Claimer), Some(1));
        assert_eq!(world.site(&home).unwrap().population().count(Role::Claimer), None);
    }

    #[test]
    fn test_split_site_unknown() {
        let mut world = SimWorld::new();
        assert!(world.split_site(&SiteId::new("nowhere")).is_none());
    }
}
