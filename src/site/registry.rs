//! Site registry - owns every site record and drives their ticks

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::core::config::SiteConfig;
use crate::core::error::{Result, SiteError};
use crate::core::types::SiteId;
use crate::site::controller::{SiteController, SiteState, TickReport};
use crate::site::record::SiteRecord;
use crate::spawning::facility::FacilityRegistry;

/// The controlled territory: per-site state plus the shared facilities
pub trait Territory {
    type Site: SiteState;
    type Facilities: FacilityRegistry;

    /// Borrow one site's state together with the facility registry
    fn split_site(&mut self, site: &SiteId) -> Option<(&mut Self::Site, &mut Self::Facilities)>;
}

/// Records keyed by site, ticked in site order
#[derive(Debug, Default)]
pub struct SiteRegistry {
    records: BTreeMap<SiteId, SiteRecord>,
    controller: SiteController,
}

impl SiteRegistry {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            records: BTreeMap::new(),
            controller: SiteController::new(config),
        }
    }

    /// Take ownership of a record; its plan must support its kind
    pub fn register(&mut self, record: SiteRecord) -> Result<()> {
        if self.records.contains_key(&record.id) {
            return Err(SiteError::DuplicateSite(record.id));
        }
        if !record.plan.supports(record.kind) {
            return Err(SiteError::UnsupportedKind(record.id, record.kind));
        }
        info!("registered {:?} site {}", record.kind, record.id);
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn get(&self, site: &SiteId) -> Option<&SiteRecord> {
        self.records.get(site)
    }

    pub fn records(&self) -> impl Iterator<Item = &SiteRecord> {
        self.records.values()
    }

    pub fn live_sites(&self) -> impl Iterator<Item = &SiteId> {
        self.records.values().filter(|r| !r.dead).map(|r| &r.id)
    }

    /// Tick a single site; dead sites are not ticked
    pub fn tick_site<T: Territory>(&mut self, site: &SiteId, territory: &mut T) -> Result<Option<TickReport>> {
        let record = self
            .records
            .get_mut(site)
            .ok_or_else(|| SiteError::SiteNotFound(site.clone()))?;
        if record.dead {
            return Ok(None);
        }
        let (state, facilities) = territory
            .split_site(site)
            .ok_or_else(|| SiteError::SiteNotFound(site.clone()))?;

        Ok(Some(self.controller.tick(record, state, facilities)))
    }

    /// Tick every live site once
    pub fn tick<T: Territory>(&mut self, territory: &mut T) -> Vec<(SiteId, TickReport)> {
        let sites: Vec<SiteId> = self.live_sites().cloned().collect();
        let mut reports = Vec::with_capacity(sites.len());

        for site in sites {
            match self.tick_site(&site, territory) {
                Ok(Some(report)) => reports.push((site, report)),
                Ok(None) => {}
                Err(e) => warn!("skipping {}: {}", site, e),
            }
        }
        reports
    }

    /// Drop dead records, returning their ids
    pub fn prune_dead(&mut self) -> Vec<SiteId> {
        let dead: Vec<SiteId> = self.records.values().filter(|r| r.dead).map(|r| r.id.clone()).collect();
        for site in &dead {
            self.records.remove(site);
        }
        dead
    }
}
