//! Site controller - the per-tick control loop of one site
//!
//! Order within a tick:
//! 1. population timer; on firing, replan the spawn queue
//! 2. satisfaction tracking (sees the pre-spawn queue)
//! 3. one spawn attempt if the queue is non-empty
//! 4. construction timer; on firing, materialize the plan

use tracing::{debug, info};

use crate::construction::{materialize, MaterializeReport, StructureIndex};
use crate::core::config::SiteConfig;
use crate::population::counts::PopulationCounts;
use crate::population::planner::{plan_population, PlanningContext};
use crate::site::record::SiteRecord;
use crate::site::satisfaction::{track_satisfaction, ControlSignal};
use crate::spawning::facility::FacilityRegistry;
use crate::spawning::scheduler::{try_spawn_next, SpawnCommitment};

/// Current workforce of a site, maintained by the worker lifecycle
pub trait PopulationSource {
    fn population(&self) -> &PopulationCounts;
}

/// Everything the controller reads and writes about one site
pub trait SiteState: StructureIndex + ControlSignal + PopulationSource {}

impl<T: StructureIndex + ControlSignal + PopulationSource> SiteState for T {}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Size of the new queue, if the planner ran
    pub planned: Option<usize>,
    pub spawned: Option<SpawnCommitment>,
    /// Present if the construction timer fired
    pub materialized: Option<MaterializeReport>,
    pub satisfied: bool,
    /// Control was lost on this tick
    pub died: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SiteController {
    config: SiteConfig,
}

impl SiteController {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Recompute the spawn queue from the current site state
    pub fn refresh_population<S: SiteState>(&self, record: &mut SiteRecord, site: &S) -> usize {
        let ctx = PlanningContext {
            site: &record.id,
            plan: &record.plan,
            active_commitments: site.count_active_commitments(),
            damaged_structures: site.damaged_structure_count(),
        };
        let requests = plan_population(&ctx, site.population());
        let count = requests.len();
        record.replace_requests(requests);
        debug!("{}: planned {} spawn requests", record.id, count);
        count
    }

    /// Run one tick of the control loop
    pub fn tick<S: SiteState, F: FacilityRegistry>(
        &self,
        record: &mut SiteRecord,
        site: &mut S,
        facilities: &mut F,
    ) -> TickReport {
        let mut report = TickReport::default();

        if record.population_timer.advance() {
            report.planned = Some(self.refresh_population(record, &*site));
        }

        report.died = track_satisfaction(record, &*site, &self.config);
        report.satisfied = record.satisfied;

        if !record.requested.is_empty() {
            report.spawned = try_spawn_next(
                &record.id,
                record.kind.spawns_globally(),
                &mut record.requested,
                facilities,
                &self.config,
            );
            if let Some(commitment) = &report.spawned {
                info!("{}: committed {} at {}", record.id, commitment.name, commitment.facility);
            }
        }

        if record.construction_timer.advance() {
            report.materialized = Some(materialize(&record.plan, site, self.config.commitment_cap));
        }

        report
    }
}
