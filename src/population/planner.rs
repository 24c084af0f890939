//! Population needs planning
//!
//! Compares the current workforce against what the site needs and produces
//! the spawn queue. The order of the queue is the fulfillment priority.

use crate::core::types::SiteId;
use crate::plan::SitePlan;
use crate::population::counts::PopulationCounts;
use crate::population::roles::{Role, WorkerRequestSpec};

/// Site state the planner derives needs from
#[derive(Debug, Clone, Copy)]
pub struct PlanningContext<'a> {
    pub site: &'a SiteId,
    pub plan: &'a SitePlan,
    /// Construction commitments currently in progress
    pub active_commitments: usize,
    /// Structures below full health
    pub damaged_structures: usize,
}

/// Build the spawn queue for a site
///
/// Emission order:
/// 1. claimer, if none exists
/// 2. per planned source: driller then transporter, each if unassigned
/// 3. builder, if anything is under construction and no builder exists
/// 4. repairer, if anything is damaged and no repairer exists
/// 5. attacker, then healer, each if none exists
pub fn plan_population(ctx: &PlanningContext<'_>, counts: &PopulationCounts) -> Vec<WorkerRequestSpec> {
    let site = ctx.site;
    let mut requests = Vec::new();

    if counts.is_missing(Role::Claimer) {
        requests.push(WorkerRequestSpec::claimer(site.clone()));
    }

    for source in &ctx.plan.sources {
        if !counts.has_driller(&source.id) {
            requests.push(WorkerRequestSpec::driller(site.clone(), source.id.clone(), source.container));
        }
        if !counts.has_transporter(&source.id) {
            requests.push(WorkerRequestSpec::transporter(site.clone(), source.id.clone(), source.container));
        }
    }

    if ctx.active_commitments > 0 && counts.is_missing(Role::Builder) {
        requests.push(WorkerRequestSpec::builder(site.clone()));
    }

    if ctx.damaged_structures > 0 && counts.is_missing(Role::Repairer) {
        requests.push(WorkerRequestSpec::repairer(site.clone()));
    }

    if counts.is_missing(Role::Attacker) {
        requests.push(WorkerRequestSpec::attacker(site.clone()));
    }

    if counts.is_missing(Role::Healer) {
        requests.push(WorkerRequestSpec::healer(site.clone()));
    }

    requests
}
