//! Per-site state owned by the site registry

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::config::SiteConfig;
use crate::core::types::{Cell, SiteId, SiteKind};
use crate::plan::SitePlan;
use crate::population::roles::WorkerRequestSpec;
use crate::site::satisfaction::SatisfactionLog;
use crate::site::timer::IntervalTimer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: SiteId,
    pub kind: SiteKind,
    pub population_timer: IntervalTimer,
    pub construction_timer: IntervalTimer,
    pub satisfaction: SatisfactionLog,
    /// Recomputed every tick from `satisfaction`
    pub satisfied: bool,
    /// Set once control of the site is lost; never cleared
    pub dead: bool,
    /// Spawn queue, head first; replaced wholesale by each planning pass
    pub requested: VecDeque<WorkerRequestSpec>,
    pub plan: SitePlan,
    /// Where idle workers wait
    pub idle: Cell,
}

impl SiteRecord {
    /// New record with both timers primed
    ///
    /// The population timer starts at its period so the first planning pass
    /// happens on the second tick; the construction timer starts half-way.
    pub fn new(id: SiteId, kind: SiteKind, plan: SitePlan, idle: Cell, config: &SiteConfig) -> Self {
        Self {
            id,
            kind,
            population_timer: IntervalTimer::starting_at(config.population_period, config.population_period),
            construction_timer: IntervalTimer::starting_at(config.construction_period / 2, config.construction_period),
            satisfaction: SatisfactionLog::new(config.satisfaction_log_size),
            satisfied: false,
            dead: false,
            requested: VecDeque::new(),
            plan,
            idle,
        }
    }

    /// Swap in a freshly planned queue, dropping whatever was left
    pub fn replace_requests(&mut self, requests: Vec<WorkerRequestSpec>) {
        self.requested = requests.into();
    }
}
