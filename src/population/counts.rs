//! Per-site population snapshot
//!
//! Owned and updated by whatever tracks worker lifecycles; the planner only
//! reads it.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::SourceId;
use crate::population::roles::Role;

/// Which workers are currently bound to one source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAssignment {
    pub driller: Option<String>,
    pub transporter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulationCounts {
    /// Workers alive per role; a missing entry means never recorded
    roles: AHashMap<Role, u32>,
    /// Assignment state per source
    sources: AHashMap<SourceId, SourceAssignment>,
}

impl PopulationCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded count for a role, `None` if never recorded
    pub fn count(&self, role: Role) -> Option<u32> {
        self.roles.get(&role).copied()
    }

    /// Whether the role has fewer than one worker (unrecorded counts as zero)
    pub fn is_missing(&self, role: Role) -> bool {
        self.count(role).unwrap_or(0) < 1
    }

    pub fn set_count(&mut self, role: Role, count: u32) {
        self.roles.insert(role, count);
    }

    pub fn increment(&mut self, role: Role) {
        *self.roles.entry(role).or_insert(0) += 1;
    }

    pub fn decrement(&mut self, role: Role) {
        if let Some(count) = self.roles.get_mut(&role) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn assignment(&self, source: &SourceId) -> Option<&SourceAssignment> {
        self.sources.get(source)
    }

    pub fn has_driller(&self, source: &SourceId) -> bool {
        self.assignment(source).is_some_and(|a| a.driller.is_some())
    }

    pub fn has_transporter(&self, source: &SourceId) -> bool {
        self.assignment(source).is_some_and(|a| a.transporter.is_some())
    }

    pub fn assign_driller(&mut self, source: SourceId, worker: impl Into<String>) {
        self.sources.entry(source).or_default().driller = Some(worker.into());
    }

    pub fn assign_transporter(&mut self, source: SourceId, worker: impl Into<String>) {
        self.sources.entry(source).or_default().transporter = Some(worker.into());
    }

    /// Drop every assignment held by the named worker
    pub fn release(&mut self, worker: &str) {
        for assignment in self.sources.values_mut() {
            if assignment.driller.as_deref() == Some(worker) {
                assignment.driller = None;
            }
            if assignment.transporter.as_deref() == Some(worker) {
                assignment.transporter = None;
            }
        }
    }
}
