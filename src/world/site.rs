//! Simulated per-site state: terrain, structures, commitments, workers

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::construction::{CommitmentRefusal, StructureIndex};
use crate::core::types::{Cell, StructureKind};
use crate::population::counts::PopulationCounts;
use crate::population::roles::{BodyPart, Role, RoleRequest, WorkerRequestSpec};
use crate::site::controller::PopulationSource;
use crate::site::satisfaction::ControlSignal;
use crate::spatial::terrain::{Terrain, TerrainMask};

/// Ticks a worker lives, counted from the start of its spawn
pub const WORKER_LIFETIME: u32 = 1500;

/// Build progress needed per commitment
pub const BUILD_WORK: u32 = 20;

/// Health restored per repairer per tick
pub const REPAIR_RATE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltStructure {
    pub kind: StructureKind,
    pub hits: u32,
    pub hits_max: u32,
}

impl BuiltStructure {
    pub fn new(kind: StructureKind) -> Self {
        let hits_max = match kind {
            StructureKind::Road => 5_000,
            StructureKind::Rampart => 10_000,
            StructureKind::Container => 250_000,
            _ => 1_000,
        };
        Self {
            kind,
            hits: hits_max,
            hits_max,
        }
    }

    pub fn is_damaged(&self) -> bool {
        self.hits < self.hits_max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub cell: Cell,
    pub kind: StructureKind,
    pub progress: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub name: String,
    pub body: Vec<BodyPart>,
    pub request: WorkerRequestSpec,
    pub ticks_to_live: u32,
}

impl Worker {
    pub fn role(&self) -> Role {
        self.request.role()
    }
}

/// Everything the control loop can observe about one site
#[derive(Debug, Clone)]
pub struct SimSite {
    pub terrain: TerrainMask,
    structures: AHashMap<Cell, Vec<BuiltStructure>>,
    commitments: Vec<Commitment>,
    population: PopulationCounts,
    workers: Vec<Worker>,
    controlled: bool,
}

impl SimSite {
    pub fn new(terrain: TerrainMask) -> Self {
        Self {
            terrain,
            structures: AHashMap::new(),
            commitments: Vec::new(),
            population: PopulationCounts::new(),
            workers: Vec::new(),
            controlled: true,
        }
    }

    /// Place a finished structure directly, skipping construction
    pub fn build_structure(&mut self, cell: Cell, kind: StructureKind) {
        self.structures.entry(cell).or_default().push(BuiltStructure::new(kind));
    }

    pub fn structure_count(&self) -> usize {
        self.structures.values().map(Vec::len).sum()
    }

    pub fn commitments(&self) -> &[Commitment] {
        &self.commitments
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Knock every structure on the cell down to half health
    pub fn damage(&mut self, cell: Cell) {
        if let Some(stack) = self.structures.get_mut(&cell) {
            for structure in stack {
                structure.hits = structure.hits_max / 2;
            }
        }
    }

    pub fn lose_control(&mut self) {
        self.controlled = false;
    }

    /// Count a newly enlisted worker and bind it to its source
    pub fn add_worker(&mut self, name: String, body: Vec<BodyPart>, request: WorkerRequestSpec) {
        self.population.increment(request.role());
        match &request.request {
            RoleRequest::Driller { source, .. } => self.population.assign_driller(source.clone(), name.clone()),
            RoleRequest::Transporter { source, .. } => {
                self.population.assign_transporter(source.clone(), name.clone())
            }
            _ => {}
        }
        debug!("{} joined {}", name, request.site);
        self.workers.push(Worker {
            name,
            body,
            request,
            ticks_to_live: WORKER_LIFETIME,
        });
    }

    fn count_role(&self, role: Role) -> u32 {
        self.workers.iter().filter(|w| w.role() == role).count() as u32
    }

    /// Age workers, then let builders and repairers do their work
    pub fn advance(&mut self) {
        for worker in &mut self.workers {
            worker.ticks_to_live = worker.ticks_to_live.saturating_sub(1);
        }
        let (alive, expired): (Vec<_>, Vec<_>) = self.workers.drain(..).partition(|w| w.ticks_to_live > 0);
        self.workers = alive;
        for worker in expired {
            trace!("{} expired", worker.name);
            self.population.decrement(worker.role());
            self.population.release(&worker.name);
        }

        let builders = self.count_role(Role::Builder);
        let mut finished = Vec::new();
        for commitment in &mut self.commitments {
            commitment.progress += 1 + builders;
            if commitment.progress >= BUILD_WORK {
                finished.push((commitment.cell, commitment.kind));
            }
        }
        self.commitments.retain(|c| c.progress < BUILD_WORK);
        for (cell, kind) in finished {
            debug!("finished {} at {}", kind, cell);
            self.build_structure(cell, kind);
        }

        let mut repair = self.count_role(Role::Repairer) * REPAIR_RATE;
        for structure in self.structures.values_mut().flatten() {
            if repair == 0 {
                break;
            }
            if structure.is_damaged() {
                let restored = repair.min(structure.hits_max - structure.hits);
                structure.hits += restored;
                repair -= restored;
            }
        }
    }
}

impl Terrain for SimSite {
    fn is_wall(&self, cell: Cell) -> bool {
        self.terrain.is_wall(cell)
    }
}

impl StructureIndex for SimSite {
    fn structures_at(&self, cell: Cell) -> Vec<StructureKind> {
        self.structures
            .get(&cell)
            .map(|stack| stack.iter().map(|s| s.kind).collect())
            .unwrap_or_default()
    }

    fn create_commitment(&mut self, cell: Cell, kind: StructureKind) -> Result<(), CommitmentRefusal> {
        if !self.controlled {
            return Err(CommitmentRefusal::NotPermitted { cell, kind });
        }
        if self.terrain.is_wall(cell) {
            return Err(CommitmentRefusal::Blocked(cell));
        }
        if self.commitments.iter().any(|c| c.cell == cell) {
            return Err(CommitmentRefusal::Occupied(cell));
        }
        self.commitments.push(Commitment { cell, kind, progress: 0 });
        Ok(())
    }

    fn count_active_commitments(&self) -> usize {
        self.commitments.len()
    }

    fn damaged_structure_count(&self) -> usize {
        self.structures.values().flatten().filter(|s| s.is_damaged()).count()
    }
}

impl ControlSignal for SimSite {
    fn controlled(&self) -> bool {
        self.controlled
    }
}

impl PopulationSource for SimSite {
    fn population(&self) -> &PopulationCounts {
        &self.population
    }
}
