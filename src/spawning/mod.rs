//! Spawning layer - production facilities and the request scheduler

pub mod facility;
pub mod scheduler;

pub use facility::{FacilityRegistry, FacilityStatus, SpawnRefusal, MAX_BODY_PARTS};
pub use scheduler::{eligible_facilities, try_spawn_next, SpawnCommitment};
