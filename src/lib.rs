//! Site Steward - per-site control loop for a tick-driven territory simulation
//!
//! Plans the workforce a site needs, schedules spawns against production
//! facilities, tracks staffing adequacy, and drains a layered site plan into
//! construction commitments.

pub mod construction;
pub mod core;
pub mod plan;
pub mod population;
pub mod site;
pub mod spatial;
pub mod spawning;
pub mod world;
