//! Site layer - per-site records, the control loop, and the registry

pub mod controller;
pub mod record;
pub mod registry;
pub mod satisfaction;
pub mod timer;

pub use controller::{PopulationSource, SiteController, SiteState, TickReport};
pub use record::SiteRecord;
pub use registry::{SiteRegistry, Territory};
pub use satisfaction::{track_satisfaction, ControlSignal, SatisfactionLog};
pub use timer::IntervalTimer;
