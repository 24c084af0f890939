//! Population layer - worker roles, headcounts, and needs planning

pub mod counts;
pub mod planner;
pub mod roles;

pub use counts::{PopulationCounts, SourceAssignment};
pub use planner::{plan_population, PlanningContext};
pub use roles::{body_cost, scale_body, BodyPart, Role, RoleRequest, RoleTemplate, WorkerRequestSpec};
