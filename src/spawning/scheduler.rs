//! Spawn scheduling - realizes the head of a site's request queue
//!
//! At most one worker is committed per call. The body is the role template
//! replicated `m` times, with `m` searched from `max_body_multiplier` down to
//! 1 using dry runs against the first eligible facility.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::core::config::{BodySearch, SiteConfig};
use crate::core::types::{FacilityId, SiteId};
use crate::population::roles::{body_cost, scale_body, WorkerRequestSpec};
use crate::spawning::facility::{FacilityRegistry, FacilityStatus, MAX_BODY_PARTS};

/// A worker that was committed this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnCommitment {
    pub facility: FacilityId,
    pub name: String,
    pub multiplier: u32,
    pub energy_cost: u32,
    pub request: WorkerRequestSpec,
}

/// Facilities that could grow at least the minimal body for this request
///
/// A facility qualifies when it is idle and holds strictly more energy than
/// one copy of the role template costs. Unless `global` is set it must also
/// belong to `site`.
pub fn eligible_facilities<R: FacilityRegistry>(
    registry: &R,
    request: &WorkerRequestSpec,
    site: &SiteId,
    global: bool,
) -> Vec<FacilityStatus> {
    let minimum = request.role().template().energy_cost;
    registry
        .facilities()
        .into_iter()
        .filter(|f| global || &f.site == site)
        .filter(|f| f.idle && f.energy_available > minimum)
        .collect()
}

/// Pick the body multiplier to commit, by dry-running every candidate
fn search_multiplier<R: FacilityRegistry>(
    registry: &R,
    facility: FacilityId,
    request: &WorkerRequestSpec,
    config: &SiteConfig,
) -> Option<u32> {
    let template = request.role().template();
    let fits = (MAX_BODY_PARTS / template.body.len().max(1)) as u32;
    let mut chosen = None;

    for multiplier in (1..=config.max_body_multiplier.min(fits)).rev() {
        let body = scale_body(template.body, multiplier);
        match registry.check_spawn(facility, &body) {
            Ok(()) => {
                chosen = Some(multiplier);
                if config.body_search == BodySearch::Largest {
                    break;
                }
            }
            Err(refusal) => trace!("{} x{} refused by {}: {}", template.name, multiplier, facility, refusal),
        }
    }

    chosen
}

/// Try to realize the request at the head of `queue`
///
/// On success the request is popped and the commitment returned. `None`
/// means nothing was committed this tick and the queue is untouched.
pub fn try_spawn_next<R: FacilityRegistry>(
    site: &SiteId,
    global: bool,
    queue: &mut VecDeque<WorkerRequestSpec>,
    registry: &mut R,
    config: &SiteConfig,
) -> Option<SpawnCommitment> {
    let request = queue.front()?;

    let facility = match eligible_facilities(registry, request, site, global).into_iter().next() {
        Some(f) => f.id,
        None => {
            trace!("{}: no facility can spawn a {} yet", site, request.role());
            return None;
        }
    };

    let multiplier = match search_multiplier(registry, facility, request, config) {
        Some(m) => m,
        None => {
            debug!("{}: no feasible body for {} at {}", site, request.role(), facility);
            return None;
        }
    };

    let template = request.role().template();
    let body = scale_body(template.body, multiplier);
    let energy_cost = body_cost(&body);
    let name = format!("{}-{}", template.name, Uuid::new_v4().simple());

    if let Err(refusal) = registry.spawn(facility, body, name.clone(), request.clone()) {
        warn!("{}: {} refused a checked spawn of {}: {}", site, facility, name, refusal);
        return None;
    }

    let request = queue.pop_front()?;
    debug!("{}: spawning {} (x{}, {} energy) at {}", site, name, multiplier, energy_cost, facility);

    Some(SpawnCommitment {
        facility,
        name,
        multiplier,
        energy_cost,
        request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::roles::{BodyPart, Role};
    use crate::spawning::facility::SpawnRefusal;

    /// Registry with fixed facilities that records every commit
    #[derive(Default)]
    struct StubRegistry {
        facilities: Vec<FacilityStatus>,
        committed: Vec<(FacilityId, usize, String)>,
    }

    impl StubRegistry {
        fn with(facilities: Vec<FacilityStatus>) -> Self {
            Self {
                facilities,
                ..Self::default()
            }
        }
    }

    impl FacilityRegistry for StubRegistry {
        fn facilities(&self) -> Vec<FacilityStatus> {
            self.facilities.clone()
        }

        fn check_spawn(&self, facility: FacilityId, body: &[BodyPart]) -> Result<(), SpawnRefusal> {
            let status = self
                .facilities
                .iter()
                .find(|f| f.id == facility)
                .ok_or(SpawnRefusal::UnknownFacility(facility))?;
            if body.len() > MAX_BODY_PARTS {
                return Err(SpawnRefusal::BodyTooLarge(body.len()));
            }
            let needed = body_cost(body);
            if needed > status.energy_available {
                return Err(SpawnRefusal::NotEnoughEnergy {
                    needed,
                    available: status.energy_available,
                });
            }
            Ok(())
        }

        fn spawn(
            &mut self,
            facility: FacilityId,
            body: Vec<BodyPart>,
            name: String,
            _request: WorkerRequestSpec,
        ) -> Result<(), SpawnRefusal> {
            self.check_spawn(facility, &body)?;
            self.committed.push((facility, body.len(), name));
            if let Some(f) = self.facilities.iter_mut().find(|f| f.id == facility) {
                f.idle = false;
            }
            Ok(())
        }
    }

    fn facility(id: u32, site: &str, energy: u32) -> FacilityStatus {
        FacilityStatus {
            id: FacilityId(id),
            site: SiteId::new(site),
            idle: true,
            energy_available: energy,
        }
    }

    fn queue_of(requests: Vec<WorkerRequestSpec>) -> VecDeque<WorkerRequestSpec> {
        requests.into_iter().collect()
    }

    #[test]
    fn test_largest_feasible_body_committed() {
        let site = SiteId::new("W1N1");
        let mut registry = StubRegistry::with(vec![facility(1, "W1N1", 500)]);
        let mut queue = queue_of(vec![WorkerRequestSpec::attacker(site.clone())]);

        let commitment = try_spawn_next(&site, false, &mut queue, &mut registry, &SiteConfig::default()).unwrap();

        // Attacker template costs 140: 3 copies = 420 fit in 500, 4 do not
        assert_eq!(commitment.multiplier, 3);
        assert_eq!(commitment.energy_cost, 420);
        assert!(commitment.name.starts_with("attacker-"));
        assert!(queue.is_empty());
        assert_eq!(registry.committed.len(), 1);
        assert_eq!(registry.committed[0].1, 9);
    }

    #[test]
    fn test_smallest_strategy_commits_last_feasible() {
        let site = SiteId::new("W1N1");
        let mut registry = StubRegistry::with(vec![facility(1, "W1N1", 500)]);
        let mut queue = queue_of(vec![WorkerRequestSpec::attacker(site.clone())]);
        let config = SiteConfig {
            body_search: BodySearch::Smallest,
            ..SiteConfig::default()
        };

        let commitment = try_spawn_next(&site, false, &mut queue, &mut registry, &config).unwrap();
        assert_eq!(commitment.multiplier, 1);
        assert_eq!(registry.committed.len(), 1, "exactly one commitment");
    }

    #[test]
    fn test_body_part_limit_caps_multiplier() {
        let site = SiteId::new("W1N1");
        // Plenty of energy; 10 copies of a 3-part body would still fit, 17 would not
        let mut registry = StubRegistry::with(vec![facility(1, "W1N1", 100_000)]);
        let mut queue = queue_of(vec![WorkerRequestSpec::attacker(site.clone())]);
        let config = SiteConfig {
            max_body_multiplier: 20,
            ..SiteConfig::default()
        };

        let commitment = try_spawn_next(&site, false, &mut queue, &mut registry, &config).unwrap();
        assert_eq!(commitment.multiplier, 16);
    }

    #[test]
    fn test_unbounded_multiplier_stops_at_part_limit() {
        let site = SiteId::new("W1N1");
        let mut registry = StubRegistry::with(vec![facility(1, "W1N1", 100_000)]);
        let mut queue = queue_of(vec![WorkerRequestSpec::healer(site.clone())]);
        // Not validated; the search itself must not scan past 50 parts
        let config = SiteConfig {
            max_body_multiplier: u32::MAX,
            ..SiteConfig::default()
        };

        let commitment = try_spawn_next(&site, false, &mut queue, &mut registry, &config).unwrap();
        assert_eq!(commitment.multiplier, 25);
        assert_eq!(registry.committed[0].1, MAX_BODY_PARTS);
    }

    #[test]
    fn test_no_eligible_facility_leaves_queue() {
        let site = SiteId::new("W1N1");
        // Claimer minimum is 650; strictly more is required
        let mut registry = StubRegistry::with(vec![facility(1, "W1N1", 650)]);
        let mut queue = queue_of(vec![
            WorkerRequestSpec::claimer(site.clone()),
            WorkerRequestSpec::attacker(site.clone()),
        ]);

        assert!(try_spawn_next(&site, false, &mut queue, &mut registry, &SiteConfig::default()).is_none());
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].role(), Role::Claimer);
        assert!(registry.committed.is_empty());
    }

    #[test]
    fn test_busy_facility_not_eligible() {
        let site = SiteId::new("W1N1");
        let mut busy = facility(1, "W1N1", 5000);
        busy.idle = false;
        let registry = StubRegistry::with(vec![busy, facility(2, "W1N1", 5000)]);
        let request = WorkerRequestSpec::healer(site.clone());

        let eligible = eligible_facilities(&registry, &request, &site, false);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, FacilityId(2));
    }

    #[test]
    fn test_local_request_ignores_other_sites() {
        let site = SiteId::new("W1N1");
        let mut registry = StubRegistry::with(vec![facility(7, "W2N1", 5000)]);
        let mut queue = queue_of(vec![WorkerRequestSpec::healer(site.clone())]);

        assert!(try_spawn_next(&site, false, &mut queue, &mut registry, &SiteConfig::default()).is_none());

        let commitment = try_spawn_next(&site, true, &mut queue, &mut registry, &SiteConfig::default()).unwrap();
        assert_eq!(commitment.facility, FacilityId(7));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_first_eligible_facility_wins() {
        let site = SiteId::new("W1N1");
        let mut registry = StubRegistry::with(vec![facility(3, "W1N1", 400), facility(4, "W1N1", 5000)]);
        let mut queue = queue_of(vec![WorkerRequestSpec::transporter(
            site.clone(),
            crate::core::types::SourceId::new("s"),
            crate::core::types::Cell::new(1, 1),
        )]);

        let commitment = try_spawn_next(&site, false, &mut queue, &mut registry, &SiteConfig::default()).unwrap();
        assert_eq!(commitment.facility, FacilityId(3));
        assert_eq!(commitment.multiplier, 2);
    }

    #[test]
    fn test_empty_queue() {
        let site = SiteId::new("W1N1");
        let mut registry = StubRegistry::with(vec![facility(1, "W1N1", 5000)]);
        let mut queue = VecDeque::new();
        assert!(try_spawn_next(&site, false, &mut queue, &mut registry, &SiteConfig::default()).is_none());
        assert!(registry.committed.is_empty());
    }
}
