//! Worker roles, their body templates, and spawn request payloads

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::types::{Cell, SiteId, SourceId};

/// A single body part of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Move,
    Work,
    Carry,
    Attack,
    RangedAttack,
    Heal,
    Claim,
    Tough,
}

impl BodyPart {
    /// Energy needed to grow this part
    pub fn cost(&self) -> u32 {
        match self {
            BodyPart::Move => 50,
            BodyPart::Work => 100,
            BodyPart::Carry => 50,
            BodyPart::Attack => 80,
            BodyPart::RangedAttack => 150,
            BodyPart::Heal => 250,
            BodyPart::Claim => 600,
            BodyPart::Tough => 10,
        }
    }
}

/// Total energy cost of a body
pub fn body_cost(body: &[BodyPart]) -> u32 {
    body.iter().map(BodyPart::cost).sum()
}

/// Replicate a body template `multiplier` times
pub fn scale_body(template: &[BodyPart], multiplier: u32) -> Vec<BodyPart> {
    let mut body = Vec::with_capacity(template.len() * multiplier as usize);
    for _ in 0..multiplier {
        body.extend_from_slice(template);
    }
    body
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[display(fmt = "driller")]
    Driller,
    #[display(fmt = "transporter")]
    Transporter,
    #[display(fmt = "builder")]
    Builder,
    #[display(fmt = "repairer")]
    Repairer,
    #[display(fmt = "claimer")]
    Claimer,
    #[display(fmt = "attacker")]
    Attacker,
    #[display(fmt = "healer")]
    Healer,
}

/// Static description of a role: the smallest useful body and what it costs
#[derive(Debug)]
pub struct RoleTemplate {
    pub role: Role,
    pub name: &'static str,
    pub body: &'static [BodyPart],
    /// Cost of one copy of `body`
    pub energy_cost: u32,
}

use BodyPart::*;

/// Role lookup table, indexed by `Role as usize`
static ROLE_TABLE: [RoleTemplate; 7] = [
    RoleTemplate {
        role: Role::Driller,
        name: "driller",
        body: &[Work, Work, Move],
        energy_cost: 250,
    },
    RoleTemplate {
        role: Role::Transporter,
        name: "transporter",
        body: &[Carry, Carry, Move],
        energy_cost: 150,
    },
    RoleTemplate {
        role: Role::Builder,
        name: "builder",
        body: &[Work, Carry, Move],
        energy_cost: 200,
    },
    RoleTemplate {
        role: Role::Repairer,
        name: "repairer",
        body: &[Work, Carry, Move],
        energy_cost: 200,
    },
    RoleTemplate {
        role: Role::Claimer,
        name: "claimer",
        body: &[Claim, Move],
        energy_cost: 650,
    },
    RoleTemplate {
        role: Role::Attacker,
        name: "attacker",
        body: &[Tough, Attack, Move],
        energy_cost: 140,
    },
    RoleTemplate {
        role: Role::Healer,
        name: "healer",
        body: &[Heal, Move],
        energy_cost: 300,
    },
];

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Driller,
        Role::Transporter,
        Role::Builder,
        Role::Repairer,
        Role::Claimer,
        Role::Attacker,
        Role::Healer,
    ];

    pub fn template(&self) -> &'static RoleTemplate {
        &ROLE_TABLE[*self as usize]
    }
}

/// Role tag plus the parameters that role needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleRequest {
    Driller { source: SourceId, container: Cell },
    Transporter { source: SourceId, container: Cell },
    Builder,
    Repairer,
    Claimer,
    Attacker,
    Healer,
}

impl RoleRequest {
    pub fn role(&self) -> Role {
        match self {
            RoleRequest::Driller { .. } => Role::Driller,
            RoleRequest::Transporter { .. } => Role::Transporter,
            RoleRequest::Builder => Role::Builder,
            RoleRequest::Repairer => Role::Repairer,
            RoleRequest::Claimer => Role::Claimer,
            RoleRequest::Attacker => Role::Attacker,
            RoleRequest::Healer => Role::Healer,
        }
    }
}

/// A queued request for one worker
///
/// The payload becomes the new worker's identity once spawned; the scheduler
/// only looks at the role to pick a body template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRequestSpec {
    pub site: SiteId,
    #[serde(flatten)]
    pub request: RoleRequest,
}

impl WorkerRequestSpec {
    pub fn new(site: SiteId, request: RoleRequest) -> Self {
        Self { site, request }
    }

    pub fn driller(site: SiteId, source: SourceId, container: Cell) -> Self {
        Self::new(site, RoleRequest::Driller { source, container })
    }

    pub fn transporter(site: SiteId, source: SourceId, container: Cell) -> Self {
        Self::new(site, RoleRequest::Transporter { source, container })
    }

    pub fn builder(site: SiteId) -> Self {
        Self::new(site, RoleRequest::Builder)
    }

    pub fn repairer(site: SiteId) -> Self {
        Self::new(site, RoleRequest::Repairer)
    }

    pub fn claimer(site: SiteId) -> Self {
        Self::new(site, RoleRequest::Claimer)
    }

    pub fn attacker(site: SiteId) -> Self {
        Self::new(site, RoleRequest::Attacker)
    }

    pub fn healer(site: SiteId) -> Self {
        Self::new(site, RoleRequest::Healer)
    }

    pub fn role(&self) -> Role {
        self.request.role()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_role() {
        for role in Role::ALL {
            let template = role.template();
            assert_eq!(template.role, role);
            assert_eq!(template.name, role.to_string());
        }
    }

    #[test]
    fn test_template_costs_match_bodies() {
        for role in Role::ALL {
            let template = role.template();
            assert_eq!(body_cost(template.body), template.energy_cost, "{role}");
        }
    }

    #[test]
    fn test_scale_body() {
        let body = scale_body(&[Work, Move], 3);
        assert_eq!(body, vec![Work, Move, Work, Move, Work, Move]);
        assert!(scale_body(&[Work], 0).is_empty());
        assert_eq!(body_cost(&body), 450);
    }

    #[test]
    fn test_request_role_tags() {
        let site = SiteId::new("W1N1");
        let driller = WorkerRequestSpec::driller(site.clone(), SourceId::new("s"), Cell::new(3, 3));
        assert_eq!(driller.role(), Role::Driller);
        assert_eq!(WorkerRequestSpec::healer(site).role(), Role::Healer);
    }

    #[test]
    fn test_request_serializes_with_role_tag() {
        let spec = WorkerRequestSpec::transporter(SiteId::new("W2N2"), SourceId::new("s1"), Cell::new(4, 5));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["role"], "transporter");
        assert_eq!(json["site"], "W2N2");
        assert_eq!(json["source"], "s1");

        let back: WorkerRequestSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }
}
