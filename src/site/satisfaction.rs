//! Satisfaction tracking - rolling window of staffing adequacy
//!
//! Each tick records whether the spawn queue was empty (demand met, stored as
//! 0) or not (demand unmet, stored as 1). A site is satisfied when the met
//! fraction of the window is strictly above the configured threshold.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::SiteConfig;
use crate::site::record::SiteRecord;

/// Whether this process still holds the site's governing structure
pub trait ControlSignal {
    fn controlled(&self) -> bool;
}

/// Bounded FIFO of per-tick samples, 1 = unmet demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSatisfactionLog")]
pub struct SatisfactionLog {
    samples: VecDeque<u8>,
    capacity: usize,
}

/// Unchecked wire form of [`SatisfactionLog`]
#[derive(Deserialize)]
struct RawSatisfactionLog {
    samples: VecDeque<u8>,
    capacity: usize,
}

impl TryFrom<RawSatisfactionLog> for SatisfactionLog {
    type Error = String;

    /// Rejects a zero capacity or non-binary samples; keeps only the newest `capacity` samples
    fn try_from(raw: RawSatisfactionLog) -> Result<Self, Self::Error> {
        if raw.capacity == 0 {
            return Err("satisfaction log capacity must be greater than 0".into());
        }
        if let Some(bad) = raw.samples.iter().find(|&&s| s > 1) {
            return Err(format!("satisfaction sample must be 0 or 1, got {bad}"));
        }
        let mut samples = raw.samples;
        while samples.len() > raw.capacity {
            samples.pop_front();
        }
        Ok(Self {
            samples,
            capacity: raw.capacity,
        })
    }
}

impl SatisfactionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest ones beyond capacity
    pub fn record(&mut self, unmet: bool) {
        self.samples.push_back(u8::from(unmet));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fraction of samples with demand met; an empty log counts as fully met
    pub fn met_ratio(&self) -> f64 {
        if self.samples.is_empty() {
            return 1.0;
        }
        let met = self.samples.iter().filter(|&&s| s == 0).count();
        met as f64 / self.samples.len() as f64
    }

    pub fn samples(&self) -> impl Iterator<Item = u8> + '_ {
        self.samples.iter().copied()
    }
}

/// Log this tick's adequacy, refresh `satisfied`, and check for control loss
///
/// Must run before the spawn scheduler so it sees the pre-spawn queue.
/// Returns true if the site was lost on this tick.
pub fn track_satisfaction(record: &mut SiteRecord, control: &impl ControlSignal, config: &SiteConfig) -> bool {
    let unmet = !record.requested.is_empty();
    record.satisfaction.record(unmet);
    record.satisfied = record.satisfaction.met_ratio() > config.satisfaction_threshold;

    if !record.dead && !control.controlled() {
        warn!("{}: control lost, marking site dead", record.id);
        record.dead = true;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Cell, SiteId, SiteKind};
    use crate::plan::SitePlan;
    use crate::population::roles::WorkerRequestSpec;

    struct Control(bool);

    impl ControlSignal for Control {
        fn controlled(&self) -> bool {
            self.0
        }
    }

    fn record() -> SiteRecord {
        SiteRecord::new(
            SiteId::new("W1N1"),
            SiteKind::Expansion,
            SitePlan::new(),
            Cell::new(25, 25),
            &SiteConfig::default(),
        )
    }

    fn log_of(met: usize, unmet: usize) -> SatisfactionLog {
        let mut log = SatisfactionLog::new(100);
        for _ in 0..met {
            log.record(false);
        }
        for _ in 0..unmet {
            log.record(true);
        }
        log
    }

    #[test]
    fn test_log_evicts_oldest() {
        let mut log = SatisfactionLog::new(3);
        log.record(true);
        log.record(false);
        log.record(false);
        log.record(false);
        assert_eq!(log.len(), 3);
        assert_eq!(log.samples().collect::<Vec<_>>(), vec![0, 0, 0]);
    }

    #[test]
    fn test_overfull_log_loads_trimmed_to_newest() {
        let log: SatisfactionLog = serde_json::from_str(r#"{"samples":[1,1,0,1,0],"capacity":3}"#).unwrap();
        assert_eq!(log.capacity(), 3);
        assert_eq!(log.samples().collect::<Vec<_>>(), vec![0, 1, 0]);

        let reloaded: SatisfactionLog = serde_json::from_str(&serde_json::to_string(&log).unwrap()).unwrap();
        assert_eq!(reloaded, log);
    }

    #[test]
    fn test_invalid_log_rejected_on_load() {
        assert!(serde_json::from_str::<SatisfactionLog>(r#"{"samples":[],"capacity":0}"#).is_err());
        assert!(serde_json::from_str::<SatisfactionLog>(r#"{"samples":[0,2],"capacity":5}"#).is_err());
    }

    #[test]
    fn test_record_with_zero_capacity_log_rejected() {
        let mut value = serde_json::to_value(record()).unwrap();
        value["satisfaction"]["capacity"] = serde_json::json!(0);
        assert!(serde_json::from_value::<SiteRecord>(value).is_err());
    }

    #[test]
    fn test_empty_log_is_fully_met() {
        assert_eq!(SatisfactionLog::new(100).met_ratio(), 1.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = SiteConfig::default();
        assert!(log_of(91, 9).met_ratio() > config.satisfaction_threshold);
        assert!(!(log_of(90, 10).met_ratio() > config.satisfaction_threshold));
    }

    #[test]
    fn test_track_records_queue_state() {
        let config = SiteConfig::default();
        let mut record = record();

        track_satisfaction(&mut record, &Control(true), &config);
        assert_eq!(record.satisfaction.samples().last(), Some(0));
        assert!(record.satisfied);

        record.requested.push_back(WorkerRequestSpec::healer(record.id.clone()));
        track_satisfaction(&mut record, &Control(true), &config);
        assert_eq!(record.satisfaction.samples().last(), Some(1));
        // 1 of 2 met
        assert!(!record.satisfied);
    }

    #[test]
    fn test_satisfied_flips_at_ninety_one_percent() {
        let config = SiteConfig::default();
        let mut record = record();
        record.satisfaction = log_of(92, 8);

        // One more unmet sample evicts a met one: 91 met, 9 unmet
        record.requested.push_back(WorkerRequestSpec::healer(record.id.clone()));
        track_satisfaction(&mut record, &Control(true), &config);
        assert!(record.satisfied);

        // 90 met, 10 unmet
        track_satisfaction(&mut record, &Control(true), &config);
        assert!(!record.satisfied);
        assert_eq!(record.satisfaction.len(), 100);
    }

    #[test]
    fn test_control_loss_is_terminal() {
        let config = SiteConfig::default();
        let mut record = record();

        assert!(track_satisfaction(&mut record, &Control(false), &config));
        assert!(record.dead);

        assert!(!track_satisfaction(&mut record, &Control(true), &config));
        assert!(record.dead);
    }
}
