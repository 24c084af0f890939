//! Site controller configuration with documented constants
//!
//! Every tunable of the control loop lives here. Values can be loaded from a
//! TOML file; any field left out falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SiteError};
use crate::spawning::facility::MAX_BODY_PARTS;

/// How the spawn scheduler picks a body size among the feasible multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySearch {
    /// Commit the largest feasible multiplier and stop scanning
    #[default]
    Largest,
    /// Keep scanning down and commit the last feasible multiplier seen,
    /// which is the smallest one
    Smallest,
}

/// Configuration for one site controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // === TIMERS ===
    /// Ticks between population planning passes
    ///
    /// The timer fires when its counter is strictly greater than the period,
    /// so a freshly reset timer fires `period + 2` ticks later.
    pub population_period: u32,

    /// Ticks between construction materialization passes
    pub construction_period: u32,

    // === SATISFACTION ===
    /// Fraction of recent ticks that must have had no unmet demand
    ///
    /// Compared with `>`: a met ratio exactly equal to the threshold is not
    /// satisfied.
    pub satisfaction_threshold: f64,

    /// Number of samples kept in the rolling satisfaction window
    pub satisfaction_log_size: usize,

    // === CONSTRUCTION ===
    /// Ceiling on concurrently active construction commitments in a site
    pub commitment_cap: usize,

    // === SPAWNING ===
    /// Largest body multiplier tried by the spawn scheduler
    pub max_body_multiplier: u32,

    /// Which feasible multiplier gets committed
    pub body_search: BodySearch,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            population_period: 10,
            construction_period: 50,
            satisfaction_threshold: 0.9,
            satisfaction_log_size: 100,
            commitment_cap: 5,
            max_body_multiplier: 10,
            body_search: BodySearch::Largest,
        }
    }
}

impl SiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.satisfaction_threshold) {
            return Err(SiteError::Config(format!(
                "satisfaction_threshold ({}) must be within [0, 1]",
                self.satisfaction_threshold
            )));
        }

        if self.satisfaction_log_size == 0 {
            return Err(SiteError::Config("satisfaction_log_size must be positive".into()));
        }

        if self.max_body_multiplier == 0 {
            return Err(SiteError::Config("max_body_multiplier must be at least 1".into()));
        }

        if self.max_body_multiplier as usize > MAX_BODY_PARTS {
            return Err(SiteError::Config(format!(
                "max_body_multiplier ({}) cannot exceed the {} part body limit",
                self.max_body_multiplier, MAX_BODY_PARTS
            )));
        }

        if self.commitment_cap == 0 {
            return Err(SiteError::Config("commitment_cap must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SiteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_period, 10);
        assert_eq!(config.construction_period, 50);
        assert_eq!(config.satisfaction_log_size, 100);
        assert_eq!(config.commitment_cap, 5);
        assert_eq!(config.max_body_multiplier, 10);
        assert_eq!(config.body_search, BodySearch::Largest);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = SiteConfig::parse_toml(
            r#"
            population_period = 20
            body_search = "smallest"
            "#,
        )
        .unwrap();

        assert_eq!(config.population_period, 20);
        assert_eq!(config.body_search, BodySearch::Smallest);
        assert_eq!(config.construction_period, 50);
        assert!((config.satisfaction_threshold - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = SiteConfig::parse_toml("satisfaction_threshold = 1.5");
        assert!(matches!(result, Err(SiteError::Config(_))));
    }

    #[test]
    fn test_zero_log_size_rejected() {
        let config = SiteConfig {
            satisfaction_log_size: 0,
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_multiplier_rejected() {
        let result = SiteConfig::parse_toml("max_body_multiplier = 4294967295");
        assert!(matches!(result, Err(SiteError::Config(_))));

        let at_limit = SiteConfig {
            max_body_multiplier: MAX_BODY_PARTS as u32,
            ..SiteConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = SiteConfig::parse_toml("population_period = \"ten\"");
        assert!(matches!(result, Err(SiteError::TomlError(_))));
    }

    #[test]
    fn test_load_sample_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/site.toml");
        let config = SiteConfig::load_from_toml(&path).expect("sample config should load");
        assert!(config.validate().is_ok());
    }
}
