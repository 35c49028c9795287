//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to `config.toml`.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command line flags in the host binary (seed, speed, save path)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [engine]
//! history_cap = 200
//! cycle_length = 100
//! migration_interval = 10
//! hunt_draw = "AlwaysDraw"
//!
//! [scheduler]
//! speed = 5
//!
//! [persistence]
//! path = "save.json"
//! ```

use crate::events::EventPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether a failed hunt (empty prey pool) still consumes the prey-index draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HuntDrawPolicy {
    /// Draw the prey index even when the pool is empty. Keeps the number of
    /// draws per hunt fixed.
    #[default]
    AlwaysDraw,
    /// Skip the prey-index draw when there is nothing to catch.
    SkipWhenEmpty,
}

/// When a consumer pays the reproduction energy cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BreedCostPolicy {
    /// Charged as soon as the breed-rate roll succeeds.
    #[default]
    OnBreedRoll,
    /// Charged only when the density-damping roll also succeeds.
    OnBirth,
}

/// Tick engine parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum samples kept per history series.
    pub history_cap: usize,
    /// Ticks per seasonal sunlight cycle.
    pub cycle_length: u64,
    /// Migration runs on ticks divisible by this. 0 disables migration.
    pub migration_interval: u64,
    pub migration_chance: f64,
    /// A consumer may migrate in only when some diet species exceeds this.
    pub migration_food_threshold: usize,
    /// Density-damping capacity for producers.
    pub producer_capacity: f64,
    /// Density-damping capacity for consumers.
    pub consumer_capacity: f64,
    /// Lower bound of the density-damping factor.
    pub min_breed_factor: f64,
    /// Newborn producer energy as a fraction of `max_energy`.
    pub producer_birth_energy: f64,
    /// Newborn consumer energy as a fraction of `max_energy`.
    pub consumer_birth_energy: f64,
    /// Parent energy multiplier after consumer reproduction.
    pub breed_cost_factor: f64,
    pub hunt_draw: HuntDrawPolicy,
    pub breed_cost: BreedCostPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_cap: 200,
            cycle_length: 100,
            migration_interval: 10,
            migration_chance: 0.10,
            migration_food_threshold: 10,
            producer_capacity: 200.0,
            consumer_capacity: 100.0,
            min_breed_factor: 0.1,
            producer_birth_energy: 0.5,
            consumer_birth_energy: 0.6,
            breed_cost_factor: 0.7,
            hunt_draw: HuntDrawPolicy::AlwaysDraw,
            breed_cost: BreedCostPolicy::OnBreedRoll,
        }
    }
}

/// Periodic tick scheduling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Speed level 1..=10, see [`tick_interval_ms`].
    pub speed: u8,
    /// Save a snapshot whenever the scheduler stops.
    pub save_on_stop: bool,
    /// Fixed seed for fresh starts; `None` draws one from OS entropy.
    pub seed: Option<u32>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            speed: 6,
            save_on_stop: true,
            seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PersistenceConfig {
    pub enabled: bool,
    /// Snapshot file. A `.gz` suffix enables gzip compression.
    pub path: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "save.json".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit a tick summary every N ticks.
    pub summary_interval: u64,
    /// Directory for the JSONL event log. Empty disables it.
    pub event_log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            summary_interval: 100,
            event_log_dir: "logs".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub scheduler: SchedulerConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
    pub events: EventPolicy,
}

/// Milliseconds between ticks for a speed level in `1..=10`.
///
/// Returns `None` for levels outside that range.
#[must_use]
pub fn tick_interval_ms(level: u8) -> Option<u64> {
    if (1..=10).contains(&level) {
        Some(1000 - (u64::from(level) - 1) * 100)
    } else {
        None
    }
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        let e = &self.engine;
        anyhow::ensure!(e.history_cap > 0, "History cap must be positive");
        anyhow::ensure!(e.cycle_length > 0, "Cycle length must be positive");
        anyhow::ensure!(
            (0.0..=1.0).contains(&e.migration_chance),
            "Migration chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            e.producer_capacity > 0.0 && e.consumer_capacity > 0.0,
            "Density capacities must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&e.min_breed_factor),
            "Minimum breed factor must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&e.producer_birth_energy)
                && (0.0..=1.0).contains(&e.consumer_birth_energy),
            "Birth energy fractions must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&e.breed_cost_factor),
            "Breed cost factor must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            tick_interval_ms(self.scheduler.speed).is_some(),
            "Scheduler speed must be in [1, 10]"
        );
        anyhow::ensure!(
            !self.persistence.enabled || !self.persistence.path.trim().is_empty(),
            "Persistence path must not be empty when persistence is enabled"
        );
        anyhow::ensure!(
            self.logging.summary_interval > 0,
            "Summary interval must be positive"
        );
        self.events.validate()?;
        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when it is missing or invalid.
    ///
    /// A default file is written when none exists.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Ok(content) = std::fs::read_to_string(path) {
            match Self::from_toml(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                }
            }
        }
        let default = Self::default();
        if !path.exists() {
            if let Ok(toml_str) = toml::to_string(&default) {
                let _ = std::fs::write(path, toml_str);
            }
        }
        default
    }

    /// Hash of the parameters that affect simulation outcomes.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.engine).as_bytes());
        hex::encode(hasher.finalize())
    }
}
