//! # Ecotick Core
//!
//! The deterministic engine behind ecotick, a stochastic discrete-tick
//! ecosystem simulation.
//!
//! This crate contains:
//! - The species catalog and its validation
//! - Population pools, aging, feeding, death and reproduction
//! - The seasonal sunlight model
//! - Migration of extinct species
//! - Capped rolling history and derived statistics
//! - Event classification, metrics and structured logging
//!
//! ## Determinism
//!
//! Every stochastic decision draws from one seeded [`rng::RandomSource`].
//! Two engines with the same catalog, configuration and seed, driven by the
//! same commands, produce identical tick reports.
//!
//! ## Example
//!
//! ```
//! use ecotick_core::catalog::Catalog;
//! use ecotick_core::config::EngineConfig;
//! use ecotick_core::engine::Engine;
//!
//! let mut engine = Engine::new(Catalog::default_catalog(), EngineConfig::default(), 42);
//! let report = engine.tick();
//! assert_eq!(report.time, 1);
//! assert_eq!(report.species.len(), 7);
//! ```

/// Species catalog and validation warnings
pub mod catalog;
/// Configuration management for engine, scheduler and host
pub mod config;
/// Tick engine and its owning facade
pub mod engine;
/// Seasonal sunlight model
pub mod environment;
/// Population change events
pub mod events;
/// Capped rolling history
pub mod history;
/// Per-individual lifecycle
pub mod lifecycle;
/// Tick metrics and logging setup
pub mod metrics;
/// Reintroduction of extinct species
pub mod migration;
/// Per-species pools of individuals
pub mod population;
/// Deterministic random source
pub mod rng;
/// Serializable engine snapshots
pub mod snapshot;
/// Derived per-species statistics
pub mod stats;

pub use ecotick_data::*;
