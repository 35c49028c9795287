//! The tick engine.
//!
//! [`tick`] is a free function over [`EngineState`] so any [`RandomSource`]
//! can drive it. [`Engine`] bundles the state with its catalog, configuration
//! and seeded generator and is what hosts normally hold.

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::environment::EnvironmentLogic;
use crate::history::{GlobalSample, History, SpeciesSample};
use crate::lifecycle::{self, PassOutcome};
use crate::metrics::TickMetrics;
use crate::migration;
use crate::population::Populations;
use crate::rng::{RandomSource, SeededRng};
use crate::snapshot::EngineSnapshot;
use crate::stats::SpeciesStats;
use ecotick_data::{Environment, Individual, SpeciesId, SpeciesTickReport, TickReport};
use std::collections::BTreeMap;
use std::time::Instant;

/// Everything that changes from tick to tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub time: u64,
    pub environment: Environment,
    pub populations: Populations,
    pub history: History,
}

impl EngineState {
    /// Time 0, empty history, every pool seeded with its `start_pop`.
    #[must_use]
    pub fn seeded(catalog: &Catalog, config: &EngineConfig) -> Self {
        Self {
            time: 0,
            environment: Environment::at(0, config.cycle_length),
            populations: Populations::seeded(catalog),
            history: History::new(config.history_cap),
        }
    }
}

/// Advances `state` by exactly one tick.
pub fn tick<R: RandomSource>(
    state: &mut EngineState,
    catalog: &Catalog,
    config: &EngineConfig,
    rng: &mut R,
) -> TickReport {
    let prev_pops: Vec<usize> = catalog
        .iter()
        .map(|s| state.populations.count(&s.id))
        .collect();

    state.time += 1;
    state.environment.update(state.time, config.cycle_length);

    let arrivals = if migration::is_due(state.time, config.migration_interval) {
        migration::migrate(catalog, &mut state.populations, config, rng)
    } else {
        BTreeMap::new()
    };

    let mut outcomes: Vec<PassOutcome> = Vec::with_capacity(catalog.len());
    let mut eaten: BTreeMap<SpeciesId, u32> = BTreeMap::new();
    for species in catalog.iter() {
        let outcome = lifecycle::process_species(
            species,
            &mut state.populations,
            &state.environment,
            config,
            rng,
        );
        for (prey, n) in &outcome.eaten {
            *eaten.entry(prey.clone()).or_insert(0) += n;
        }
        outcomes.push(outcome);
    }

    let mut reports = Vec::with_capacity(catalog.len());
    for ((species, outcome), prev_pop) in catalog.iter().zip(&outcomes).zip(prev_pops) {
        let pop = state.populations.count(&species.id);
        let avg_energy = state.populations.avg_energy(&species.id);
        let health_pct = if species.max_energy > 0.0 {
            100.0 * avg_energy / species.max_energy
        } else {
            0.0
        };

        state.history.record_species(
            &species.id,
            SpeciesSample {
                pop,
                energy: avg_energy,
                births: outcome.births,
                deaths: outcome.deaths,
            },
        );
        reports.push(SpeciesTickReport {
            id: species.id.clone(),
            prev_pop,
            pop,
            births: outcome.births,
            deaths: outcome.deaths,
            eaten: eaten.get(&species.id).copied().unwrap_or(0),
            migrants: arrivals.get(&species.id).copied().unwrap_or(0),
            avg_energy,
            health_pct,
        });
    }

    let producer_pop: usize = catalog
        .producers()
        .map(|s| state.populations.count(&s.id))
        .sum();
    let consumer_pop: usize = catalog
        .consumers()
        .map(|s| state.populations.count(&s.id))
        .sum();
    state.history.record_global(GlobalSample {
        total_pop: state.populations.total(),
        total_biomass: state.populations.total_biomass(),
        producer_pop,
        consumer_pop,
    });

    TickReport {
        time: state.time,
        environment: state.environment,
        species: reports,
    }
}

#[derive(Debug)]
pub struct Engine {
    catalog: Catalog,
    config: EngineConfig,
    state: EngineState,
    rng: SeededRng,
    metrics: TickMetrics,
}

impl Engine {
    /// Fresh engine at time 0. Catalog problems are logged, never fatal.
    #[must_use]
    pub fn new(catalog: Catalog, config: EngineConfig, seed: u32) -> Self {
        catalog.log_warnings();
        let state = EngineState::seeded(&catalog, &config);
        tracing::info!(seed, species = catalog.len(), population = state.populations.total(), "Engine initialized");
        Self {
            catalog,
            config,
            state,
            rng: SeededRng::new(seed),
            metrics: TickMetrics::default(),
        }
    }

    /// Resumes from a snapshot. Pools missing from the snapshot start empty.
    #[must_use]
    pub fn from_snapshot(catalog: Catalog, config: EngineConfig, snapshot: EngineSnapshot) -> Self {
        catalog.log_warnings();
        let mut populations = snapshot.populations;
        populations.ensure_pools(&catalog);
        let mut history = snapshot.history;
        history.set_cap(config.history_cap);
        tracing::info!(time = snapshot.time, seed = snapshot.rng.seed, "Engine restored from snapshot");
        Self {
            catalog,
            config,
            state: EngineState {
                time: snapshot.time,
                environment: snapshot.environment,
                populations,
                history,
            },
            rng: SeededRng::from_state(snapshot.rng),
            metrics: TickMetrics::default(),
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: TickMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Back to time 0 with a new seed.
    pub fn reset(&mut self, seed: u32) {
        self.rng.reseed(seed);
        self.state = EngineState::seeded(&self.catalog, &self.config);
        self.metrics.reset();
        tracing::info!(seed, "Engine reset");
    }

    /// Adds `count` full-energy individuals of `id`. Unknown ids and a zero
    /// count are ignored. Returns the number actually added.
    pub fn add_individuals(&mut self, id: &str, count: usize) -> usize {
        let Some(species) = self.catalog.get(id) else {
            tracing::debug!(species = id, "Ignoring add for unknown species");
            return 0;
        };
        if count == 0 {
            return 0;
        }
        self.state.populations.add(species, count);
        count
    }

    pub fn tick(&mut self) -> TickReport {
        let started = Instant::now();
        let report = tick(&mut self.state, &self.catalog, &self.config, &mut self.rng);
        self.metrics.record_tick(
            report.time,
            started.elapsed(),
            self.state.populations.total(),
            report.total_births(),
            report.total_deaths(),
        );
        report
    }

    /// Runs `ticks` ticks back to back.
    pub fn fast_forward(&mut self, ticks: u32) -> Vec<TickReport> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    #[must_use]
    pub fn time(&self) -> u64 {
        self.state.time
    }

    #[must_use]
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.state.environment
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[must_use]
    pub fn populations(&self) -> &Populations {
        &self.state.populations
    }

    #[must_use]
    pub fn population(&self, id: &str) -> usize {
        self.state.populations.count(id)
    }

    /// Owned copy of every pool.
    #[must_use]
    pub fn population_snapshot(&self) -> BTreeMap<SpeciesId, Vec<Individual>> {
        self.state.populations.snapshot()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.state.history
    }

    #[must_use]
    pub fn species_history(&self, id: &str) -> Vec<SpeciesSample> {
        self.state
            .history
            .species(id)
            .map(|s| s.to_vec())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn global_history(&self) -> Vec<GlobalSample> {
        self.state.history.global().to_vec()
    }

    #[must_use]
    pub fn stats(&self) -> Vec<SpeciesStats> {
        SpeciesStats::all(&self.catalog, &self.state.populations, &self.state.history)
    }

    #[must_use]
    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            time: self.state.time,
            rng: self.rng.state(),
            environment: self.state.environment,
            populations: self.state.populations.clone(),
            history: self.state.history.clone(),
        }
    }
}
