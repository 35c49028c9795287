use ecotick_core::catalog::Catalog;
use ecotick_core::config::AppConfig;
use ecotick_core::engine::Engine;
use ecotick_core::events::{EcoEvent, EventPolicy};
use ecotick_core::metrics::TickMetrics;
use ecotick_core::rng::SeededRng;
use ecotick_core::snapshot::EngineSnapshot;
use ecotick_core::stats::SpeciesStats;
use ecotick_data::TickReport;
use ecotick_io::{EventLogger, LiveEvent, SnapshotStore};
use std::collections::VecDeque;

use super::console::{format_tick_line, ConsoleLog};

/// Events kept for observers.
const RECENT_EVENTS: usize = 50;

/// The engine plus everything that observes it: event policy, event log and
/// console. All commands and queries a host issues go through here.
pub struct Simulation {
    engine: Engine,
    policy: EventPolicy,
    logger: EventLogger,
    console: ConsoleLog,
    recent_events: VecDeque<EcoEvent>,
    summary_interval: u64,
}

impl Simulation {
    #[must_use]
    pub fn new(engine: Engine, policy: EventPolicy, logger: EventLogger) -> Self {
        Self {
            engine,
            policy,
            logger,
            console: ConsoleLog::default(),
            recent_events: VecDeque::with_capacity(RECENT_EVENTS),
            summary_interval: 100,
        }
    }

    /// Resumes from `store` when it holds a usable snapshot and `fresh` is
    /// false, otherwise seeds a new engine.
    pub fn init(
        catalog: Catalog,
        config: &AppConfig,
        store: &dyn SnapshotStore,
        fresh: bool,
        logger: EventLogger,
    ) -> Self {
        let metrics = TickMetrics::new(config.logging.summary_interval);
        let restored = if fresh || !config.persistence.enabled {
            None
        } else {
            store.load()
        };

        let (engine, banner) = match restored {
            Some(snapshot) => {
                let time = snapshot.time;
                let engine = Engine::from_snapshot(catalog, config.engine.clone(), snapshot);
                (engine, LiveEvent::restored(time))
            }
            None => {
                let seed = config.scheduler.seed.unwrap_or_else(SeededRng::random_seed);
                let engine = Engine::new(catalog, config.engine.clone(), seed);
                (engine, LiveEvent::reset(seed))
            }
        };

        let mut sim = Self::new(engine.with_metrics(metrics), config.events.clone(), logger);
        sim.summary_interval = config.logging.summary_interval;
        sim.log(&banner);
        sim.console.push(match banner {
            LiveEvent::Restored { time, .. } => format!("Resumed at tick {time}"),
            _ => format!("New ecosystem, seed {}", sim.engine.seed()),
        });
        sim
    }

    fn log(&mut self, event: &LiveEvent) {
        if let Err(e) = self.logger.log_event(event) {
            tracing::warn!(error = %e, "Failed to write event log");
        }
    }

    fn observe(&mut self, report: &TickReport) {
        self.console
            .push(format_tick_line(report, self.engine.catalog()));

        for event in self.policy.detect(report) {
            tracing::debug!(time = event.time, "{event}");
            self.console.push(format!("  ! {event}"));
            self.log(&LiveEvent::from_eco(&event));
            if self.recent_events.len() >= RECENT_EVENTS {
                self.recent_events.pop_front();
            }
            self.recent_events.push_back(event);
        }

        if self.summary_interval > 0 && report.time % self.summary_interval == 0 {
            self.log(&LiveEvent::tick(report));
        }
    }

    pub fn tick(&mut self) -> TickReport {
        let report = self.engine.tick();
        self.observe(&report);
        report
    }

    /// Runs `ticks` ticks synchronously. Returns the last report, if any.
    pub fn fast_forward(&mut self, ticks: u32) -> Option<TickReport> {
        let reports = self.engine.fast_forward(ticks);
        for report in &reports {
            self.observe(report);
        }
        reports.into_iter().last()
    }

    pub fn reset(&mut self, seed: u32) {
        self.engine.reset(seed);
        self.recent_events.clear();
        self.console.clear();
        self.console.push(format!("New ecosystem, seed {seed}"));
        self.log(&LiveEvent::reset(seed));
    }

    pub fn add_individuals(&mut self, id: &str, count: usize) -> usize {
        let added = self.engine.add_individuals(id, count);
        if added > 0 {
            self.console.push(format!("Added {added} {id}"));
        }
        added
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.snapshot()
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[must_use]
    pub fn time(&self) -> u64 {
        self.engine.time()
    }

    #[must_use]
    pub fn stats(&self) -> Vec<SpeciesStats> {
        self.engine.stats()
    }

    #[must_use]
    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn recent_events(&self) -> impl Iterator<Item = &EcoEvent> {
        self.recent_events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecotick_io::MemoryStore;

    fn config(seed: u32) -> AppConfig {
        let mut config = AppConfig::default();
        config.scheduler.seed = Some(seed);
        config
    }

    #[test]
    fn test_init_fresh_uses_configured_seed() {
        let store = MemoryStore::new();
        let sim = Simulation::init(
            Catalog::default_catalog(),
            &config(17),
            &store,
            false,
            EventLogger::dummy(),
        );
        assert_eq!(sim.engine().seed(), 17);
        assert_eq!(sim.time(), 0);
        assert_eq!(sim.console().last(), Some("New ecosystem, seed 17"));
    }

    #[test]
    fn test_init_resumes_from_store() {
        let store = MemoryStore::new();
        let mut engine = Engine::new(Catalog::default_catalog(), Default::default(), 3);
        engine.fast_forward(9);
        assert!(store.save(&engine.snapshot()));

        let sim = Simulation::init(
            Catalog::default_catalog(),
            &config(1),
            &store,
            false,
            EventLogger::dummy(),
        );
        assert_eq!(sim.time(), 9);
        assert_eq!(sim.snapshot(), engine.snapshot());

        let fresh = Simulation::init(
            Catalog::default_catalog(),
            &config(1),
            &store,
            true,
            EventLogger::dummy(),
        );
        assert_eq!(fresh.time(), 0);
    }

    #[test]
    fn test_tick_writes_console_line() {
        let store = MemoryStore::new();
        let mut sim = Simulation::init(
            Catalog::default_catalog(),
            &config(5),
            &store,
            true,
            EventLogger::dummy(),
        );
        sim.tick();
        assert!(sim.console().lines().any(|l| l.starts_with("   1│ 🌱")));
    }

    #[test]
    fn test_fast_forward_returns_last_report() {
        let store = MemoryStore::new();
        let mut sim = Simulation::init(
            Catalog::default_catalog(),
            &config(5),
            &store,
            true,
            EventLogger::dummy(),
        );
        assert!(sim.fast_forward(0).is_none());
        let last = sim.fast_forward(20).unwrap();
        assert_eq!(last.time, 20);
        assert_eq!(sim.time(), 20);
    }
}
