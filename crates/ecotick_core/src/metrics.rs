//! Tick metrics and logging setup.
//!
//! Counters are atomics so the host can read them from another task while
//! the engine is held behind a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

pub struct TickMetrics {
    tick_count: AtomicU64,
    population: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    last_tick_us: AtomicU64,
    summary_interval: u64,
    start_time: Instant,
}

impl Default for TickMetrics {
    fn default() -> Self {
        Self::new(100)
    }
}

impl std::fmt::Debug for TickMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickMetrics")
            .field("tick_count", &self.tick_count())
            .field("population", &self.population())
            .finish_non_exhaustive()
    }
}

impl TickMetrics {
    /// `summary_interval` of 0 disables the periodic summary.
    #[must_use]
    pub fn new(summary_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            population: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            last_tick_us: AtomicU64::new(0),
            summary_interval,
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick.
    pub fn record_tick(
        &self,
        time: u64,
        duration: Duration,
        population: usize,
        births: u32,
        deaths: u32,
    ) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.population.store(population as u64, Ordering::Relaxed);
        self.births.fetch_add(u64::from(births), Ordering::Relaxed);
        self.deaths.fetch_add(u64::from(deaths), Ordering::Relaxed);
        self.last_tick_us
            .store(duration.as_micros() as u64, Ordering::Relaxed);

        if self.summary_interval > 0 && tick % self.summary_interval == 0 {
            tracing::info!(
                time,
                population,
                births = self.births.load(Ordering::Relaxed),
                deaths = self.deaths.load(Ordering::Relaxed),
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    /// Ticks recorded since creation or the last [`Self::reset`].
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn population(&self) -> u64 {
        self.population.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total_births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total_deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn last_tick(&self) -> Duration {
        Duration::from_micros(self.last_tick_us.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn reset(&self) {
        for counter in [
            &self.tick_count,
            &self.population,
            &self.births,
            &self.deaths,
            &self.last_tick_us,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_level`. Calling this twice is harmless.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = TickMetrics::new(10);
        assert_eq!(metrics.tick_count(), 0);
    }

    #[test]
    fn test_record_tick() {
        let metrics = TickMetrics::new(10);
        metrics.record_tick(1, Duration::from_micros(250), 120, 3, 1);
        metrics.record_tick(2, Duration::from_micros(300), 118, 0, 2);
        assert_eq!(metrics.tick_count(), 2);
        assert_eq!(metrics.population(), 118);
        assert_eq!(metrics.total_births(), 3);
        assert_eq!(metrics.total_deaths(), 3);
        assert_eq!(metrics.last_tick(), Duration::from_micros(300));
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let metrics = TickMetrics::new(0);
        metrics.record_tick(1, Duration::from_millis(1), 5, 1, 1);
        metrics.reset();
        assert_eq!(metrics.tick_count(), 0);
        assert_eq!(metrics.total_births(), 0);
    }
}
