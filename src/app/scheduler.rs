//! Periodic ticking on a tokio timer.
//!
//! The simulation sits behind one mutex. The ticker task locks it, ticks
//! synchronously and releases it before awaiting again, so a tick is never
//! observed half done and never overlaps another.

use ecotick_core::config::{tick_interval_ms, SchedulerConfig};
use ecotick_core::rng::SeededRng;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::state::Simulation;
use ecotick_io::SnapshotStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

pub type SharedSimulation = Arc<Mutex<Simulation>>;

fn lock(sim: &SharedSimulation) -> MutexGuard<'_, Simulation> {
    sim.lock().unwrap_or_else(|e| e.into_inner())
}

pub struct Scheduler {
    sim: SharedSimulation,
    store: Arc<dyn SnapshotStore>,
    speed: u8,
    save_on_stop: bool,
    ticker: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(sim: Simulation, store: Arc<dyn SnapshotStore>, config: &SchedulerConfig) -> Self {
        let speed = if tick_interval_ms(config.speed).is_some() {
            config.speed
        } else {
            SchedulerConfig::default().speed
        };
        Self {
            sim: Arc::new(Mutex::new(sim)),
            store,
            speed,
            save_on_stop: config.save_on_stop,
            ticker: None,
        }
    }

    /// Shared handle for readers outside the scheduler.
    #[must_use]
    pub fn simulation(&self) -> SharedSimulation {
        Arc::clone(&self.sim)
    }

    /// Runs `f` with the simulation locked.
    pub fn with_sim<T>(&self, f: impl FnOnce(&mut Simulation) -> T) -> T {
        f(&mut lock(&self.sim))
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        if self.ticker.is_some() {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    #[must_use]
    pub fn speed(&self) -> u8 {
        self.speed
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(tick_interval_ms(self.speed).unwrap_or(500))
    }

    /// Arms the periodic ticker. No-op when already running.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        let period = self.tick_interval();
        let sim = Arc::clone(&self.sim);
        self.ticker = Some(tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                lock(&sim).tick();
            }
        }));
        tracing::info!(speed = self.speed, interval_ms = period.as_millis() as u64, "Scheduler started");
    }

    /// Cancels the ticker and waits for it to wind down. No tick runs after
    /// this returns.
    async fn disarm(&mut self) -> bool {
        let Some(handle) = self.ticker.take() else {
            return false;
        };
        handle.abort();
        let _ = handle.await;
        true
    }

    /// Stops ticking and saves a snapshot when configured to. Returns whether
    /// a snapshot was written.
    pub async fn stop(&mut self) -> bool {
        let was_running = self.disarm().await;
        if was_running {
            tracing::info!(time = lock(&self.sim).time(), "Scheduler stopped");
        }
        self.save_on_stop && self.save()
    }

    /// Changes the speed level. Levels outside `1..=10` are ignored. A running
    /// ticker is re-armed at the new interval.
    pub async fn set_speed(&mut self, level: u8) {
        if tick_interval_ms(level).is_none() {
            tracing::debug!(level, "Ignoring out-of-range speed");
            return;
        }
        self.speed = level;
        if self.disarm().await {
            self.start();
        }
    }

    /// Stops and reinitialises the simulation with a fresh seed.
    pub async fn reset(&mut self) -> u32 {
        let seed = SeededRng::random_seed();
        self.reset_with_seed(seed).await;
        seed
    }

    /// Stops and reinitialises the simulation with `seed`.
    pub async fn reset_with_seed(&mut self, seed: u32) {
        self.disarm().await;
        lock(&self.sim).reset(seed);
    }

    /// Snapshots under the lock, writes after releasing it.
    pub fn save(&self) -> bool {
        let snapshot = lock(&self.sim).snapshot();
        self.store.save(&snapshot)
    }

    pub fn fast_forward(&self, ticks: u32) {
        lock(&self.sim).fast_forward(ticks);
    }

    pub fn add_individuals(&self, id: &str, count: usize) -> usize {
        lock(&self.sim).add_individuals(id, count)
    }

    #[must_use]
    pub fn time(&self) -> u64 {
        lock(&self.sim).time()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}
