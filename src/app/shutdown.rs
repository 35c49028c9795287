//! Graceful shutdown.
//!
//! Ctrl-c (or a `quit` command) raises a shared flag and wakes every task
//! parked in [`ShutdownManager::requested`]. The run loop then hands the
//! scheduler to [`ShutdownManager::cleanup`] so the last state reaches the
//! store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use super::scheduler::Scheduler;

#[derive(Clone)]
pub struct ShutdownManager {
    flag: Arc<AtomicBool>,
    wake: Arc<Notify>,
    save_on_exit: bool,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
            save_on_exit: true,
        }
    }

    /// Whether cleanup writes a final snapshot when stopping did not.
    pub fn set_save_on_exit(&mut self, save: bool) {
        self.save_on_exit = save;
    }

    pub fn request_shutdown(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            tracing::info!("Shutdown requested");
        }
        self.wake.notify_waiters();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolves once shutdown has been requested. Returns immediately if it
    /// already was.
    pub async fn requested(&self) {
        let notified = self.wake.notified();
        if self.is_shutdown_requested() {
            return;
        }
        notified.await;
    }

    /// Spawns a task that requests shutdown on ctrl-c.
    pub fn listen_for_ctrl_c(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received");
                manager.request_shutdown();
            }
        });
    }

    /// Stops the ticker, then saves unless stopping already did. Returns
    /// whether the final state reached the store.
    pub async fn cleanup(&self, scheduler: &mut Scheduler) -> bool {
        let time = scheduler.time();
        let mut saved = scheduler.stop().await;
        if self.save_on_exit && !saved {
            saved = scheduler.save();
            if !saved {
                tracing::warn!(time, "Final save failed");
            }
        }
        tracing::info!(time, saved, "Shut down");
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Simulation;
    use ecotick_core::catalog::Catalog;
    use ecotick_core::config::{EngineConfig, SchedulerConfig};
    use ecotick_core::engine::Engine;
    use ecotick_core::events::EventPolicy;
    use ecotick_core::snapshot::EngineSnapshot;
    use ecotick_io::{EventLogger, MemoryStore, SnapshotStore};
    use std::time::Duration;

    /// Store whose disk is always full.
    struct FullDisk;

    impl SnapshotStore for FullDisk {
        fn save(&self, _snapshot: &EngineSnapshot) -> bool {
            false
        }
        fn load(&self) -> Option<EngineSnapshot> {
            None
        }
    }

    fn scheduler(store: Arc<dyn SnapshotStore>) -> Scheduler {
        let engine = Engine::new(Catalog::default_catalog(), EngineConfig::default(), 2);
        let sim = Simulation::new(engine, EventPolicy::default(), EventLogger::dummy());
        let config = SchedulerConfig {
            save_on_stop: false,
            ..Default::default()
        };
        Scheduler::new(sim, store, &config)
    }

    #[tokio::test]
    async fn test_cleanup_saves_on_exit() {
        let store = Arc::new(MemoryStore::new());
        let mut s = scheduler(store.clone());
        assert!(ShutdownManager::new().cleanup(&mut s).await);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_reports_failed_save() {
        let mut s = scheduler(Arc::new(FullDisk));
        assert!(!ShutdownManager::new().cleanup(&mut s).await);
    }

    #[tokio::test]
    async fn test_cleanup_without_save_on_exit() {
        let store = Arc::new(MemoryStore::new());
        let mut s = scheduler(store.clone());
        let mut manager = ShutdownManager::new();
        manager.set_save_on_exit(false);
        assert!(!manager.cleanup(&mut s).await);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_request_is_shared_between_clones() {
        let manager = ShutdownManager::new();
        assert!(!manager.is_shutdown_requested());
        manager.clone().request_shutdown();
        assert!(manager.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_requested_wakes_waiter() {
        let manager = ShutdownManager::new();
        let waiter = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.requested().await })
        };
        tokio::task::yield_now().await;
        manager.request_shutdown();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }

    #[tokio::test]
    async fn test_requested_after_the_fact_returns() {
        let manager = ShutdownManager::new();
        manager.request_shutdown();
        tokio::time::timeout(Duration::from_millis(100), manager.requested())
            .await
            .expect("already requested");
    }
}
