//! Background eviction of idle sessions.
//!
//! A player who closes the tab mid-game never submits a score, so their
//! session would live forever. [`ExpiryReaper`] runs as its own Tokio
//! task, wakes on a [`SweepScheduler`], and asks the engine to drop every
//! session idle past the timeout.
//!
//! The reaper only goes through [`GameEngine::reap_expired`]. It never
//! touches the store directly, and request handlers racing with it just
//! see `NotFound` on their next lookup.

use std::sync::Arc;

use lightcycle_protocol::SessionId;
use lightcycle_session::Clock;
use lightcycle_tick::{SweepConfig, SweepScheduler};
use tokio::task::JoinHandle;

use crate::GameEngine;

/// Periodically evicts idle sessions from a [`GameEngine`].
pub struct ExpiryReaper<C: Clock> {
    engine: Arc<GameEngine<C>>,
    scheduler: SweepScheduler,
}

impl<C: Clock> ExpiryReaper<C> {
    /// A reaper sweeping every `reap_interval` from the engine's config.
    pub fn new(engine: Arc<GameEngine<C>>) -> Self {
        let interval = engine.config().reap_interval;
        Self::with_sweep_config(engine, SweepConfig::every(interval))
    }

    pub fn with_sweep_config(engine: Arc<GameEngine<C>>, config: SweepConfig) -> Self {
        Self {
            engine,
            scheduler: SweepScheduler::new(config),
        }
    }

    /// Waits for the next sweep, runs it, and returns the evicted IDs.
    pub async fn sweep_once(&mut self) -> Vec<SessionId> {
        let info = self.scheduler.wait_for_sweep().await;
        let expired = self.engine.reap_expired();
        self.scheduler.record_sweep_end();
        tracing::debug!(
            sweep = info.sweep,
            expired = expired.len(),
            live = self.engine.sessions().len(),
            "expiry sweep finished"
        );
        expired
    }

    /// Sweeps forever.
    pub async fn run(mut self) {
        tracing::info!(
            interval_secs = self.scheduler.interval().as_secs_f64(),
            timeout_secs = self.engine.session_config().session_timeout.as_secs_f64(),
            "expiry reaper started"
        );
        loop {
            self.sweep_once().await;
        }
    }

    /// Runs the reaper on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub fn scheduler(&self) -> &SweepScheduler {
        &self.scheduler
    }
}
