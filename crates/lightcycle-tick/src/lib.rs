//! Fixed-interval sweep scheduler for Lightcycle.
//!
//! Background maintenance (today: evicting idle game sessions) runs on a
//! slow, fixed cadence (once a minute by default). [`SweepScheduler`]
//! provides that cadence with:
//!
//! - a random start offset, so several servers started together don't
//!   sweep in lockstep
//! - skip-ahead on overrun: if a sweep wakes very late (suspended
//!   process, overloaded runtime) the missed sweeps are dropped rather
//!   than fired back-to-back
//! - pause/resume
//! - per-sweep timing metrics
//!
//! # Integration
//!
//! ```ignore
//! let mut scheduler = SweepScheduler::new(SweepConfig::every(Duration::from_secs(60)));
//! loop {
//!     let info = scheduler.wait_for_sweep().await;
//!     do_the_sweep();
//!     scheduler.record_sweep_end();
//! }
//! ```

use std::time::{Duration, Instant};

use rand::Rng;
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the sweep scheduler.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Time between sweeps. `Duration::ZERO` disables sweeping: the
    /// scheduler never fires.
    pub interval: Duration,
    /// Upper bound of the random delay added before the *first* sweep.
    pub initial_jitter: Duration,
    /// A sweep taking longer than this fraction of `interval` logs a
    /// warning. Clamped to `0.0..=1.0`.
    pub budget_warn_threshold: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            initial_jitter: Duration::from_secs(1),
            budget_warn_threshold: 0.5,
        }
    }
}

impl SweepConfig {
    /// Smallest interval the scheduler will run at.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

    /// A config that sweeps every `interval`, with default jitter.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`SweepScheduler::new`]. Rules:
    /// - a non-zero `interval` is raised to at least [`Self::MIN_INTERVAL`]
    /// - `budget_warn_threshold` clamped to `0.0..=1.0`
    pub fn validated(mut self) -> Self {
        if !self.interval.is_zero() && self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_ms = self.interval.as_secs_f64() * 1000.0,
                min_ms = Self::MIN_INTERVAL.as_secs_f64() * 1000.0,
                "sweep interval below minimum, clamping"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self
    }

    /// `true` when `interval` is zero.
    pub fn is_disabled(&self) -> bool {
        self.interval.is_zero()
    }
}

// ---------------------------------------------------------------------------
// Sweep info (returned to caller each sweep)
// ---------------------------------------------------------------------------

/// Information about one sweep, returned by [`SweepScheduler::wait_for_sweep`].
#[derive(Debug, Clone)]
pub struct SweepInfo {
    /// Monotonically increasing sweep number (starts at 1).
    pub sweep: u64,
    /// `true` if the scheduler woke up noticeably late.
    pub overrun: bool,
    /// Sweeps dropped because of the late wake-up.
    pub sweeps_skipped: u64,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Runtime metrics, updated by [`SweepScheduler::record_sweep_end`].
#[derive(Debug, Clone, Default)]
pub struct SweepMetrics {
    /// Sweeps fired.
    pub total_sweeps: u64,
    /// Late wake-ups detected.
    pub total_overruns: u64,
    /// Sweeps dropped by skip-ahead.
    pub total_skipped: u64,
    /// Exponential moving average of sweep execution time (α = 0.2).
    pub avg_sweep_time: Duration,
    /// Longest sweep execution time seen.
    pub max_sweep_time: Duration,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval scheduler. One per background task.
pub struct SweepScheduler {
    config: SweepConfig,
    sweep_count: u64,
    /// When the next sweep should fire (Tokio instant for `sleep_until`).
    next_sweep: Option<TokioInstant>,
    /// Set by `wait_for_sweep`, consumed by `record_sweep_end`.
    sweep_start: Option<Instant>,
    paused: bool,
    metrics: SweepMetrics,
}

impl SweepScheduler {
    /// Create a new scheduler. The first sweep fires one interval from
    /// now, plus a random share of `initial_jitter`.
    pub fn new(config: SweepConfig) -> Self {
        let config = config.validated();

        let next_sweep = if config.is_disabled() {
            debug!("sweep scheduler created disabled (interval is zero)");
            None
        } else {
            let jitter = if config.initial_jitter.is_zero() {
                Duration::ZERO
            } else {
                let max_us = config.initial_jitter.as_micros() as u64;
                Duration::from_micros(rand::rng().random_range(0..max_us.max(1)))
            };
            debug!(
                interval_ms = config.interval.as_secs_f64() * 1000.0,
                jitter_ms = jitter.as_secs_f64() * 1000.0,
                "sweep scheduler created"
            );
            Some(TokioInstant::now() + config.interval + jitter)
        };

        Self {
            config,
            sweep_count: 0,
            next_sweep,
            sweep_start: None,
            paused: false,
            metrics: SweepMetrics::default(),
        }
    }

    /// Create a scheduler sweeping every `interval` with default settings.
    pub fn every(interval: Duration) -> Self {
        Self::new(SweepConfig::every(interval))
    }

    /// Wait until the next sweep is due.
    ///
    /// When disabled or paused this future pends forever, which is the
    /// right behavior inside a `tokio::select!` with a shutdown branch.
    pub async fn wait_for_sweep(&mut self) -> SweepInfo {
        let next = match self.next_sweep {
            Some(next) if !self.paused => next,
            _ => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };
        let interval = self.config.interval;

        time::sleep_until(next).await;

        let now = TokioInstant::now();
        self.sweep_count += 1;
        self.sweep_start = Some(Instant::now());

        // More than a tenth of an interval late counts as an overrun.
        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > interval / 10;
        let sweeps_skipped = if overrun {
            (late_by.as_nanos() / interval.as_nanos()) as u64
        } else {
            0
        };
        if sweeps_skipped > 0 {
            warn!(
                sweep = self.sweep_count,
                skipped = sweeps_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "sweep overrun, skipping ahead"
            );
        }

        // Always schedule from now, never from the missed deadline.
        self.next_sweep = Some(now + interval);

        if overrun {
            self.metrics.total_overruns += 1;
        }
        self.metrics.total_skipped += sweeps_skipped;
        self.metrics.total_sweeps += 1;

        trace!(sweep = self.sweep_count, overrun, "sweep fired");

        SweepInfo {
            sweep: self.sweep_count,
            overrun,
            sweeps_skipped,
        }
    }

    /// Record that the work for the current sweep has finished.
    ///
    /// No-op unless called after a `wait_for_sweep`.
    pub fn record_sweep_end(&mut self) {
        let Some(start) = self.sweep_start.take() else {
            return;
        };
        let elapsed = start.elapsed();

        let utilization = elapsed.as_secs_f64() / self.config.interval.as_secs_f64();
        if utilization >= self.config.budget_warn_threshold {
            warn!(
                sweep = self.sweep_count,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                utilization_pct = format!("{:.1}", utilization * 100.0),
                "sweep took a large share of its interval"
            );
        }

        if elapsed > self.metrics.max_sweep_time {
            self.metrics.max_sweep_time = elapsed;
        }
        let alpha = 0.2;
        let prev = self.metrics.avg_sweep_time.as_secs_f64();
        self.metrics.avg_sweep_time =
            Duration::from_secs_f64(prev * (1.0 - alpha) + elapsed.as_secs_f64() * alpha);
    }

    /// Stop firing until [`resume`](Self::resume). Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(sweep = self.sweep_count, "sweep scheduler paused");
        }
    }

    /// Resume after a pause. The next sweep is one full interval away,
    /// so time spent paused doesn't cause an immediate sweep.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            if !self.config.is_disabled() {
                self.next_sweep = Some(TokioInstant::now() + self.config.interval);
            }
            debug!(sweep = self.sweep_count, "sweep scheduler resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_disabled(&self) -> bool {
        self.next_sweep.is_none()
    }

    pub fn sweep_count(&self) -> u64 {
        self.sweep_count
    }

    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }
}
