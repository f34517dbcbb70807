//! Time source for move timing and session expiry.
//!
//! Every timing decision in Lightcycle ("was this move too fast?", "has
//! this session been idle too long?") compares two [`Instant`]s. Instead
//! of calling `Instant::now()` directly, the game layer asks a [`Clock`].
//!
//! The timing rules have hard edges: a move exactly 30 ms after the
//! previous one is fine, 29 ms is not. Production uses the monotonic
//! [`SystemClock`]; tests step a [`ManualClock`] by exact amounts.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A monotonic time source.
///
/// `Send + Sync + 'static` because one clock is shared by every request
/// handler and the expiry sweep for the lifetime of the server.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test can hand one
/// clone to the engine and keep another to advance time:
///
/// ```rust
/// use std::time::Duration;
/// use lightcycle_session::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let engine_view = clock.clone();
///
/// let before = engine_view.now();
/// clock.advance(Duration::from_millis(30));
///
/// assert_eq!(engine_view.now() - before, Duration::from_millis(30));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Creates a clock frozen at the current real instant.
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_does_not_move_on_its_own() {
        let clock = ManualClock::new();
        let a = clock.now();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(clock.now(), a);
    }

    #[test]
    fn test_manual_clock_advance_is_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();

        clock.advance(Duration::from_secs(2));
        clock.advance(Duration::from_millis(1));

        assert_eq!(other.now() - start, Duration::from_millis(2001));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let a = SystemClock.now();
        let b = SystemClock.now();
        assert!(b >= a);
    }
}
