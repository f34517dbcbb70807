//! Game session tracking for Lightcycle.
//!
//! This crate owns every in-flight game:
//!
//! 1. **Session state**: the authoritative trail and timestamps of one
//!    game ([`GameSession`])
//! 2. **Session store**: the concurrent registry all request handlers
//!    and the expiry sweep go through ([`SessionStore`])
//! 3. **Time**: the [`Clock`] seam, so move timing and expiry can be
//!    tested without sleeping
//!
//! # How it fits in the stack
//!
//! ```text
//! Game layer (above)  ← validates moves/crashes, scores, reaps
//!     ↕
//! Session layer (this crate)  ← stores trails, serializes per-session mutation
//!     ↕
//! Protocol layer (below)  ← provides SessionId, Position
//! ```

mod clock;
mod error;
mod session;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::SessionError;
pub use session::{GameSession, SessionConfig};
pub use store::SessionStore;
