//! The session store: the one place game sessions live.
//!
//! Every request handler and the expiry sweep go through [`SessionStore`].
//! Nobody else keeps a reference to a [`GameSession`] across calls; reads
//! hand out snapshots and writes run inside [`SessionStore::update`].
//!
//! # Concurrency note
//!
//! Two levels of locking:
//!
//! - The map itself sits behind an `RwLock`. It's held only long enough
//!   to find, insert, or remove an entry, so lookups run in parallel.
//! - Each session has its own `Mutex`. All mutation of one session is
//!   serialized on it, which is what keeps per-session move order and
//!   makes "validate then append" atomic. Different sessions never wait
//!   on each other.
//!
//! A handler drops the map lock before locking a session. Only
//! [`SessionStore::expire_idle`] holds both, in map→session order, and
//! nothing takes them in the opposite order, so the two can't deadlock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use lightcycle_protocol::{Position, SessionId};
use rand::Rng;

use crate::{GameSession, SessionError};

type SharedSession = Arc<Mutex<GameSession>>;

/// Concurrent registry of all live game sessions.
///
/// ## Lifecycle
///
/// ```text
/// create() ──→ update()/append_move() ... ──→ deactivate()
///    │                                             │
///    └────────(idle > timeout)──→ expire_idle() ←──┘
/// ```
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SharedSession>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh active session and returns its ID.
    ///
    /// IDs are 128 random bits. A collision with a live ID is practically
    /// impossible, but it's checked under the write lock anyway.
    pub fn create(&self, now: Instant) -> SessionId {
        let mut sessions = self.write();
        let id = loop {
            let candidate = generate_session_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        let session = GameSession::new(id.clone(), now);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        tracing::debug!(session_id = %id, live = sessions.len(), "session created");
        id
    }

    /// Returns a snapshot of the session's current state.
    ///
    /// The snapshot is a copy: it never reflects later moves, and a reader
    /// can never observe a half-applied append.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if the ID is unknown or was swept.
    pub fn get(&self, id: &SessionId) -> Result<GameSession, SessionError> {
        self.update(id, |session| session.clone())
    }

    /// Runs `f` with exclusive access to one session and returns its result.
    ///
    /// This is the building block for every compound operation ("check
    /// timing, then append"): everything inside `f` happens atomically
    /// with respect to other updates of the same session.
    ///
    /// `f` must not call back into the store.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if the ID is unknown or was swept.
    pub fn update<R>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Result<R, SessionError> {
        // Clone the Arc out so the map lock is released before we block
        // on the session's own mutex.
        let shared = self
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        let mut session = lock(&shared);
        Ok(f(&mut session))
    }

    /// Appends a move and stamps `last_move_at`. Returns the new trail length.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`]: unknown or swept ID
    /// - [`SessionError::Inactive`]: session already finalized
    pub fn append_move(
        &self,
        id: &SessionId,
        position: Position,
        now: Instant,
    ) -> Result<usize, SessionError> {
        self.update(id, |session| session.record_move(position, now))?
    }

    /// Marks a session finished. Its trail is frozen from here on.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if the ID is unknown or was swept.
    pub fn deactivate(&self, id: &SessionId) -> Result<(), SessionError> {
        self.update(id, GameSession::deactivate)
    }

    /// Removes a session outright. Returns `true` if it existed.
    pub fn delete(&self, id: &SessionId) -> bool {
        self.write().remove(id).is_some()
    }

    /// Removes every session idle for longer than `timeout` as of `now`.
    ///
    /// Idleness is checked under the map's write lock, so a session that
    /// receives a move while the sweep is running is either seen with its
    /// new timestamp or not touched at all.
    ///
    /// Returns the removed IDs.
    pub fn expire_idle(&self, now: Instant, timeout: Duration) -> Vec<SessionId> {
        let mut expired = Vec::new();
        self.write().retain(|id, shared| {
            if lock(shared).idle_for(now) > timeout {
                expired.push(id.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// IDs of all live sessions, in no particular order.
    pub fn ids(&self) -> Vec<SessionId> {
        self.read().keys().cloned().collect()
    }

    /// Returns the number of live sessions (active or finalized).
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<SessionId, SharedSession>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, SharedSession>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A panic inside an update closure can't leave a session half-written
/// (every mutation is a single push or flag store), so poisoning is ignored.
fn lock(session: &Mutex<GameSession>) -> MutexGuard<'_, GameSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_session_id() -> SessionId {
    let bytes: [u8; 16] = rand::rng().random();
    SessionId::from(bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
}

// =========================================================================
// Tests
// =========================================================================
