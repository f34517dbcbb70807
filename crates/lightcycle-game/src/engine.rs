//! The game engine: the operations a client can invoke.
//!
//! [`GameEngine`] wires the session store, both validators, the
//! scoreboard, and the event log together. Each public method is one
//! client operation and returns a definite outcome. No rejection is
//! fatal, and none is silently dropped.
//!
//! # Lock discipline
//!
//! Each operation takes at most one of these at a time, in sequence:
//!
//! 1. a session's mutex (via [`SessionStore::update`]): all checks and
//!    mutations of that session
//! 2. the scoreboard lock: compare-and-update of the record
//! 3. the event log lock: one append per event
//!
//! Events are appended only after the session lock has been released.

use lightcycle_protocol::{Position, SessionId};
use lightcycle_session::{Clock, GameSession, SessionConfig, SessionStore, SystemClock};

use crate::{
    CrashKind, CrashValidator, EventLog, GameConfig, GameError, GameState, MoveValidator,
    ScoreOutcome, Scoreboard, TimingViolation,
};

/// What the score path decided while holding the session lock.
enum Verdict {
    Crashed(CrashKind, GameSession),
    TooShort,
    NoCrash,
}

/// Server-side authority over every game.
pub struct GameEngine<C: Clock = SystemClock> {
    config: GameConfig,
    session_config: SessionConfig,
    clock: C,
    store: SessionStore,
    moves: MoveValidator,
    crashes: CrashValidator,
    scoreboard: Scoreboard,
    events: EventLog,
}

impl GameEngine<SystemClock> {
    /// An engine using the real clock.
    pub fn new(config: GameConfig, session_config: SessionConfig) -> Self {
        Self::with_clock(config, session_config, SystemClock)
    }
}

impl Default for GameEngine<SystemClock> {
    fn default() -> Self {
        Self::new(GameConfig::default(), SessionConfig::default())
    }
}

impl<C: Clock> GameEngine<C> {
    pub fn with_clock(config: GameConfig, session_config: SessionConfig, clock: C) -> Self {
        Self {
            moves: MoveValidator::from_config(&config),
            crashes: CrashValidator::from_config(&config),
            scoreboard: Scoreboard::from_config(&config),
            events: EventLog::new(config.event_log_capacity),
            store: SessionStore::new(),
            config,
            session_config,
            clock,
        }
    }

    // -----------------------------------------------------------------
    // Client operations
    // -----------------------------------------------------------------

    /// Starts a new game and returns its session ID.
    pub fn start_game(&self) -> SessionId {
        let id = self.store.create(self.clock.now());
        self.record(format!("New game session started: {id}"));
        id
    }

    /// Records a move if the session is active and the timing is legal.
    ///
    /// Returns the new trail length.
    ///
    /// # Errors
    /// - [`GameError::NotFound`]: unknown or expired session
    /// - [`GameError::InactiveSession`]: session already scored
    /// - [`GameError::Timing`]: too fast or too slow; the session stays
    ///   active and the trail is unchanged
    pub fn submit_move(&self, id: &SessionId, position: Position) -> Result<usize, GameError> {
        let now = self.clock.now();
        let result = self
            .store
            .update(id, |session| -> Result<usize, GameError> {
                if !session.is_active() {
                    return Err(GameError::InactiveSession(id.clone()));
                }
                self.moves.validate(session, now)?;
                Ok(session.record_move(position, now)?)
            })
            .map_err(GameError::from)
            .and_then(|inner| inner);

        match &result {
            Ok(moves) => {
                tracing::trace!(session_id = %id, %position, moves, "move recorded");
            }
            Err(GameError::Timing(violation)) => {
                let speed = match violation {
                    TimingViolation::TooFast { .. } => "fast",
                    TimingViolation::TooSlow { .. } => "slow",
                };
                self.record(format!(
                    "Move too {speed} for session {id}: {:?}",
                    violation.elapsed()
                ));
            }
            Err(err) => {
                tracing::debug!(session_id = %id, error = %err, "move refused");
            }
        }
        result
    }

    /// Ends a game: validates the claimed crash against the recorded
    /// trail, freezes the session, and scores it.
    ///
    /// `client_score` is logged and otherwise ignored. The score is always
    /// the length of the server's trail.
    ///
    /// # Errors
    /// - [`GameError::NotFound`]: unknown or expired session
    /// - [`GameError::InactiveSession`]: session already scored
    /// - [`GameError::InsufficientTrail`]: fewer than `min_trail_len` moves
    /// - [`GameError::InvalidCrash`]: `final_position` is on the board and
    ///   not on the trail; the session stays active
    pub fn submit_score(
        &self,
        id: &SessionId,
        final_position: Position,
        client_score: i64,
    ) -> Result<ScoreOutcome, GameError> {
        let checked = self.store.update(id, |session| {
            if !session.is_active() {
                return Err(GameError::InactiveSession(id.clone()));
            }
            let moves = session.trail_len();
            let verdict = if moves < self.config.min_trail_len {
                Verdict::TooShort
            } else {
                match self.crashes.check(final_position, session.trail()) {
                    Some(kind) => {
                        session.deactivate();
                        Verdict::Crashed(kind, session.clone())
                    }
                    None => Verdict::NoCrash,
                }
            };
            Ok((moves, verdict))
        });

        let (moves, verdict) = match checked.map_err(GameError::from).and_then(|inner| inner) {
            Ok(checked) => checked,
            Err(err @ GameError::NotFound(_)) => {
                self.record(format!("Invalid session ID in score submission: {id}"));
                return Err(err);
            }
            Err(err) => {
                self.record(format!(
                    "Attempt to submit score for inactive session: {id}"
                ));
                return Err(err);
            }
        };

        self.record(format!(
            "Score submission received: SessionID: {id}, Position({},{}), Trail length: {moves}, Score: {client_score}",
            final_position.x, final_position.y
        ));

        let (kind, session) = match verdict {
            Verdict::TooShort => {
                self.record(format!("Invalid submission: Trail too short ({moves} moves)"));
                return Err(GameError::InsufficientTrail { moves });
            }
            Verdict::NoCrash => {
                self.record(format!("No valid crash found at {final_position}"));
                self.record(format!(
                    "Invalid crash detected: Position({},{}) not in trail or bounds",
                    final_position.x, final_position.y
                ));
                return Err(GameError::InvalidCrash(final_position));
            }
            Verdict::Crashed(kind, session) => (kind, session),
        };

        let wall_or_trail = match kind {
            CrashKind::Wall => "Wall",
            CrashKind::Trail => "Trail",
        };
        self.record(format!("{wall_or_trail} collision detected at {final_position}"));

        let outcome = self.scoreboard.finalize(&session);
        if outcome.new_high_score {
            self.record(format!("New high score achieved: {}", outcome.score));
        }
        tracing::debug!(
            session_id = %id,
            score = outcome.score,
            client_score,
            new_high_score = outcome.new_high_score,
            "session finalized"
        );
        Ok(outcome)
    }

    /// The most recent events, oldest first.
    pub fn read_logs(&self) -> Vec<String> {
        self.events.snapshot()
    }

    /// The current record.
    pub fn read_leaderboard(&self) -> GameState {
        self.record("Leaderboard requested".to_owned());
        self.scoreboard.snapshot()
    }

    // -----------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------

    /// Removes sessions idle longer than the session timeout. Returns the
    /// removed IDs.
    pub fn reap_expired(&self) -> Vec<SessionId> {
        let expired = self
            .store
            .expire_idle(self.clock.now(), self.session_config.session_timeout);
        for id in &expired {
            self.record(format!("Expired session cleaned up: {id}"));
        }
        expired
    }

    /// Writes an event to both the tracing output and the event log.
    pub fn record(&self, message: String) {
        tracing::info!("{message}");
        self.events.append(message);
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The underlying session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.store
    }
}
