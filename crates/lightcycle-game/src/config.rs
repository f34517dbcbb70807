//! Game rules configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable rules for a Lightcycle deployment.
///
/// The defaults are the reference deployment's values: a 40×40 grid, a
/// client game loop ticking every 100 ms (30 ms is the fastest tolerated
/// move), and a seeded leaderboard of 500 points held by "ARC".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board width and height. Valid cells are `0..grid_size` on both axes.
    pub grid_size: i32,

    /// A move arriving sooner than this after the previous accepted move
    /// is rejected as too fast.
    pub min_move_interval: Duration,

    /// A move arriving later than this after the previous accepted move
    /// is rejected as too slow.
    pub max_move_interval: Duration,

    /// Fewest recorded moves a session needs before a score is considered.
    pub min_trail_len: usize,

    /// High score the leaderboard starts with.
    pub seed_high_score: u32,

    /// Record holder the leaderboard starts with.
    pub seed_top_player: String,

    /// Label written to the leaderboard when a session beats the record.
    pub challenger_label: String,

    /// How many recent events the event log retains.
    pub event_log_capacity: usize,

    /// How often the expiry sweep runs.
    pub reap_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 40,
            min_move_interval: Duration::from_millis(30),
            max_move_interval: Duration::from_secs(2),
            min_trail_len: 3,
            seed_high_score: 500,
            seed_top_player: "ARC".to_owned(),
            challenger_label: "CHALLENGER".to_owned(),
            event_log_capacity: 100,
            reap_interval: Duration::from_secs(60),
        }
    }
}
