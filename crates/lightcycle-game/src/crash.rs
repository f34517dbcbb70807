//! Crash validation: is the client's claimed game-over real?
//!
//! A game ends when the cycle's head leaves the board or runs into its
//! own trail. The client reports where it crashed, and the server checks
//! that claim against the trail *it* recorded. A position that is on the
//! board and not on the trail means the client is lying about how the
//! game ended.

use lightcycle_protocol::Position;

use crate::GameConfig;

/// How a legitimate crash happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashKind {
    /// The head left the board.
    Wall,
    /// The head landed on a cell already in the trail.
    Trail,
}

/// Pure check of a final position against the board and trail.
#[derive(Debug, Clone, Copy)]
pub struct CrashValidator {
    grid_size: i32,
}

impl CrashValidator {
    pub fn new(grid_size: i32) -> Self {
        Self { grid_size }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.grid_size)
    }

    /// Classifies `head`. The wall check runs first, so a position off the
    /// board is a wall crash whatever the trail holds.
    pub fn check(&self, head: Position, trail: &[Position]) -> Option<CrashKind> {
        if !self.in_bounds(head) {
            return Some(CrashKind::Wall);
        }
        if trail.contains(&head) {
            return Some(CrashKind::Trail);
        }
        None
    }

    pub fn is_valid_crash(&self, head: Position, trail: &[Position]) -> bool {
        self.check(head, trail).is_some()
    }

    fn in_bounds(&self, p: Position) -> bool {
        (0..self.grid_size).contains(&p.x) && (0..self.grid_size).contains(&p.y)
    }
}

impl Default for CrashValidator {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
