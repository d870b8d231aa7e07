//! High score tracking
//!
//! Kept in memory only; it survives level resets but not the process.

use serde::{Deserialize, Serialize};

/// Best score seen this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a score. Returns true if it set a new best.
    pub fn submit(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}
