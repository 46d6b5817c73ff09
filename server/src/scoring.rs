//! Score calculation for a finished game.

use crate::config::GameConfig;

/// Scoring constants: a game starts at `initial_score` and loses
/// `attempt_penalty` per counted guess plus one point per elapsed second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub initial_score: u64,
    pub attempt_penalty: u64,
}

impl ScoringRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            initial_score: config.initial_score,
            attempt_penalty: config.attempt_penalty,
        }
    }

    /// Returns the score for a win, clamped at zero.
    pub fn score(&self, attempts: u32, duration_secs: u64) -> u64 {
        let penalty = u64::from(attempts)
            .saturating_mul(self.attempt_penalty)
            .saturating_add(duration_secs);
        self.initial_score.saturating_sub(penalty)
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
