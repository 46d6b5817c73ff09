//! Running game statistics aggregated across every finished game.

/// Counters updated once per won game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameStats {
    total_games: u64,
    total_attempts: u64,
    /// `None` until the first game is recorded
    best_attempts: Option<u32>,
    avg_attempts: f64,
}

/// Point-in-time copy of [`GameStats`], ready for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameStatsSnapshot {
    pub total_games: u64,
    /// 0 while no game has been recorded
    pub best_attempts: u32,
    pub avg_attempts: f64,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a finished game into the counters and recomputes the average.
    pub fn record_game(&mut self, attempts: u32) {
        self.total_games += 1;
        self.total_attempts += u64::from(attempts);
        self.avg_attempts = self.total_attempts as f64 / self.total_games as f64;

        if self.best_attempts.map_or(true, |best| attempts < best) {
            self.best_attempts = Some(attempts);
        }
    }

    pub fn snapshot(&self) -> GameStatsSnapshot {
        GameStatsSnapshot {
            total_games: self.total_games,
            best_attempts: self.best_attempts.unwrap_or(0),
            avg_attempts: self.avg_attempts,
        }
    }
}
