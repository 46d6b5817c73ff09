//! State shared by every session task
//!
//! The leaderboard and the statistics are the only data visible to more
//! than one connection. Each sits behind its own lock, taken only for the
//! in-memory update or copy and never held across socket I/O. Connection
//! counters are atomics so they can be released from `Drop`.

use crate::leaderboard::{Leaderboard, ScoreEntry};
use crate::stats::GameStats;
use shared::ServerMessage;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Process-wide game state, created once at startup
#[derive(Debug)]
pub struct SharedState {
    leaderboard: RwLock<Leaderboard>,
    stats: RwLock<GameStats>,
    started_at: Instant,
    active_connections: AtomicUsize,
    total_served: AtomicU64,
}

impl SharedState {
    pub fn new(leaderboard_size: usize) -> Self {
        Self {
            leaderboard: RwLock::new(Leaderboard::new(leaderboard_size)),
            stats: RwLock::new(GameStats::new()),
            started_at: Instant::now(),
            active_connections: AtomicUsize::new(0),
            total_served: AtomicU64::new(0),
        }
    }

    /// Reserves a live-connection slot unless `max_clients` are already live
    ///
    /// The check and the increment are a single atomic step, so concurrent
    /// callers can never push the count past the ceiling. The slot is
    /// released when the returned guard is dropped.
    pub fn try_acquire_slot(self: &Arc<Self>, max_clients: usize) -> Option<ConnectionGuard> {
        self.active_connections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |active| {
                (active < max_clients).then_some(active + 1)
            })
            .ok()?;
        self.total_served.fetch_add(1, Ordering::SeqCst);

        Some(ConnectionGuard {
            state: Arc::clone(self),
        })
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }

    pub fn total_served(&self) -> u64 {
        self.total_served.load(Ordering::SeqCst)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Records a won game in the statistics and on the leaderboard
    ///
    /// Returns the rank the entry landed at, or `None` if it did not make
    /// the board.
    pub async fn record_win(&self, entry: ScoreEntry) -> Option<usize> {
        self.stats.write().await.record_game(entry.attempts);
        self.leaderboard.write().await.insert(entry)
    }

    /// Current statistics as a `stats` message
    pub async fn stats_message(&self) -> ServerMessage {
        let snapshot = self.stats.read().await.snapshot();

        ServerMessage::Stats {
            uptime: self.uptime_secs(),
            active_clients: self.active_connections(),
            total_served: self.total_served(),
            total_games: snapshot.total_games,
            best_attempts: snapshot.best_attempts,
            avg_attempts: snapshot.avg_attempts,
        }
    }

    /// Current ranking as a `leaderboard` message
    pub async fn leaderboard_message(&self) -> ServerMessage {
        let scores = self.leaderboard.read().await.snapshot();

        ServerMessage::Leaderboard {
            count: scores.len(),
            scores,
        }
    }
}

/// A live-connection slot; dropping it frees the slot
#[derive(Debug)]
pub struct ConnectionGuard {
    state: Arc<SharedState>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.state.active_connections.fetch_sub(1, Ordering::SeqCst);
    }
}
