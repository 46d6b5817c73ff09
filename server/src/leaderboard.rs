//! Bounded, score-ordered ranking of finished games
//!
//! The leaderboard keeps at most `capacity` entries sorted by score,
//! highest first. Ties keep the entry that was recorded first: a new entry
//! with a score equal to an existing one lands after it, and is dropped if
//! that pushes it past the last slot.
//!
//! The structure itself is not synchronised; the server wraps it in a lock
//! inside [`SharedState`](crate::state::SharedState).

use shared::ScoreRow;

/// A finished game as recorded on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Validated player name
    pub name: String,
    /// Number of counted guesses, including the winning one
    pub attempts: u32,
    /// Whole seconds between game start and the winning guess
    pub duration_secs: u64,
    /// Score computed by the scoring rules
    pub score: u64,
    /// Unix time (seconds) at which the win was recorded
    pub timestamp: u64,
}

impl ScoreEntry {
    fn to_row(&self, rank: usize) -> ScoreRow {
        ScoreRow {
            rank: rank as u32,
            name: self.name.clone(),
            score: self.score,
            attempts: self.attempts,
            duration: self.duration_secs,
        }
    }
}

/// Top-N ranking of scores
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl Leaderboard {
    /// Creates an empty leaderboard holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts an entry at its ranked position
    ///
    /// The entry goes before the first stored entry with a strictly lower
    /// score. If there is none, it is appended when space remains and
    /// discarded otherwise. When the board overflows, the last entry falls
    /// off. Returns the 1-based rank the entry landed at, or `None` when it
    /// did not make the board.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score);

        let index = match position {
            Some(index) => index,
            None if self.entries.len() < self.capacity => self.entries.len(),
            None => return None,
        };

        self.entries.insert(index, entry);
        self.entries.truncate(self.capacity);
        Some(index + 1)
    }

    /// Copies the current ranking, rank 1 first
    pub fn snapshot(&self) -> Vec<ScoreRow> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.to_row(i + 1))
            .collect()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
