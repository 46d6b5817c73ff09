//! Wire protocol shared by the guessing-game server and its clients.
//!
//! Inbound traffic is plain text, one command or guess per line. Outbound
//! traffic is one JSON object per line, tagged by a `"type"` field.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8080;
pub const MAX_CLIENTS: usize = 30;
pub const MIN_NUMBER: i64 = 0;
pub const MAX_NUMBER: i64 = 100;
pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 10;
pub const LEADERBOARD_SIZE: usize = 10;
pub const INITIAL_SCORE: u64 = 10_000;
pub const ATTEMPT_PENALTY: u64 = 100;
pub const MAX_NAME_ATTEMPTS: u32 = 5;

/// Which way the hidden number lies relative to a wrong guess.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The guess was too high.
    #[serde(rename = "grand")]
    TooHigh,
    /// The guess was too low.
    #[serde(rename = "petit")]
    TooLow,
}

/// One row of a leaderboard snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub rank: u32,
    pub name: String,
    pub score: u64,
    pub attempts: u32,
    pub duration: u64,
}

/// Every object the server writes to a connection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Stats {
        uptime: u64,
        active_clients: usize,
        total_served: u64,
        total_games: u64,
        best_attempts: u32,
        avg_attempts: f64,
    },
    Leaderboard {
        count: usize,
        scores: Vec<ScoreRow>,
    },
    Prompt {
        message: String,
    },
    NameAccepted {
        name: String,
    },
    GameStart {
        player: String,
        min: i64,
        max: i64,
    },
    Hint {
        direction: Direction,
        attempts: u32,
    },
    Victory {
        player: String,
        number: i64,
        attempts: u32,
        duration: u64,
        score: u64,
    },
    Error {
        message: String,
    },
    Bye {
        message: String,
    },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Encodes the message as a single newline-terminated JSON line.
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn from_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line.trim_end())
    }
}

/// A line received while a game is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Stats,
    /// Anything else; parsed as a number by the server.
    Guess(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        if line.eq_ignore_ascii_case("quit") {
            Command::Quit
        } else if line.eq_ignore_ascii_case("stats") {
            Command::Stats
        } else {
            Command::Guess(line)
        }
    }
}

/// Strips the trailing line terminator from a received line.
pub fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
