//! # Guessing Game Server Library
//!
//! This library implements a multiplayer number-guessing game served over
//! plain TCP. Every connection gets its own hidden number in a fixed range,
//! sends guesses as text lines and receives JSON hints until it finds the
//! number. Wins are scored and ranked on a shared leaderboard.
//!
//! ## Core Responsibilities
//!
//! ### Connection Acceptance
//! The [`network::Server`] binds the listening socket, numbers each
//! connection and enforces the ceiling on simultaneous players. Connections
//! over the ceiling are told the server is full and closed immediately.
//!
//! ### Per-Connection Protocol
//! Each admitted connection runs a [`session::Session`] in its own task:
//! greeting, name negotiation, the guessing loop and disconnection. Session
//! state is private to that task.
//!
//! ### Shared Rankings
//! The leaderboard and statistics in [`state::SharedState`] are the only
//! data shared between sessions. Each is guarded by its own lock, held only
//! for the in-memory update, so concurrent wins are linearised and every
//! snapshot is a consistent point-in-time copy.
//!
//! ## Module Organization
//!
//! - `config` - tunable parameters and their validation
//! - `error` - library error type
//! - `validation` - name and guess checks
//! - `scoring` - score calculation for a finished game
//! - `leaderboard` - bounded ranking with stable tie-breaking
//! - `stats` - running counters over finished games
//! - `state` - the shared, locked state and connection slots
//! - `session` - the per-connection state machine
//! - `network` - the accept loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::GameConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::bind(GameConfig::default()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Shutdown
//!
//! Stopping the process closes the listener. Sessions still in progress are
//! abandoned rather than drained.

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod network;
pub mod scoring;
pub mod session;
pub mod state;
pub mod stats;
pub mod utils;
pub mod validation;
