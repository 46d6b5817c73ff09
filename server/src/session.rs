//! Per-connection protocol driver
//!
//! A session walks one player through the game:
//!
//! 1. **Greeting** - send the statistics, the leaderboard and a name prompt
//! 2. **AwaitingName** - read candidate names until one is valid, giving up
//!    after the configured number of invalid attempts
//! 3. **GameStart** - draw the hidden number and start the clock
//! 4. **Playing** - answer guesses with hints until the number is found, the
//!    player quits, or the connection drops
//! 5. **Disconnected** - terminal
//!
//! Session fields are owned by the task running it. The only shared data it
//! touches is [`SharedState`], and only for short in-memory updates.

use crate::config::GameConfig;
use crate::error::ServerError;
use crate::leaderboard::ScoreEntry;
use crate::scoring::ScoringRules;
use crate::state::SharedState;
use crate::utils::unix_timestamp;
use crate::validation::InputRules;
use log::{debug, info};
use rand::Rng;
use shared::{strip_line_ending, Command, Direction, ServerMessage};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf,
    WriteHalf,
};
use tokio::time::Instant;

/// Longest line read in one piece; anything beyond is read as a further line.
const MAX_LINE_BYTES: u64 = 4096;

/// Protocol states of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Greeting,
    AwaitingName,
    GameStart,
    Playing,
    Disconnected,
}

/// The game in progress once a name has been accepted
#[derive(Debug)]
struct Game {
    target: i64,
    attempts: u32,
    started_at: Instant,
}

pub struct Session<S> {
    id: u64,
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    line: Vec<u8>,
    state: Arc<SharedState>,
    rules: InputRules,
    scoring: ScoringRules,
    max_name_attempts: u32,
    name_attempts: u32,
    name: Option<String>,
    game: Option<Game>,
    preset_target: Option<i64>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite,
{
    pub fn new(id: u64, stream: S, state: Arc<SharedState>, config: &GameConfig) -> Self {
        let (reader, writer) = tokio::io::split(stream);

        Self {
            id,
            reader: BufReader::new(reader),
            writer,
            line: Vec::new(),
            state,
            rules: InputRules::from_config(config),
            scoring: ScoringRules::from_config(config),
            max_name_attempts: config.max_name_attempts,
            name_attempts: 0,
            name: None,
            game: None,
            preset_target: None,
        }
    }

    /// Uses `target` instead of a random number when the game starts.
    #[cfg(test)]
    pub(crate) fn with_target(mut self, target: i64) -> Self {
        self.preset_target = Some(target);
        self
    }

    /// Drives the session until it reaches [`Phase::Disconnected`]
    ///
    /// A closed or failing read ends the session normally. A failed write
    /// is returned as an error. The write half is shut down on the way out
    /// either way.
    pub async fn run(mut self) -> Result<(), ServerError> {
        let result = self.drive().await;

        let _ = self.writer.shutdown().await;
        info!(
            "Client #{} - {}: disconnected",
            self.id,
            self.name.as_deref().unwrap_or("anonymous")
        );
        result
    }

    async fn drive(&mut self) -> Result<(), ServerError> {
        let mut phase = Phase::Greeting;

        while phase != Phase::Disconnected {
            phase = match phase {
                Phase::Greeting => self.greet().await?,
                Phase::AwaitingName => self.read_name().await?,
                Phase::GameStart => self.start_game().await?,
                Phase::Playing => self.play_turn().await?,
                Phase::Disconnected => Phase::Disconnected,
            };
        }
        Ok(())
    }

    async fn greet(&mut self) -> Result<Phase, ServerError> {
        let stats = self.state.stats_message().await;
        let leaderboard = self.state.leaderboard_message().await;
        self.send(&stats).await?;
        self.send(&leaderboard).await?;

        let prompt = ServerMessage::Prompt {
            message: format!(
                "enter your name ({}-{} letters)",
                self.rules.min_name_length, self.rules.max_name_length
            ),
        };
        self.send(&prompt).await?;
        Ok(Phase::AwaitingName)
    }

    async fn read_name(&mut self) -> Result<Phase, ServerError> {
        let Some(line) = self.read_line().await else {
            debug!("Client #{}: disconnected while choosing a name", self.id);
            return Ok(Phase::Disconnected);
        };

        if self.rules.is_valid_name(&line) {
            info!("Client #{}: name accepted '{}'", self.id, line);
            self.send(&ServerMessage::NameAccepted { name: line.clone() })
                .await?;
            self.name = Some(line);
            return Ok(Phase::GameStart);
        }

        self.name_attempts += 1;
        self.send(&ServerMessage::error(self.rules.name_rules_message()))
            .await?;

        if self.name_attempts >= self.max_name_attempts {
            info!(
                "Client #{}: {} invalid names, disconnecting",
                self.id, self.name_attempts
            );
            self.send(&ServerMessage::error(
                "too many invalid names, disconnecting",
            ))
            .await?;
            return Ok(Phase::Disconnected);
        }
        Ok(Phase::AwaitingName)
    }

    async fn start_game(&mut self) -> Result<Phase, ServerError> {
        let (min, max) = (self.rules.min_number, self.rules.max_number);
        let target = self
            .preset_target
            .unwrap_or_else(|| rand::thread_rng().gen_range(min..=max));
        let player = self.name.clone().unwrap_or_default();

        debug!(
            "Client #{} - {}: game started (target {})",
            self.id, player, target
        );
        self.game = Some(Game {
            target,
            attempts: 0,
            started_at: Instant::now(),
        });

        self.send(&ServerMessage::GameStart { player, min, max })
            .await?;
        Ok(Phase::Playing)
    }

    async fn play_turn(&mut self) -> Result<Phase, ServerError> {
        let Some(line) = self.read_line().await else {
            debug!("Client #{}: disconnected during the game", self.id);
            return Ok(Phase::Disconnected);
        };

        let guess = match Command::parse(&line) {
            Command::Quit => {
                self.send(&ServerMessage::Bye {
                    message: "goodbye, thanks for playing".to_string(),
                })
                .await?;
                return Ok(Phase::Disconnected);
            }
            Command::Stats => {
                let stats = self.state.stats_message().await;
                let leaderboard = self.state.leaderboard_message().await;
                self.send(&stats).await?;
                self.send(&leaderboard).await?;
                return Ok(Phase::Playing);
            }
            Command::Guess(text) => self.rules.parse_guess(text),
        };

        let guess = match guess {
            Ok(guess) => guess,
            Err(e) => {
                self.send(&ServerMessage::error(e.to_string())).await?;
                return Ok(Phase::Playing);
            }
        };

        let Some(game) = self.game.as_mut() else {
            return Ok(Phase::GameStart);
        };
        game.attempts += 1;
        let (target, attempts) = (game.target, game.attempts);
        debug!(
            "Client #{}: attempt {} -> {} (target {})",
            self.id, attempts, guess, target
        );

        let direction = match guess.cmp(&target) {
            Ordering::Greater => Direction::TooHigh,
            Ordering::Less => Direction::TooLow,
            Ordering::Equal => return self.finish_game().await,
        };
        self.send(&ServerMessage::Hint {
            direction,
            attempts,
        })
        .await?;
        Ok(Phase::Playing)
    }

    async fn finish_game(&mut self) -> Result<Phase, ServerError> {
        let Some(game) = self.game.take() else {
            return Ok(Phase::Disconnected);
        };
        let player = self.name.clone().unwrap_or_default();
        let duration = game.started_at.elapsed().as_secs();
        let score = self.scoring.score(game.attempts, duration);

        // The win counts even if the player is already gone.
        let announced = self
            .send(&ServerMessage::Victory {
                player: player.clone(),
                number: game.target,
                attempts: game.attempts,
                duration,
                score,
            })
            .await;

        let rank = self
            .state
            .record_win(ScoreEntry {
                name: player.clone(),
                attempts: game.attempts,
                duration_secs: duration,
                score,
                timestamp: unix_timestamp(),
            })
            .await;
        match rank {
            Some(rank) => info!(
                "Client #{} - {}: won in {} attempts ({}s), score {}, rank {}",
                self.id, player, game.attempts, duration, score, rank
            ),
            None => info!(
                "Client #{} - {}: won in {} attempts ({}s), score {}",
                self.id, player, game.attempts, duration, score
            ),
        }

        announced?;
        let leaderboard = self.state.leaderboard_message().await;
        self.send(&leaderboard).await?;
        Ok(Phase::Disconnected)
    }

    /// Reads one line, without its terminator. `None` means the peer is gone.
    async fn read_line(&mut self) -> Option<String> {
        self.line.clear();
        let mut limited = (&mut self.reader).take(MAX_LINE_BYTES);

        match limited.read_until(b'\n', &mut self.line).await {
            Ok(0) => None,
            Ok(_) => {
                let text = String::from_utf8_lossy(&self.line);
                Some(strip_line_ending(&text).to_string())
            }
            Err(e) => {
                debug!("Client #{}: read failed: {}", self.id, e);
                None
            }
        }
    }

    async fn send(&mut self, message: &ServerMessage) -> Result<(), ServerError> {
        let line = message.to_line()?;
        self.writer.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
