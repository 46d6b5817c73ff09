//! Server configuration, fixed for the lifetime of the process.

use crate::error::ServerError;
use shared::{
    ATTEMPT_PENALTY, DEFAULT_PORT, INITIAL_SCORE, LEADERBOARD_SIZE, MAX_CLIENTS,
    MAX_NAME_ATTEMPTS, MAX_NAME_LENGTH, MAX_NUMBER, MIN_NAME_LENGTH, MIN_NUMBER,
};

/// Every tunable parameter of the game server.
///
/// `Default` reproduces the reference rules: port 8080, 30 concurrent
/// players, targets in 0..=100, names of 3 to 10 letters, a top-10 board
/// and a score of `10000 - attempts * 100 - seconds`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub host: String,
    pub port: u16,
    pub max_clients: usize,
    pub min_number: i64,
    pub max_number: i64,
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub max_name_attempts: u32,
    pub leaderboard_size: usize,
    pub initial_score: u64,
    pub attempt_penalty: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_clients: MAX_CLIENTS,
            min_number: MIN_NUMBER,
            max_number: MAX_NUMBER,
            min_name_length: MIN_NAME_LENGTH,
            max_name_length: MAX_NAME_LENGTH,
            max_name_attempts: MAX_NAME_ATTEMPTS,
            leaderboard_size: LEADERBOARD_SIZE,
            initial_score: INITIAL_SCORE,
            attempt_penalty: ATTEMPT_PENALTY,
        }
    }
}

impl GameConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Rejects combinations the game cannot run with.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.min_number > self.max_number {
            return Err(ServerError::Config(format!(
                "number range is empty ({} > {})",
                self.min_number, self.max_number
            )));
        }
        if self.min_name_length == 0 || self.min_name_length > self.max_name_length {
            return Err(ServerError::Config(format!(
                "invalid name length bounds {}..={}",
                self.min_name_length, self.max_name_length
            )));
        }
        if self.max_clients == 0 {
            return Err(ServerError::Config("max clients must be at least 1".into()));
        }
        if self.leaderboard_size == 0 {
            return Err(ServerError::Config(
                "leaderboard size must be at least 1".into(),
            ));
        }
        if self.max_name_attempts == 0 {
            return Err(ServerError::Config(
                "max name attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_rules() {
        let config = GameConfig::default();

        assert_eq!(config.port, 8080);
        assert_eq!(config.max_clients, 30);
        assert_eq!((config.min_number, config.max_number), (0, 100));
        assert_eq!((config.min_name_length, config.max_name_length), (3, 10));
        assert_eq!(config.leaderboard_size, 10);
        assert_eq!(config.max_name_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let config = GameConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            ..GameConfig::default()
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let inverted_range = GameConfig {
            min_number: 10,
            max_number: 5,
            ..GameConfig::default()
        };
        assert!(matches!(
            inverted_range.validate(),
            Err(ServerError::Config(_))
        ));

        let bad_names = GameConfig {
            min_name_length: 0,
            ..GameConfig::default()
        };
        assert!(bad_names.validate().is_err());

        let no_clients = GameConfig {
            max_clients: 0,
            ..GameConfig::default()
        };
        assert!(no_clients.validate().is_err());

        let no_board = GameConfig {
            leaderboard_size: 0,
            ..GameConfig::default()
        };
        assert!(no_board.validate().is_err());
    }
}
