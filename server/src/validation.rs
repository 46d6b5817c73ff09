//! Player input validation: names during registration, guesses during play.

use crate::config::GameConfig;
use thiserror::Error;

/// Why a guess line was rejected. The display text is sent to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("enter a valid whole number")]
    NotANumber,
    #[error("the number must be between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },
}

/// Bounds applied to player names and guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRules {
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub min_number: i64,
    pub max_number: i64,
}

impl InputRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            min_name_length: config.min_name_length,
            max_name_length: config.max_name_length,
            min_number: config.min_number,
            max_number: config.max_number,
        }
    }

    /// A name is valid when its length lies within the bounds (inclusive)
    /// and every character is an ASCII letter.
    pub fn is_valid_name(&self, name: &str) -> bool {
        let len = name.len();
        len >= self.min_name_length
            && len <= self.max_name_length
            && name.bytes().all(|b| b.is_ascii_alphabetic())
    }

    /// Parses a guess the way `strtol` would with a full-match check:
    /// optional leading whitespace, optional sign, decimal digits, nothing else.
    pub fn parse_guess(&self, line: &str) -> Result<i64, GuessError> {
        let guess: i64 = line
            .trim_start_matches(|c: char| c.is_ascii_whitespace())
            .parse()
            .map_err(|_| GuessError::NotANumber)?;

        if guess < self.min_number || guess > self.max_number {
            return Err(GuessError::OutOfRange {
                min: self.min_number,
                max: self.max_number,
            });
        }
        Ok(guess)
    }

    pub fn name_rules_message(&self) -> String {
        format!(
            "invalid name: use {} to {} letters (a-z, A-Z), no digits, spaces or symbols",
            self.min_name_length, self.max_name_length
        )
    }
}

impl Default for InputRules {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
