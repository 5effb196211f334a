use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    PuzzleUnavailable { date: String },
    AuthenticationRequired,
    InvalidToken,
    MetadataUnavailable,
    PersistenceFailure { message: String },
    InvalidGuess { reason: String },
    Internal { message: String },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::PuzzleUnavailable { date } => write!(f, "No puzzle available for {}", date),
            GameError::AuthenticationRequired => write!(f, "Authentication required"),
            GameError::InvalidToken => write!(f, "Invalid authentication token"),
            GameError::MetadataUnavailable => write!(f, "Pokémon data unavailable"),
            GameError::PersistenceFailure { message } => {
                write!(f, "Failed to save game: {}", message)
            }
            GameError::InvalidGuess { reason } => write!(f, "Invalid guess: {}", reason),
            GameError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for GameError {}
