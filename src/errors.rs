// ABOUTME: Error types for the deckpilot navigation engine
// ABOUTME: Provides structured error handling for deck building, navigation and serving

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("A deck needs at least one slide")]
    EmptyDeck,

    #[error("Slide index {index} is out of range for a deck of {len} slides")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
