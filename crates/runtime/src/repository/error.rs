//! Error types raised by repository implementations.

use game_core::{ErrorCategory, GameError};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl GameError for RepositoryError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::InvariantViolation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "REPOSITORY_LOCK_POISONED",
            Self::Io(_) => "REPOSITORY_IO",
            Self::Serialization(_) => "REPOSITORY_SERIALIZATION",
            Self::CorruptedData(_) => "REPOSITORY_CORRUPTED_DATA",
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
