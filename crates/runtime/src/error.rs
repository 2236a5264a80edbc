//! Unified error type surfaced by the runtime API.
//!
//! Wraps rule, quota and repository failures so clients can bubble them up
//! with a stable kind string via [`GameError::error_code`].

use game_core::{CharacterId, DungeonError, ErrorCategory, GameError};
use thiserror::Error;

pub use crate::quota::QuotaError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Dungeon(#[from] DungeonError),

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("unknown character {0}")]
    UnknownCharacter(CharacterId),

    #[error("invalid setting {name}={value:?}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("service requires a {0} before building")]
    MissingComponent(&'static str),
}

impl GameError for RuntimeError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Dungeon(e) => e.category(),
            Self::Quota(e) => e.category(),
            Self::Repository(e) => e.category(),
            Self::UnknownCharacter(_) => ErrorCategory::Precondition,
            Self::InvalidSetting { .. } | Self::MissingComponent(_) => ErrorCategory::Configuration,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Dungeon(e) => e.error_code(),
            Self::Quota(e) => e.error_code(),
            Self::Repository(e) => e.error_code(),
            Self::UnknownCharacter(_) => "CHARACTER_UNKNOWN",
            Self::InvalidSetting { .. } => "RUNTIME_INVALID_SETTING",
            Self::MissingComponent(_) => "RUNTIME_MISSING_COMPONENT",
        }
    }
}
