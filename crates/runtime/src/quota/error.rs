use game_core::{ErrorCategory, GameError};
use thiserror::Error;

use super::QuotaKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuotaError {
    /// Consumption must be strictly positive.
    #[error("invalid {kind} quota amount {amount}")]
    InvalidAmount { kind: QuotaKind, amount: i64 },

    #[error("quota counter store lock was poisoned")]
    LockPoisoned,

    #[error("quota counter store unavailable: {0}")]
    Store(String),
}

impl GameError for QuotaError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::InvariantViolation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "QUOTA_INVALID_AMOUNT",
            Self::LockPoisoned => "QUOTA_STORE_POISONED",
            Self::Store(_) => "QUOTA_STORE_UNAVAILABLE",
        }
    }
}
