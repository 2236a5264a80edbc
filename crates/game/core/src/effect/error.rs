use crate::error::{ErrorCategory, GameError};

/// Errors raised while evaluating an effect formula.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    /// Raw content named an effect kind the catalog does not know.
    #[error("unknown effect kind `{0}`")]
    UnknownEffectKind(String),

    /// Scaling inputs were out of range (negative tier, non-finite attribute, ...).
    #[error("invalid effect context: {0}")]
    InvalidContext(String),

    /// Raw record is missing a field its kind requires.
    #[error("effect `{effect}` of kind `{kind}` needs a `{field}` field")]
    IncompleteRecord {
        effect: String,
        kind: String,
        field: &'static str,
    },
}

impl GameError for EffectError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEffectKind(_) => "EFFECT_UNKNOWN_KIND",
            Self::InvalidContext(_) => "EFFECT_INVALID_CONTEXT",
            Self::IncompleteRecord { .. } => "EFFECT_INCOMPLETE_RECORD",
        }
    }
}
