use crate::effect::EffectError;
use crate::error::{ErrorCategory, GameError};
use crate::state::{CombatantId, EffectId, TemplateId};

/// Errors raised by the buff engine.
///
/// Every failing operation leaves the combatant's buff list untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuffError {
    /// Template id is not registered in the catalog.
    #[error("unknown buff template `{0}`")]
    UnknownTemplate(TemplateId),

    /// Template references an effect the catalog does not define.
    #[error("buff template `{template}` references unknown effect `{effect}`")]
    InvalidTemplate { template: TemplateId, effect: EffectId },

    /// More than one live instance of a non-independent template.
    #[error("combatant {owner} holds {count} live instances of `{template}`")]
    DuplicateInstance {
        owner: CombatantId,
        template: TemplateId,
        count: usize,
    },

    /// Formula evaluation failed for one of the template's effects.
    #[error(transparent)]
    Effect(#[from] EffectError),
}

impl GameError for BuffError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownTemplate(_) | Self::InvalidTemplate { .. } => ErrorCategory::Configuration,
            Self::DuplicateInstance { .. } => ErrorCategory::InvariantViolation,
            Self::Effect(e) => e.category(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTemplate(_) => "BUFF_UNKNOWN_TEMPLATE",
            Self::InvalidTemplate { .. } => "BUFF_INVALID_TEMPLATE",
            Self::DuplicateInstance { .. } => "BUFF_DUPLICATE_INSTANCE",
            Self::Effect(e) => e.error_code(),
        }
    }
}
