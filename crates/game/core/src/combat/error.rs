use crate::buff::BuffError;
use crate::effect::EffectError;
use crate::error::{ErrorCategory, GameError};
use crate::state::{CombatantId, EffectId, SkillId};

use super::phase::ResolutionPhase;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("unknown skill `{0}`")]
    UnknownSkill(SkillId),

    /// Skill references a missing effect, or one that is not damage or heal.
    #[error("skill `{skill}` references unusable effect `{effect}`")]
    InvalidSkill { skill: SkillId, effect: EffectId },

    #[error("combatant {0} is not part of this battle")]
    UnknownCombatant(CombatantId),

    #[error("combatant {0} is already defeated")]
    Defeated(CombatantId),

    #[error("skill `{skill}` needs {required} spiritual energy but only {available} remains")]
    InsufficientMp {
        skill: SkillId,
        required: u32,
        available: u32,
    },

    #[error("skill `{0}` was cast without targets")]
    NoTargets(SkillId),

    #[error("buff engine failed during {phase}: {source}")]
    Buff {
        phase: ResolutionPhase,
        source: BuffError,
    },

    #[error("effect evaluation failed during {phase}: {source}")]
    Effect {
        phase: ResolutionPhase,
        source: EffectError,
    },
}

impl CombatError {
    /// Phase the action had reached when the error occurred.
    pub fn phase(&self) -> ResolutionPhase {
        match self {
            Self::Buff { phase, .. } | Self::Effect { phase, .. } => *phase,
            _ => ResolutionPhase::Pending,
        }
    }
}

impl GameError for CombatError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownSkill(_) | Self::InvalidSkill { .. } => ErrorCategory::Configuration,
            Self::UnknownCombatant(_) => ErrorCategory::InvariantViolation,
            Self::Defeated(_) | Self::InsufficientMp { .. } | Self::NoTargets(_) => {
                ErrorCategory::Precondition
            }
            Self::Buff { source, .. } => source.category(),
            Self::Effect { source, .. } => source.category(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownSkill(_) => "COMBAT_UNKNOWN_SKILL",
            Self::InvalidSkill { .. } => "COMBAT_INVALID_SKILL",
            Self::UnknownCombatant(_) => "COMBAT_UNKNOWN_COMBATANT",
            Self::Defeated(_) => "COMBAT_COMBATANT_DEFEATED",
            Self::InsufficientMp { .. } => "COMBAT_INSUFFICIENT_MP",
            Self::NoTargets(_) => "COMBAT_NO_TARGETS",
            Self::Buff { source, .. } => source.error_code(),
            Self::Effect { source, .. } => source.error_code(),
        }
    }
}
