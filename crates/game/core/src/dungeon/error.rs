use crate::buff::BuffError;
use crate::combat::{CombatError, TargetFailure};
use crate::error::{ErrorCategory, GameError};
use crate::state::{BattleRef, CharacterId, ChoiceId, CombatantId, EnemyId, NodeId};

/// Errors raised by the dungeon state machine.
///
/// A failed action never advances the run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DungeonError {
    #[error("character {0} already has an active dungeon run")]
    RunAlreadyActive(CharacterId),

    #[error("character {0} has no active dungeon run")]
    NoActiveRun(CharacterId),

    #[error("choice `{choice}` is not available at node `{node}`")]
    InvalidChoice { node: NodeId, choice: ChoiceId },

    #[error("unknown map node `{0}`")]
    UnknownNode(NodeId),

    #[error("map node `{0}` is not a dungeon entrance")]
    NotAnEntry(NodeId),

    #[error("{quota} quota exhausted ({remaining} remaining)")]
    QuotaExhausted { quota: String, remaining: u64 },

    /// Daily lifespan is spent; no dungeon may be entered until the day turns.
    #[error("character {0} is retreat-locked for today")]
    RetreatLocked(CharacterId),

    #[error("unknown enemy `{0}`")]
    UnknownEnemy(EnemyId),

    #[error("enemy `{0}` has no usable skill")]
    EnemyWithoutSkills(EnemyId),

    /// Run points at a battle whose session is missing.
    #[error("battle session {0} is missing")]
    BattleMissing(BattleRef),

    #[error("exchange failed against {target}: {}", .failure.message)]
    ExchangeFailed {
        target: CombatantId,
        failure: TargetFailure,
    },

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Buff(#[from] BuffError),
}

impl GameError for DungeonError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::RunAlreadyActive(_)
            | Self::NoActiveRun(_)
            | Self::InvalidChoice { .. }
            | Self::UnknownNode(_)
            | Self::NotAnEntry(_)
            | Self::QuotaExhausted { .. }
            | Self::RetreatLocked(_) => ErrorCategory::Precondition,
            Self::UnknownEnemy(_) | Self::EnemyWithoutSkills(_) | Self::ExchangeFailed { .. } => {
                ErrorCategory::Configuration
            }
            Self::BattleMissing(_) => ErrorCategory::InvariantViolation,
            Self::Combat(e) => e.category(),
            Self::Buff(e) => e.category(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RunAlreadyActive(_) => "DUNGEON_RUN_ALREADY_ACTIVE",
            Self::NoActiveRun(_) => "DUNGEON_NO_ACTIVE_RUN",
            Self::InvalidChoice { .. } => "DUNGEON_INVALID_CHOICE",
            Self::UnknownNode(_) => "DUNGEON_UNKNOWN_NODE",
            Self::NotAnEntry(_) => "DUNGEON_NOT_AN_ENTRY",
            Self::QuotaExhausted { .. } => "QUOTA_EXHAUSTED",
            Self::RetreatLocked(_) => "QUOTA_RETREAT_LOCKED",
            Self::UnknownEnemy(_) => "DUNGEON_UNKNOWN_ENEMY",
            Self::EnemyWithoutSkills(_) => "DUNGEON_ENEMY_WITHOUT_SKILLS",
            Self::BattleMissing(_) => "DUNGEON_BATTLE_MISSING",
            Self::ExchangeFailed { .. } => "DUNGEON_EXCHANGE_FAILED",
            Self::Combat(e) => e.error_code(),
            Self::Buff(e) => e.error_code(),
        }
    }
}
