use crate::buff::BuffError;
use crate::effect::EffectError;
use crate::error::{ErrorCategory, GameError};
use crate::state::{EffectId, EnemyId, NodeId, SkillId, TemplateId};

/// Load-time validation failures. All of them are configuration errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate {kind} id `{id}`")]
    Duplicate { kind: &'static str, id: String },

    #[error(transparent)]
    Effect(#[from] EffectError),

    /// A template references an unknown effect.
    #[error(transparent)]
    Buff(#[from] BuffError),

    #[error("effect `{effect}`: {reason}")]
    InvalidEffect { effect: EffectId, reason: String },

    #[error("buff template `{template}`: max_stack {max_stack} is outside 1..={ceiling}")]
    InvalidStackLimit {
        template: TemplateId,
        max_stack: u32,
        ceiling: u32,
    },

    #[error("buff template `{template}`: {reason}")]
    MalformedTemplate { template: TemplateId, reason: String },

    #[error("skill `{skill}`: {reason}")]
    InvalidSkill { skill: SkillId, reason: String },

    #[error("enemy `{enemy}`: {reason}")]
    InvalidEnemy { enemy: EnemyId, reason: String },

    #[error("map node `{node}`: {reason}")]
    InvalidNode { node: NodeId, reason: String },
}

impl GameError for CatalogError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Effect(e) => e.category(),
            Self::Buff(e) => e.category(),
            _ => ErrorCategory::Configuration,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate { .. } => "CATALOG_DUPLICATE_ID",
            Self::Effect(e) => e.error_code(),
            Self::Buff(e) => e.error_code(),
            Self::InvalidEffect { .. } => "CATALOG_INVALID_EFFECT",
            Self::InvalidStackLimit { .. } => "CATALOG_INVALID_STACK_LIMIT",
            Self::MalformedTemplate { .. } => "CATALOG_MALFORMED_TEMPLATE",
            Self::InvalidSkill { .. } => "CATALOG_INVALID_SKILL",
            Self::InvalidEnemy { .. } => "CATALOG_INVALID_ENEMY",
            Self::InvalidNode { .. } => "CATALOG_INVALID_NODE",
        }
    }
}
