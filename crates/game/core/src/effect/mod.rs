//! Effect Catalog: static definitions of atomic game effects.
//!
//! An effect is one of four kinds (damage, heal, stat modification, custom
//! trigger) paired with a [`Formula`] describing how its magnitude scales.
//! Definitions are immutable once the [`Catalog`](crate::catalog::Catalog) is
//! built; evaluation is a pure function of an [`EffectContext`].

mod error;
mod evaluate;
mod formula;

pub use error::EffectError;
pub use evaluate::{EffectContext, evaluate};
pub use formula::{Formula, Side};

use strum::{Display, EnumString};

use crate::state::{EffectId, SkillId, StatKind};

/// How a stat-modify effect combines with the base value.
///
/// Modifiers combine as `(base + Σadditive) × Π(1 + multiplicative)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ModifierMode {
    Additive,
    Multiplicative,
}

/// When a buff-attached effect fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TriggerCondition {
    OnApply,
    OnTick,
    OnExpire,
    OnHitTaken,
}

/// What an effect does.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    Damage,
    Heal,
    StatModify { stat: StatKind, mode: ModifierMode },
    /// Resolves the referenced skill as a nested action from the buff owner.
    CustomTrigger { skill: SkillId },
}

impl EffectKind {
    /// Tag used by raw content tables.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::Heal => "heal",
            Self::StatModify { .. } => "stat_modify",
            Self::CustomTrigger { .. } => "custom_trigger",
        }
    }

    pub const fn is_stat_modify(&self) -> bool {
        matches!(self, Self::StatModify { .. })
    }
}

/// Immutable definition of a single effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub id: EffectId,
    pub kind: EffectKind,
    pub formula: Formula,
    /// `None` means the effect applies directly (skills) or passively (stat modifiers).
    pub trigger: Option<TriggerCondition>,
}

impl EffectDefinition {
    pub fn new(id: EffectId, kind: EffectKind, formula: Formula) -> Self {
        Self {
            id,
            kind,
            formula,
            trigger: None,
        }
    }

    /// Builder: attach a trigger condition.
    pub fn on(mut self, trigger: TriggerCondition) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn fires_on(&self, condition: TriggerCondition) -> bool {
        self.trigger == Some(condition)
    }
}
