//! Buff templates: the static half of the buff system.

use bitflags::bitflags;
use strum::{Display, EnumString};

use crate::state::{EffectId, TemplateId};

bitflags! {
    /// Classification tags used for dispel and cleanse matching.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct BuffTags: u16 {
        const BUFF    = 1 << 0;
        const DEBUFF  = 1 << 1;
        const CONTROL = 1 << 2;
        /// Damage over time.
        const DOT     = 1 << 3;
        /// Healing over time.
        const HOT     = 1 << 4;
        const SHIELD  = 1 << 5;
        /// Cannot be removed by ordinary dispels.
        const INNATE  = 1 << 6;
    }
}

/// How re-applying a template to the same combatant resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackPolicy {
    /// Every application creates a distinct instance; `max_stack` is ignored.
    Independent,
    /// Re-application resets the duration and leaves stacks at 1.
    RefreshDuration,
    /// Re-application adds a stack (up to `max_stack`) and resets the duration.
    StackUpToN,
}

impl StackPolicy {
    pub const fn is_stackable(self) -> bool {
        !matches!(self, Self::Independent)
    }
}

/// Remaining lifetime of a buff, in turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffDuration {
    Turns(u32),
    Infinite,
}

impl BuffDuration {
    /// Duration after `elapsed` turns have passed.
    pub fn advanced(self, elapsed: u32) -> Self {
        match self {
            Self::Turns(turns) => Self::Turns(turns.saturating_sub(elapsed)),
            Self::Infinite => Self::Infinite,
        }
    }

    pub fn is_expired(self) -> bool {
        matches!(self, Self::Turns(0))
    }
}

/// Static description of a buff, loaded once at startup.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffTemplate {
    pub id: TemplateId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub effects: Vec<EffectId>,
    pub stack_policy: StackPolicy,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stack"))]
    pub max_stack: u32,
    pub duration: BuffDuration,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: BuffTags,
}

#[cfg(feature = "serde")]
fn default_max_stack() -> u32 {
    1
}

impl BuffTemplate {
    pub fn new(
        id: impl Into<TemplateId>,
        name: impl Into<String>,
        stack_policy: StackPolicy,
        max_stack: u32,
        duration: BuffDuration,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            effects: Vec::new(),
            stack_policy,
            max_stack,
            duration,
            tags: BuffTags::empty(),
        }
    }

    /// Builder: attach an effect reference.
    pub fn with_effect(mut self, effect: impl Into<EffectId>) -> Self {
        self.effects.push(effect.into());
        self
    }

    /// Builder: set classification tags.
    pub fn tagged(mut self, tags: BuffTags) -> Self {
        self.tags = tags;
        self
    }
}
