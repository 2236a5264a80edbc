//! Skill definitions: what a combatant can do on its turn.

use crate::state::{EffectId, SkillId, TemplateId};

/// Who a skill's own effects land on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillTarget {
    /// The opposing combatant(s) named by the action.
    Enemy,
    /// The caster.
    Own,
}

/// Recipient of a side-effect buff, relative to the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffRecipient {
    Caster,
    Target,
}

/// A buff applied as a side effect once a skill's own effects resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillBuff {
    pub template: TemplateId,
    pub on: BuffRecipient,
}

impl SkillBuff {
    pub fn new(template: impl Into<TemplateId>, on: BuffRecipient) -> Self {
        Self {
            template: template.into(),
            on,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    /// Damage and heal effects, evaluated in order.
    pub effects: Vec<EffectId>,
    pub target: SkillTarget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buffs: Vec<SkillBuff>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mp_cost: u32,
}

impl SkillDefinition {
    pub fn new(id: impl Into<SkillId>, name: impl Into<String>, target: SkillTarget) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            effects: Vec::new(),
            target,
            buffs: Vec::new(),
            mp_cost: 0,
        }
    }

    pub fn with_effect(mut self, effect: impl Into<EffectId>) -> Self {
        self.effects.push(effect.into());
        self
    }

    pub fn with_buff(mut self, template: impl Into<TemplateId>, on: BuffRecipient) -> Self {
        self.buffs.push(SkillBuff::new(template, on));
        self
    }

    pub fn with_mp_cost(mut self, cost: u32) -> Self {
        self.mp_cost = cost;
        self
    }
}
