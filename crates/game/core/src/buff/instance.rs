//! Live buff instances attached to a combatant.

use crate::state::{Attributes, CombatantId, TemplateId};

use super::template::BuffDuration;

/// Who applied a buff, frozen at creation for formula evaluation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffSource {
    pub caster: CombatantId,
    /// Caster attributes at the moment of application.
    pub attributes: Attributes,
    /// Item quality or skill rank of the applying action.
    pub quality_tier: i32,
}

impl BuffSource {
    pub fn new(caster: CombatantId, attributes: Attributes, quality_tier: i32) -> Self {
        Self {
            caster,
            attributes,
            quality_tier,
        }
    }
}

/// A buff instance owned by one combatant.
///
/// Fields are readable everywhere but only the buff engine can write them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffInstance {
    pub(super) serial: u32,
    pub(super) owner: CombatantId,
    pub(super) template: TemplateId,
    /// Position of the template in the catalog, used for stable trigger order.
    pub(super) registration: usize,
    pub(super) stacks: u32,
    pub(super) remaining: BuffDuration,
    pub(super) source: BuffSource,
}

impl BuffInstance {
    /// Per-combatant serial number, unique for the lifetime of the combatant.
    pub fn serial(&self) -> u32 {
        self.serial
    }

    pub fn owner(&self) -> CombatantId {
        self.owner
    }

    pub fn template(&self) -> &TemplateId {
        &self.template
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    pub fn remaining(&self) -> BuffDuration {
        self.remaining
    }

    pub fn source(&self) -> &BuffSource {
        &self.source
    }

    pub(super) fn order_key(&self) -> (usize, u32) {
        (self.registration, self.serial)
    }
}
