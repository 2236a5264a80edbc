//! Results of a resolved combat action.

use crate::buff::StackResolution;
use crate::error::GameError;
use crate::state::{CombatantId, EffectId, SkillId, TemplateId};

use super::error::CombatError;
use super::phase::ResolutionPhase;

/// A side-effect buff that landed on a combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedBuff {
    pub recipient: CombatantId,
    pub template: TemplateId,
    pub serial: u32,
    pub stacks: u32,
    pub resolution: StackResolution,
}

/// What an on-hit-taken trigger did.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEffect {
    /// Damage dealt back to the attacker.
    Reflected { amount: u32 },
    /// Health restored to the buff owner.
    Healed { amount: u32 },
    /// A nested skill resolved by the buff owner against the attacker.
    Retaliated(Box<CombatOutcome>),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerEvent {
    pub owner: CombatantId,
    pub template: TemplateId,
    pub effect: EffectId,
    pub result: TriggerEffect,
}

/// Changes applied to one target.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetDelta {
    pub damage: u32,
    pub healed: u32,
    pub defeated: bool,
    pub triggers: Vec<TriggerEvent>,
    pub buffs: Vec<AppliedBuff>,
}

/// Why a single target could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetFailure {
    pub phase: ResolutionPhase,
    pub kind: String,
    pub message: String,
}

impl From<&CombatError> for TargetFailure {
    fn from(error: &CombatError) -> Self {
        Self {
            phase: error.phase(),
            kind: error.error_code().to_owned(),
            message: error.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetResult {
    Resolved(TargetDelta),
    Failed(TargetFailure),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: CombatantId,
    pub result: TargetResult,
}

impl TargetOutcome {
    pub fn delta(&self) -> Option<&TargetDelta> {
        match &self.result {
            TargetResult::Resolved(delta) => Some(delta),
            TargetResult::Failed(_) => None,
        }
    }
}

/// Summary of one combat action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    pub skill: SkillId,
    pub caster: CombatantId,
    pub phase: ResolutionPhase,
    pub mp_spent: u32,
    pub targets: Vec<TargetOutcome>,
    /// Side-effect buffs applied to the caster.
    pub caster_buffs: Vec<AppliedBuff>,
}

impl CombatOutcome {
    pub(crate) fn new(skill: SkillId, caster: CombatantId) -> Self {
        Self {
            skill,
            caster,
            phase: ResolutionPhase::Pending,
            mp_spent: 0,
            targets: Vec::new(),
            caster_buffs: Vec::new(),
        }
    }

    pub fn target(&self, id: CombatantId) -> Option<&TargetOutcome> {
        self.targets.iter().find(|outcome| outcome.target == id)
    }

    pub fn total_damage(&self) -> u32 {
        self.targets.iter().filter_map(TargetOutcome::delta).map(|d| d.damage).sum()
    }

    pub fn failed_targets(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.targets
            .iter()
            .filter(|outcome| matches!(outcome.result, TargetResult::Failed(_)))
            .map(|outcome| outcome.target)
    }

    /// True when at least one target failed while others resolved.
    pub fn is_partial(&self) -> bool {
        let failed = self.failed_targets().count();
        failed > 0 && failed < self.targets.len()
    }
}
