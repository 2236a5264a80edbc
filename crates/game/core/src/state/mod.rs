//! Plain state handed across the core boundary.
//!
//! Everything here is a value: the caller supplies it per action and gets the
//! mutated copy back. Durable storage belongs to the runtime's repositories.
mod attributes;
mod character;
mod combatant;
mod common;

pub use attributes::{Attributes, Realm, StatKind};
pub use character::{CharacterSnapshot, LearnedSkill};
pub use combatant::{CombatantState, ResourcePool, points};
pub use common::{
    BattleRef, CharacterId, ChoiceId, CombatantId, EffectId, EnemyId, NodeId, SkillId, TemplateId,
};
