//! Read-only character snapshot supplied by the surrounding application.

use super::attributes::{Attributes, Realm};
use super::common::{CharacterId, SkillId};

/// A skill the cultivator has learned, with its comprehension rank.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearnedSkill {
    pub skill: SkillId,
    /// Rank doubles as the quality tier fed into the skill's formulas.
    pub rank: i32,
}

impl LearnedSkill {
    pub fn new(skill: impl Into<SkillId>, rank: i32) -> Self {
        Self {
            skill: skill.into(),
            rank,
        }
    }
}

/// Character/attribute snapshot, read once per inbound action.
///
/// The core never stores this across requests; every call that needs it
/// receives a fresh copy from the character oracle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSnapshot {
    pub id: CharacterId,
    pub name: String,
    pub realm: Realm,
    pub attributes: Attributes,
    /// Quality tier of the equipped artifact set.
    pub equipment_quality: i32,
    pub skills: Vec<LearnedSkill>,
}

impl CharacterSnapshot {
    pub fn new(
        id: CharacterId,
        name: impl Into<String>,
        realm: Realm,
        attributes: Attributes,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            realm,
            attributes,
            equipment_quality: 0,
            skills: Vec::new(),
        }
    }

    pub fn with_equipment_quality(mut self, tier: i32) -> Self {
        self.equipment_quality = tier;
        self
    }

    pub fn with_skill(mut self, skill: LearnedSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Looks up a learned skill by id.
    pub fn skill(&self, id: &SkillId) -> Option<&LearnedSkill> {
        self.skills.iter().find(|learned| &learned.skill == id)
    }
}
