//! Loosely-typed effect rows as they appear in content tables.

use crate::effect::{
    EffectDefinition, EffectError, EffectKind, Formula, ModifierMode, TriggerCondition,
};
use crate::state::{EffectId, SkillId, StatKind};

/// One effect row. The kind is a free-form string checked on conversion.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectRecord {
    pub id: EffectId,
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat: Option<StatKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: Option<ModifierMode>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill: Option<SkillId>,
    pub formula: Formula,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: Option<TriggerCondition>,
}

impl TryFrom<EffectRecord> for EffectDefinition {
    type Error = EffectError;

    fn try_from(record: EffectRecord) -> Result<Self, Self::Error> {
        let missing = |field| EffectError::IncompleteRecord {
            effect: record.id.to_string(),
            kind: record.kind.clone(),
            field,
        };

        let kind = match record.kind.as_str() {
            "damage" => EffectKind::Damage,
            "heal" => EffectKind::Heal,
            "stat_modify" => EffectKind::StatModify {
                stat: record.stat.ok_or_else(|| missing("stat"))?,
                mode: record.mode.unwrap_or(ModifierMode::Additive),
            },
            "custom_trigger" => EffectKind::CustomTrigger {
                skill: record.skill.clone().ok_or_else(|| missing("skill"))?,
            },
            other => return Err(EffectError::UnknownEffectKind(other.to_owned())),
        };

        Ok(Self {
            id: record.id,
            kind,
            formula: record.formula,
            trigger: record.trigger,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str) -> EffectRecord {
        EffectRecord {
            id: "e".into(),
            kind: kind.to_owned(),
            stat: None,
            mode: None,
            skill: None,
            formula: Formula::flat(1.0),
            trigger: None,
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = EffectDefinition::try_from(record("teleport"));
        assert_eq!(result, Err(EffectError::UnknownEffectKind("teleport".to_string())));
    }

    #[test]
    fn stat_modify_requires_stat() {
        let result = EffectDefinition::try_from(record("stat_modify"));
        assert!(matches!(result, Err(EffectError::IncompleteRecord { field: "stat", .. })));

        let mut complete = record("stat_modify");
        complete.stat = Some(StatKind::Defense);
        let definition = EffectDefinition::try_from(complete).unwrap();
        assert_eq!(
            definition.kind,
            EffectKind::StatModify {
                stat: StatKind::Defense,
                mode: ModifierMode::Additive
            }
        );
    }
}
