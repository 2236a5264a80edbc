use crate::config::GameConfig;
use crate::state::{
    Attributes, CombatantId, CombatantState, EnemyId, Realm, SkillId, StatKind, TemplateId,
};

/// Data-driven opponent met on battle nodes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: EnemyId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub realm: Realm,
    pub attributes: Attributes,
    /// Skills used in rotation, one per exchange.
    pub skills: Vec<SkillId>,
    /// Quality tier of every skill this enemy casts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rank: i32,
    /// Buffs applied to the enemy when the battle starts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub innate_buffs: Vec<TemplateId>,
}

impl EnemyTemplate {
    pub fn new(id: impl Into<EnemyId>, name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            realm: Realm::default(),
            attributes,
            skills: Vec::new(),
            rank: 0,
            innate_buffs: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: impl Into<SkillId>) -> Self {
        self.skills.push(skill.into());
        self
    }

    pub fn with_innate_buff(mut self, template: impl Into<TemplateId>) -> Self {
        self.innate_buffs.push(template.into());
        self
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }

    /// Skill cast on the given exchange of the rotation.
    pub fn rotation(&self, turn: usize) -> Option<&SkillId> {
        if self.skills.is_empty() {
            None
        } else {
            self.skills.get(turn % self.skills.len())
        }
    }

    /// Spawns the enemy's side of a battle, without innate buffs.
    ///
    /// Pools use the same scaling as cultivators plus a realm bonus.
    pub fn to_combatant(&self, id: CombatantId, config: &GameConfig) -> CombatantState {
        let realm_bonus = 1.0 + 0.5 * f64::from(self.realm.tier());
        let vitality = self.attributes.get(StatKind::Vitality);
        let spirit = self.attributes.get(StatKind::Spirit);
        let hp = (config.base_hp + config.hp_per_vitality * vitality) * realm_bonus;
        let mp = (config.base_mp + config.mp_per_spirit * spirit) * realm_bonus;
        CombatantState::new(id, self.name.clone(), self.attributes, pool(hp), pool(mp))
    }
}

fn pool(value: f64) -> u32 {
    if value.is_finite() && value >= 1.0 {
        value.min(f64::from(u32::MAX)).floor() as u32
    } else {
        1
    }
}
