//! Catalog: the validated, immutable bundle of static content.
//!
//! Built once at startup through [`CatalogBuilder`]. `build()` checks every
//! cross reference eagerly, so malformed content aborts startup instead of
//! surfacing mid-battle.

mod error;
mod records;

pub use error::CatalogError;
pub use records::EffectRecord;

use std::collections::{HashMap, HashSet};

use crate::buff::{BuffDuration, BuffError, BuffTemplate};
use crate::combat::SkillDefinition;
use crate::config::GameConfig;
use crate::dungeon::{DungeonAtlas, EnemyTemplate, MapNode, NodeKind};
use crate::effect::{EffectDefinition, EffectKind, TriggerCondition};
use crate::state::{EffectId, EnemyId, SkillId, TemplateId};

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    effects: HashMap<EffectId, EffectDefinition>,
    /// Templates in registration order.
    templates: Vec<BuffTemplate>,
    template_index: HashMap<TemplateId, usize>,
    skills: HashMap<SkillId, SkillDefinition>,
    enemies: HashMap<EnemyId, EnemyTemplate>,
    atlas: DungeonAtlas,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn effect(&self, id: &EffectId) -> Option<&EffectDefinition> {
        self.effects.get(id)
    }

    pub fn template(&self, id: &TemplateId) -> Option<&BuffTemplate> {
        self.registered_template(id).map(|(_, template)| template)
    }

    /// Template together with its registration index.
    pub fn registered_template(&self, id: &TemplateId) -> Option<(usize, &BuffTemplate)> {
        let index = *self.template_index.get(id)?;
        self.templates.get(index).map(|template| (index, template))
    }

    /// Templates in registration order.
    pub fn templates(&self) -> &[BuffTemplate] {
        &self.templates
    }

    pub fn skill(&self, id: &SkillId) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    pub fn enemy(&self, id: &EnemyId) -> Option<&EnemyTemplate> {
        self.enemies.get(id)
    }

    pub fn atlas(&self) -> &DungeonAtlas {
        &self.atlas
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }
}

/// Collects raw content; [`build`](Self::build) validates it.
#[derive(Clone, Debug, Default)]
pub struct CatalogBuilder {
    effects: Vec<EffectDefinition>,
    templates: Vec<BuffTemplate>,
    skills: Vec<SkillDefinition>,
    enemies: Vec<EnemyTemplate>,
    nodes: Vec<MapNode>,
}

impl CatalogBuilder {
    pub fn effect(mut self, effect: EffectDefinition) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn effects(mut self, effects: impl IntoIterator<Item = EffectDefinition>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Registers a template. Registration order fixes trigger order.
    pub fn template(mut self, template: BuffTemplate) -> Self {
        self.templates.push(template);
        self
    }

    pub fn templates(mut self, templates: impl IntoIterator<Item = BuffTemplate>) -> Self {
        self.templates.extend(templates);
        self
    }

    pub fn skill(mut self, skill: SkillDefinition) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn skills(mut self, skills: impl IntoIterator<Item = SkillDefinition>) -> Self {
        self.skills.extend(skills);
        self
    }

    pub fn enemy(mut self, enemy: EnemyTemplate) -> Self {
        self.enemies.push(enemy);
        self
    }

    pub fn enemies(mut self, enemies: impl IntoIterator<Item = EnemyTemplate>) -> Self {
        self.enemies.extend(enemies);
        self
    }

    pub fn node(mut self, node: MapNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = MapNode>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::default();

        for effect in self.effects {
            let id = effect.id.clone();
            if catalog.effects.insert(id.clone(), effect).is_some() {
                return Err(duplicate("effect", &id));
            }
        }
        for template in self.templates {
            let index = catalog.templates.len();
            if catalog.template_index.insert(template.id.clone(), index).is_some() {
                return Err(duplicate("buff template", &template.id));
            }
            catalog.templates.push(template);
        }
        for skill in self.skills {
            let id = skill.id.clone();
            if catalog.skills.insert(id.clone(), skill).is_some() {
                return Err(duplicate("skill", &id));
            }
        }
        for enemy in self.enemies {
            let id = enemy.id.clone();
            if catalog.enemies.insert(id.clone(), enemy).is_some() {
                return Err(duplicate("enemy", &id));
            }
        }
        for node in self.nodes {
            let id = node.id.clone();
            if catalog.atlas.insert(node).is_some() {
                return Err(duplicate("map node", &id));
            }
        }

        validate_effects(&catalog)?;
        validate_templates(&catalog)?;
        validate_skills(&catalog)?;
        validate_enemies(&catalog)?;
        validate_atlas(&catalog)?;
        Ok(catalog)
    }
}

fn duplicate(kind: &'static str, id: &impl ToString) -> CatalogError {
    CatalogError::Duplicate {
        kind,
        id: id.to_string(),
    }
}

fn validate_effects(catalog: &Catalog) -> Result<(), CatalogError> {
    for effect in catalog.effects.values() {
        let invalid = |reason: &str| CatalogError::InvalidEffect {
            effect: effect.id.clone(),
            reason: reason.to_owned(),
        };
        match &effect.kind {
            EffectKind::StatModify { .. } if effect.trigger.is_some() => {
                return Err(invalid("stat modifiers are passive and cannot carry a trigger"));
            }
            EffectKind::CustomTrigger { skill } => {
                if effect.trigger != Some(TriggerCondition::OnHitTaken) {
                    return Err(invalid("custom triggers only fire on hit taken"));
                }
                if catalog.skill(skill).is_none() {
                    return Err(invalid(&format!("unknown skill `{skill}`")));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_templates(catalog: &Catalog) -> Result<(), CatalogError> {
    for template in &catalog.templates {
        for id in &template.effects {
            let effect = catalog.effect(id).ok_or_else(|| BuffError::InvalidTemplate {
                template: template.id.clone(),
                effect: id.clone(),
            })?;
            let direct = matches!(effect.kind, EffectKind::Damage | EffectKind::Heal);
            if direct && effect.trigger.is_none() {
                return Err(CatalogError::MalformedTemplate {
                    template: template.id.clone(),
                    reason: format!("damage/heal effect `{id}` needs a trigger inside a buff"),
                });
            }
        }
        if template.effects.is_empty() {
            return Err(CatalogError::MalformedTemplate {
                template: template.id.clone(),
                reason: "no effects".to_owned(),
            });
        }
        if template.stack_policy.is_stackable()
            && !(1..=GameConfig::MAX_STACK_CEILING).contains(&template.max_stack)
        {
            return Err(CatalogError::InvalidStackLimit {
                template: template.id.clone(),
                max_stack: template.max_stack,
                ceiling: GameConfig::MAX_STACK_CEILING,
            });
        }
        if template.duration == BuffDuration::Turns(0) {
            return Err(CatalogError::MalformedTemplate {
                template: template.id.clone(),
                reason: "duration must be at least one turn".to_owned(),
            });
        }
    }
    Ok(())
}

fn validate_skills(catalog: &Catalog) -> Result<(), CatalogError> {
    for skill in catalog.skills.values() {
        let invalid = |reason: String| CatalogError::InvalidSkill {
            skill: skill.id.clone(),
            reason,
        };
        if skill.effects.is_empty() {
            return Err(invalid("no effects".to_owned()));
        }
        for id in &skill.effects {
            match catalog.effect(id) {
                None => return Err(invalid(format!("unknown effect `{id}`"))),
                Some(effect)
                    if !matches!(effect.kind, EffectKind::Damage | EffectKind::Heal)
                        || effect.trigger.is_some() =>
                {
                    return Err(invalid(format!("effect `{id}` is not a direct damage or heal")));
                }
                Some(_) => {}
            }
        }
        for buff in &skill.buffs {
            if catalog.template(&buff.template).is_none() {
                return Err(invalid(format!("unknown buff template `{}`", buff.template)));
            }
        }
    }
    Ok(())
}

fn validate_enemies(catalog: &Catalog) -> Result<(), CatalogError> {
    for enemy in catalog.enemies.values() {
        let invalid = |reason: String| CatalogError::InvalidEnemy {
            enemy: enemy.id.clone(),
            reason,
        };
        if enemy.skills.is_empty() {
            return Err(invalid("no skills".to_owned()));
        }
        if let Some(skill) = enemy.skills.iter().find(|skill| catalog.skill(skill).is_none()) {
            return Err(invalid(format!("unknown skill `{skill}`")));
        }
        if let Some(template) = enemy.innate_buffs.iter().find(|t| catalog.template(t).is_none()) {
            return Err(invalid(format!("unknown buff template `{template}`")));
        }
    }
    Ok(())
}

fn validate_atlas(catalog: &Catalog) -> Result<(), CatalogError> {
    let atlas = &catalog.atlas;
    for node in atlas.nodes() {
        let invalid = |reason: String| CatalogError::InvalidNode {
            node: node.id.clone(),
            reason,
        };

        let mut seen = HashSet::new();
        for choice in &node.choices {
            if !seen.insert(&choice.id) {
                return Err(invalid(format!("duplicate choice `{}`", choice.id)));
            }
            if atlas.node(&choice.next).is_none() {
                return Err(invalid(format!(
                    "choice `{}` leads to unknown node `{}`",
                    choice.id, choice.next
                )));
            }
        }

        match &node.kind {
            NodeKind::Passage if node.choices.is_empty() => {
                return Err(invalid("passage without choices".to_owned()));
            }
            NodeKind::Battle { enemy, victory } => {
                if catalog.enemy(enemy).is_none() {
                    return Err(invalid(format!("unknown enemy `{enemy}`")));
                }
                match atlas.node(victory).map(|next| &next.kind) {
                    None => return Err(invalid(format!("unknown victory node `{victory}`"))),
                    Some(NodeKind::Battle { .. }) => {
                        let reason = format!("victory node `{victory}` starts another battle");
                        return Err(invalid(reason));
                    }
                    Some(_) => {}
                }
            }
            _ => {}
        }

        if node.entry && !matches!(node.kind, NodeKind::Passage) {
            return Err(invalid("entry nodes must be passages".to_owned()));
        }
    }
    Ok(())
}
