//! Buff Engine: the only writer of buff instance state.
//!
//! Every operation stages its work on a copy of the combatant and commits
//! only on success, so a failed call never leaves a half-applied buff list.

use crate::catalog::Catalog;
use crate::effect::{self, EffectContext, EffectDefinition, EffectKind, TriggerCondition};
use crate::state::{CombatantState, EffectId, StatKind, TemplateId, points};

use super::error::BuffError;
use super::instance::{BuffInstance, BuffSource};
use super::modifiers::{ModifierTable, StatModifier};
use super::template::{BuffTags, BuffTemplate, StackPolicy};

/// How an application was resolved against existing instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackResolution {
    /// A new instance was created.
    Created,
    /// An existing `RefreshDuration` instance had its duration reset.
    Refreshed,
    /// An existing `StackUpToN` instance now holds `stacks` stacks.
    Stacked { stacks: u32 },
}

/// What a fired trigger did to the buff owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerOutcome {
    Damage { amount: u32 },
    Heal { amount: u32 },
}

/// One trigger firing, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerRecord {
    pub serial: u32,
    pub template: TemplateId,
    pub effect: EffectId,
    pub condition: TriggerCondition,
    pub outcome: TriggerOutcome,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuffApplication {
    /// The resulting instance, possibly pre-existing.
    pub instance: BuffInstance,
    pub resolution: StackResolution,
    pub triggers: Vec<TriggerRecord>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub triggers: Vec<TriggerRecord>,
    /// Instances removed because their duration reached zero.
    pub expired: Vec<BuffInstance>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispelReport {
    pub removed: Vec<BuffInstance>,
    pub triggers: Vec<TriggerRecord>,
}

/// A live on-hit-taken effect, collected for the combat resolver.
#[derive(Clone, Debug)]
pub struct HitTrigger<'a> {
    pub instance: BuffInstance,
    pub effect: &'a EffectDefinition,
}

/// Stateless engine over an immutable catalog.
#[derive(Clone, Copy, Debug)]
pub struct BuffEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> BuffEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Applies `template` to `combatant`, resolving the template's stack policy.
    ///
    /// On-apply triggers fire for every application, including refreshes.
    pub fn apply_buff(
        &self,
        combatant: &mut CombatantState,
        template_id: &TemplateId,
        source: BuffSource,
    ) -> Result<BuffApplication, BuffError> {
        let (registration, template) = self.template(template_id)?;
        let effects = self.resolve_effects(template)?;
        let mut staged = combatant.clone();

        let existing = match template.stack_policy {
            StackPolicy::Independent => None,
            StackPolicy::RefreshDuration | StackPolicy::StackUpToN => {
                single_instance(&staged, template_id)?
            }
        };

        let (index, resolution) = match existing {
            Some(index) => {
                let instance = &mut staged.buffs[index];
                instance.remaining = template.duration;
                if template.stack_policy == StackPolicy::StackUpToN {
                    instance.stacks = (instance.stacks + 1).min(template.max_stack.max(1));
                    (index, StackResolution::Stacked { stacks: instance.stacks })
                } else {
                    instance.stacks = 1;
                    (index, StackResolution::Refreshed)
                }
            }
            None => {
                let serial = staged.next_instance;
                staged.next_instance += 1;
                staged.buffs.push(BuffInstance {
                    serial,
                    owner: staged.id,
                    template: template_id.clone(),
                    registration,
                    stacks: 1,
                    remaining: template.duration,
                    source,
                });
                (staged.buffs.len() - 1, StackResolution::Created)
            }
        };

        let instance = staged.buffs[index].clone();
        let mut triggers = Vec::new();
        fire(&mut staged, &instance, &effects, TriggerCondition::OnApply, &mut triggers)?;

        *combatant = staged;
        Ok(BuffApplication {
            instance,
            resolution,
            triggers,
        })
    }

    /// Advances every instance by `elapsed` turns.
    ///
    /// Each turn fires on-tick effects of every live instance in
    /// template-registration order, then decrements durations. Instances
    /// that reach zero are removed, and their on-expire effects fire once all
    /// turns have been applied.
    pub fn tick(
        &self,
        combatant: &mut CombatantState,
        elapsed: u32,
    ) -> Result<TickReport, BuffError> {
        let mut staged = combatant.clone();
        let mut report = TickReport::default();
        let mut turns_left = elapsed;

        while turns_left > 0 && !staged.buffs.is_empty() {
            let order = self.ordered(&staged)?;
            if order.iter().all(|(_, effects)| !has_trigger(effects, TriggerCondition::OnTick)) {
                // Nothing observable happens per turn; skip straight to the end.
                for instance in &mut staged.buffs {
                    instance.remaining = instance.remaining.advanced(turns_left);
                }
                turns_left = 0;
            } else {
                for (index, effects) in &order {
                    let instance = staged.buffs[*index].clone();
                    fire(
                        &mut staged,
                        &instance,
                        effects,
                        TriggerCondition::OnTick,
                        &mut report.triggers,
                    )?;
                    let slot = &mut staged.buffs[*index];
                    slot.remaining = slot.remaining.advanced(1);
                }
                turns_left -= 1;
            }

            let (mut expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut staged.buffs)
                .into_iter()
                .partition(|instance| instance.remaining.is_expired());
            staged.buffs = live;
            expired.sort_by_key(BuffInstance::order_key);
            report.expired.extend(expired);
        }

        for instance in &report.expired {
            let effects = self.instance_effects(instance)?;
            fire(
                &mut staged,
                instance,
                &effects,
                TriggerCondition::OnExpire,
                &mut report.triggers,
            )?;
        }

        *combatant = staged;
        Ok(report)
    }

    /// Aggregates every passive stat-modify effect on `stat`.
    pub fn collect_modifiers(
        &self,
        combatant: &CombatantState,
        stat: StatKind,
    ) -> Result<StatModifier, BuffError> {
        Ok(self.modifier_table(combatant)?.get(stat))
    }

    /// Aggregates passive stat-modify effects for every stat at once.
    pub fn modifier_table(&self, combatant: &CombatantState) -> Result<ModifierTable, BuffError> {
        let mut table = ModifierTable::new();
        for (index, effects) in self.ordered(combatant)? {
            let instance = &combatant.buffs[index];
            for effect in effects.iter().filter(|e| e.trigger.is_none()) {
                if let EffectKind::StatModify { stat, mode } = effect.kind {
                    let ctx = instance_context(instance, combatant);
                    table.add(stat, mode, effect::evaluate(effect, &ctx)?);
                }
            }
        }
        Ok(table)
    }

    /// Removes every instance whose tags intersect `filter` and fires their
    /// on-expire effects.
    ///
    /// Instances tagged [`BuffTags::INNATE`] are only removed when the filter
    /// names `INNATE` explicitly.
    pub fn dispel(
        &self,
        combatant: &mut CombatantState,
        filter: BuffTags,
    ) -> Result<DispelReport, BuffError> {
        let mut staged = combatant.clone();
        let mut report = DispelReport::default();

        let mut matched = Vec::new();
        for (index, instance) in staged.buffs.iter().enumerate() {
            let (_, template) = self.template(&instance.template)?;
            let protected =
                template.tags.contains(BuffTags::INNATE) && !filter.contains(BuffTags::INNATE);
            if template.tags.intersects(filter) && !protected {
                matched.push(index);
            }
        }
        if matched.is_empty() {
            return Ok(report);
        }

        let mut index = 0;
        staged.buffs.retain(|instance| {
            let keep = !matched.contains(&index);
            if !keep {
                report.removed.push(instance.clone());
            }
            index += 1;
            keep
        });
        report.removed.sort_by_key(BuffInstance::order_key);

        for instance in &report.removed {
            let effects = self.instance_effects(instance)?;
            fire(
                &mut staged,
                instance,
                &effects,
                TriggerCondition::OnExpire,
                &mut report.triggers,
            )?;
        }

        *combatant = staged;
        Ok(report)
    }

    /// Live on-hit-taken effects of `combatant`, in template-registration order.
    pub fn hit_triggers(
        &self,
        combatant: &CombatantState,
    ) -> Result<Vec<HitTrigger<'a>>, BuffError> {
        let mut triggers = Vec::new();
        for (index, effects) in self.ordered(combatant)? {
            for effect in effects {
                if effect.fires_on(TriggerCondition::OnHitTaken) {
                    triggers.push(HitTrigger {
                        instance: combatant.buffs[index].clone(),
                        effect,
                    });
                }
            }
        }
        Ok(triggers)
    }

    fn template(&self, id: &TemplateId) -> Result<(usize, &'a BuffTemplate), BuffError> {
        self.catalog
            .registered_template(id)
            .ok_or_else(|| BuffError::UnknownTemplate(id.clone()))
    }

    fn resolve_effects(
        &self,
        template: &BuffTemplate,
    ) -> Result<Vec<&'a EffectDefinition>, BuffError> {
        template
            .effects
            .iter()
            .map(|effect| {
                self.catalog.effect(effect).ok_or_else(|| BuffError::InvalidTemplate {
                    template: template.id.clone(),
                    effect: effect.clone(),
                })
            })
            .collect()
    }

    fn instance_effects(
        &self,
        instance: &BuffInstance,
    ) -> Result<Vec<&'a EffectDefinition>, BuffError> {
        let (_, template) = self.template(&instance.template)?;
        self.resolve_effects(template)
    }

    /// Buff list indices sorted by registration, each with resolved effects.
    fn ordered(
        &self,
        combatant: &CombatantState,
    ) -> Result<Vec<(usize, Vec<&'a EffectDefinition>)>, BuffError> {
        let mut indices: Vec<usize> = (0..combatant.buffs.len()).collect();
        indices.sort_by_key(|&index| combatant.buffs[index].order_key());
        indices
            .into_iter()
            .map(|index| Ok((index, self.instance_effects(&combatant.buffs[index])?)))
            .collect()
    }
}

/// Position of the single live instance of a non-independent template.
fn single_instance(
    combatant: &CombatantState,
    template: &TemplateId,
) -> Result<Option<usize>, BuffError> {
    let positions: Vec<usize> = combatant
        .buffs
        .iter()
        .enumerate()
        .filter(|(_, instance)| &instance.template == template)
        .map(|(index, _)| index)
        .collect();

    match positions.as_slice() {
        [] => Ok(None),
        [index] => Ok(Some(*index)),
        _ => Err(BuffError::DuplicateInstance {
            owner: combatant.id,
            template: template.clone(),
            count: positions.len(),
        }),
    }
}

fn has_trigger(effects: &[&EffectDefinition], condition: TriggerCondition) -> bool {
    effects.iter().any(|effect| effect.fires_on(condition))
}

fn instance_context<'c>(
    instance: &'c BuffInstance,
    owner: &'c CombatantState,
) -> EffectContext<'c> {
    EffectContext::new(&instance.source.attributes, &owner.attributes, instance.source.quality_tier)
        .with_stacks(instance.stacks)
}

/// Fires `condition` effects of one instance against its owner.
///
/// Custom triggers and stat modifiers never fire here; custom triggers are
/// resolved by the combat resolver on hit-taken.
fn fire(
    owner: &mut CombatantState,
    instance: &BuffInstance,
    effects: &[&EffectDefinition],
    condition: TriggerCondition,
    out: &mut Vec<TriggerRecord>,
) -> Result<(), BuffError> {
    for effect in effects.iter().filter(|effect| effect.fires_on(condition)) {
        let magnitude = effect::evaluate(effect, &instance_context(instance, owner))?;
        let outcome = match effect.kind {
            EffectKind::Damage => TriggerOutcome::Damage {
                amount: owner.hp.drain(points(magnitude)),
            },
            EffectKind::Heal => TriggerOutcome::Heal {
                amount: owner.hp.restore(points(magnitude)),
            },
            EffectKind::StatModify { .. } | EffectKind::CustomTrigger { .. } => continue,
        };
        out.push(TriggerRecord {
            serial: instance.serial,
            template: instance.template.clone(),
            effect: effect.id.clone(),
            condition,
            outcome,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::BuffDuration;
    use crate::effect::{Formula, ModifierMode};
    use crate::state::{Attributes, CombatantId};

    fn triggered(id: &str, kind: EffectKind, value: f64, on: TriggerCondition) -> EffectDefinition {
        EffectDefinition::new(id.into(), kind, Formula::flat(value)).on(on)
    }

    fn catalog() -> Catalog {
        Catalog::builder()
            .effect(EffectDefinition::new(
                "might".into(),
                EffectKind::StatModify {
                    stat: StatKind::Attack,
                    mode: ModifierMode::Additive,
                },
                Formula::per_stack(Formula::flat(4.0)),
            ))
            .effect(triggered("poison_tick", EffectKind::Damage, 5.0, TriggerCondition::OnTick))
            .effect(triggered("burst", EffectKind::Damage, 20.0, TriggerCondition::OnExpire))
            .effect(triggered("mend", EffectKind::Heal, 3.0, TriggerCondition::OnTick))
            .template(
                BuffTemplate::new(
                    "might",
                    "Might",
                    StackPolicy::StackUpToN,
                    3,
                    BuffDuration::Turns(5),
                )
                .with_effect("might")
                .tagged(BuffTags::BUFF),
            )
            .template(
                BuffTemplate::new(
                    "poison",
                    "Poison",
                    StackPolicy::RefreshDuration,
                    1,
                    BuffDuration::Turns(2),
                )
                .with_effect("poison_tick")
                .with_effect("burst")
                .tagged(BuffTags::DEBUFF | BuffTags::DOT),
            )
            .template(
                BuffTemplate::new(
                    "regen",
                    "Regeneration",
                    StackPolicy::Independent,
                    1,
                    BuffDuration::Turns(3),
                )
                .with_effect("mend")
                .tagged(BuffTags::BUFF | BuffTags::HOT),
            )
            .template(
                BuffTemplate::new(
                    "aura",
                    "Aura",
                    StackPolicy::RefreshDuration,
                    1,
                    BuffDuration::Infinite,
                )
                .with_effect("might")
                .tagged(BuffTags::BUFF | BuffTags::INNATE),
            )
            .build()
            .expect("test catalog is valid")
    }

    fn combatant() -> CombatantState {
        CombatantState::new(CombatantId(1), "target", Attributes::new(), 100, 10)
    }

    fn source() -> BuffSource {
        BuffSource::new(CombatantId(2), Attributes::new(), 0)
    }

    #[test]
    fn stack_up_to_n_caps_and_refreshes() {
        let catalog = catalog();
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();
        let might = TemplateId::new("might");

        engine.apply_buff(&mut target, &might, source()).unwrap();
        engine.tick(&mut target, 2).unwrap();
        for _ in 0..3 {
            engine.apply_buff(&mut target, &might, source()).unwrap();
        }

        assert_eq!(target.buffs().len(), 1);
        assert_eq!(target.buffs()[0].stacks(), 3);
        assert_eq!(target.buffs()[0].remaining(), BuffDuration::Turns(5));
        assert_eq!(engine.collect_modifiers(&target, StatKind::Attack).unwrap().additive, 12.0);
    }

    #[test]
    fn refresh_keeps_single_stack() {
        let catalog = catalog();
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();
        let poison = TemplateId::new("poison");

        let first = engine.apply_buff(&mut target, &poison, source()).unwrap();
        let second = engine.apply_buff(&mut target, &poison, source()).unwrap();

        assert_eq!(first.resolution, StackResolution::Created);
        assert_eq!(second.resolution, StackResolution::Refreshed);
        assert_eq!(second.instance.serial(), first.instance.serial());
        assert_eq!(second.instance.stacks(), 1);
    }

    #[test]
    fn independent_instances_coexist() {
        let catalog = catalog();
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();
        let regen = TemplateId::new("regen");

        engine.apply_buff(&mut target, &regen, source()).unwrap();
        engine.apply_buff(&mut target, &regen, source()).unwrap();

        assert_eq!(target.buffs().len(), 2);
        assert_ne!(target.buffs()[0].serial(), target.buffs()[1].serial());
    }

    #[test]
    fn expiring_tick_fires_final_tick_then_expire() {
        let catalog = catalog();
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();

        engine.apply_buff(&mut target, &"poison".into(), source()).unwrap();
        let report = engine.tick(&mut target, 2).unwrap();

        let conditions: Vec<_> = report.triggers.iter().map(|t| t.condition).collect();
        assert_eq!(
            conditions,
            vec![TriggerCondition::OnTick, TriggerCondition::OnTick, TriggerCondition::OnExpire]
        );
        assert_eq!(report.expired.len(), 1);
        assert!(target.buffs().is_empty());
        // 5 + 5 + 20
        assert_eq!(target.hp.current, 70);
    }

    #[test]
    fn on_tick_follows_registration_order() {
        let catalog = catalog();
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();

        // Applied out of registration order.
        engine.apply_buff(&mut target, &"regen".into(), source()).unwrap();
        engine.apply_buff(&mut target, &"poison".into(), source()).unwrap();
        let report = engine.tick(&mut target, 1).unwrap();

        let templates: Vec<_> = report.triggers.iter().map(|t| t.template.as_str()).collect();
        assert_eq!(templates, vec!["poison", "regen"]);
    }

    #[test]
    fn infinite_buffs_survive_any_tick() {
        let catalog = catalog();
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();

        engine.apply_buff(&mut target, &"aura".into(), source()).unwrap();
        engine.tick(&mut target, u32::MAX).unwrap();

        assert_eq!(target.buffs().len(), 1);
        assert_eq!(target.buffs()[0].remaining(), BuffDuration::Infinite);
    }

    #[test]
    fn dispel_matches_tags_and_spares_innate() {
        let catalog = catalog();
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();

        engine.apply_buff(&mut target, &"poison".into(), source()).unwrap();
        engine.apply_buff(&mut target, &"regen".into(), source()).unwrap();
        engine.apply_buff(&mut target, &"aura".into(), source()).unwrap();

        let report = engine.dispel(&mut target, BuffTags::DOT | BuffTags::BUFF).unwrap();

        let removed: Vec<_> = report.removed.iter().map(|i| i.template().as_str()).collect();
        assert_eq!(removed, vec!["poison", "regen"]);
        assert_eq!(report.triggers.len(), 1);
        assert_eq!(target.buffs().len(), 1);
        assert_eq!(target.buffs()[0].template().as_str(), "aura");
    }

    #[test]
    fn unknown_template_leaves_combatant_untouched() {
        let catalog = catalog();
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();
        engine.apply_buff(&mut target, &"regen".into(), source()).unwrap();
        let before = target.clone();

        let result = engine.apply_buff(&mut target, &"missing".into(), source());

        assert!(matches!(result, Err(BuffError::UnknownTemplate(_))));
        assert_eq!(target, before);
    }

    #[test]
    fn duplicate_live_instances_are_an_invariant_violation() {
        let catalog = catalog();
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();
        engine.apply_buff(&mut target, &"poison".into(), source()).unwrap();
        let copy = target.buffs[0].clone();
        target.buffs.push(copy);
        let before = target.clone();

        let result = engine.apply_buff(&mut target, &"poison".into(), source());

        assert!(matches!(result, Err(BuffError::DuplicateInstance { count: 2, .. })));
        assert_eq!(target, before);
    }
}
