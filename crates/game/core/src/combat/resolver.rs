//! Combat Resolver: one attacker action against one or more targets.
//!
//! ## Resolution Flow
//! 1. `Pending`: validate the skill, caster, targets and spiritual energy
//! 2. `ModifiersResolved`: freeze caster and target modifier tables
//! 3. `EffectsApplied`: evaluate the skill's damage/heal effects per target
//! 4. `TriggersFired`: fire the defender's on-hit-taken effects, nested
//!    actions bounded by the configured nesting limit
//! 5. `Resolved`: apply side-effect buffs and return the outcome
//!
//! Each target is resolved on its own copy of the battle. A failing target is
//! recorded in the outcome and rolled back; the others still resolve.

use crate::buff::{BuffEngine, BuffSource, HitTrigger, ModifierTable};
use crate::catalog::Catalog;
use crate::config::GameConfig;
use crate::effect::{self, EffectContext, EffectDefinition, EffectKind};
use crate::state::{Attributes, CombatantId, CombatantState, SkillId, StatKind, TemplateId, points};

use super::error::CombatError;
use super::outcome::{
    AppliedBuff, CombatOutcome, TargetDelta, TargetFailure, TargetOutcome, TargetResult,
    TriggerEffect, TriggerEvent,
};
use super::phase::ResolutionPhase;
use super::skill::{BuffRecipient, SkillDefinition, SkillTarget};

/// A request to cast one skill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    pub caster: CombatantId,
    pub skill: SkillId,
    /// Skill rank or item quality of the cast.
    pub quality_tier: i32,
    /// Ignored for self-targeted skills.
    pub targets: Vec<CombatantId>,
}

impl ActionRequest {
    pub fn new(caster: CombatantId, skill: impl Into<SkillId>, quality_tier: i32) -> Self {
        Self {
            caster,
            skill: skill.into(),
            quality_tier,
            targets: Vec::new(),
        }
    }

    pub fn at(mut self, target: CombatantId) -> Self {
        self.targets.push(target);
        self
    }
}

/// Frozen stats of the caster for the whole action.
struct CasterView {
    index: usize,
    id: CombatantId,
    table: ModifierTable,
    attributes: Attributes,
}

pub struct CombatResolver<'a> {
    catalog: &'a Catalog,
    buffs: BuffEngine<'a>,
    nesting_limit: u8,
}

impl<'a> CombatResolver<'a> {
    pub fn new(catalog: &'a Catalog, config: &GameConfig) -> Self {
        Self {
            catalog,
            buffs: BuffEngine::new(catalog),
            nesting_limit: config.trigger_nesting_limit,
        }
    }

    /// Resolves `request` against the combatants of one battle.
    ///
    /// An error means nothing was changed. A partially failed action returns
    /// `Ok` with the failing targets tagged in the outcome.
    pub fn resolve(
        &self,
        combatants: &mut [CombatantState],
        request: &ActionRequest,
    ) -> Result<CombatOutcome, CombatError> {
        let mut staged = combatants.to_vec();
        let outcome = self.resolve_at(&mut staged, request, 0, true)?;
        combatants.clone_from_slice(&staged);
        Ok(outcome)
    }

    fn resolve_at(
        &self,
        combatants: &mut [CombatantState],
        request: &ActionRequest,
        depth: u8,
        pay_cost: bool,
    ) -> Result<CombatOutcome, CombatError> {
        let mut outcome = CombatOutcome::new(request.skill.clone(), request.caster);

        let skill = self
            .catalog
            .skill(&request.skill)
            .ok_or_else(|| CombatError::UnknownSkill(request.skill.clone()))?;
        let effects = self.skill_effects(skill)?;

        let caster = index_of(combatants, request.caster)?;
        if !combatants[caster].is_alive() {
            return Err(CombatError::Defeated(request.caster));
        }

        let targets = match skill.target {
            SkillTarget::Own => vec![caster],
            SkillTarget::Enemy => request
                .targets
                .iter()
                .map(|&id| index_of(combatants, id))
                .collect::<Result<Vec<_>, _>>()?,
        };
        if targets.is_empty() {
            return Err(CombatError::NoTargets(skill.id.clone()));
        }

        if pay_cost {
            let pool = &mut combatants[caster].mp;
            if pool.current < skill.mp_cost {
                return Err(CombatError::InsufficientMp {
                    skill: skill.id.clone(),
                    required: skill.mp_cost,
                    available: pool.current,
                });
            }
            outcome.mp_spent = pool.drain(skill.mp_cost);
        }

        outcome.phase = ResolutionPhase::ModifiersResolved;
        let table = self
            .buffs
            .modifier_table(&combatants[caster])
            .map_err(|source| CombatError::Buff {
                phase: outcome.phase,
                source,
            })?;
        let view = CasterView {
            index: caster,
            id: request.caster,
            attributes: table.resolve(&combatants[caster].attributes),
            table,
        };
        let frozen: Vec<_> = targets
            .iter()
            .map(|&target| self.buffs.modifier_table(&combatants[target]))
            .collect();

        outcome.phase = ResolutionPhase::EffectsApplied;
        for (&target, table) in targets.iter().zip(frozen) {
            let target_id = combatants[target].id;
            let mut attempt = combatants.to_vec();
            let result = table
                .map_err(|source| CombatError::Buff {
                    phase: ResolutionPhase::ModifiersResolved,
                    source,
                })
                .and_then(|table| {
                    self.resolve_target(
                        &mut attempt,
                        skill,
                        &effects,
                        request,
                        &view,
                        target,
                        &table,
                        depth,
                    )
                });

            let result = match result {
                Ok(delta) => {
                    combatants.clone_from_slice(&attempt);
                    TargetResult::Resolved(delta)
                }
                Err(error) => TargetResult::Failed(TargetFailure::from(&error)),
            };
            outcome.targets.push(TargetOutcome {
                target: target_id,
                result,
            });
        }
        outcome.phase = ResolutionPhase::TriggersFired;

        let any_resolved = outcome.targets.iter().any(|t| t.delta().is_some());
        if any_resolved {
            for buff in skill.buffs.iter().filter(|b| b.on == BuffRecipient::Caster) {
                let applied = self.apply_side_buff(
                    &mut combatants[caster],
                    &buff.template,
                    &view,
                    request.quality_tier,
                )?;
                outcome.caster_buffs.push(applied);
            }
        }

        outcome.phase = ResolutionPhase::Resolved;
        Ok(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_target(
        &self,
        attempt: &mut [CombatantState],
        skill: &SkillDefinition,
        effects: &[&EffectDefinition],
        request: &ActionRequest,
        caster: &CasterView,
        target: usize,
        table: &ModifierTable,
        depth: u8,
    ) -> Result<TargetDelta, CombatError> {
        if !attempt[target].is_alive() {
            return Err(CombatError::Defeated(attempt[target].id));
        }
        let target_attributes = table.resolve(&attempt[target].attributes);
        let mut delta = TargetDelta::default();

        for effect in effects {
            let ctx =
                EffectContext::new(&caster.attributes, &target_attributes, request.quality_tier);
            let raw = effect::evaluate(effect, &ctx).map_err(|source| CombatError::Effect {
                phase: ResolutionPhase::EffectsApplied,
                source,
            })?;
            match effect.kind {
                EffectKind::Damage => {
                    let dealt = caster.table.get(StatKind::DamageDealt).apply(raw);
                    let taken = table.get(StatKind::DamageTaken).apply(dealt);
                    delta.damage += attempt[target].hp.drain(points(taken));
                }
                EffectKind::Heal => {
                    let amount = caster.table.get(StatKind::HealingDone).apply(raw);
                    delta.healed += attempt[target].hp.restore(points(amount));
                }
                EffectKind::StatModify { .. } | EffectKind::CustomTrigger { .. } => {
                    return Err(CombatError::InvalidSkill {
                        skill: skill.id.clone(),
                        effect: effect.id.clone(),
                    });
                }
            }
        }

        if delta.damage > 0 && depth < self.nesting_limit && target != caster.index {
            let triggers = self
                .buffs
                .hit_triggers(&attempt[target])
                .map_err(|source| CombatError::Buff {
                    phase: ResolutionPhase::TriggersFired,
                    source,
                })?;
            for trigger in triggers {
                let fired =
                    self.fire_hit_trigger(attempt, &trigger, target, caster, delta.damage, depth)?;
                if let Some(event) = fired {
                    delta.triggers.push(event);
                }
            }
        }

        for buff in skill.buffs.iter().filter(|b| b.on == BuffRecipient::Target) {
            let applied = self.apply_side_buff(
                &mut attempt[target],
                &buff.template,
                caster,
                request.quality_tier,
            )?;
            delta.buffs.push(applied);
        }

        delta.defeated = !attempt[target].is_alive();
        Ok(delta)
    }

    fn fire_hit_trigger(
        &self,
        attempt: &mut [CombatantState],
        trigger: &HitTrigger<'_>,
        owner: usize,
        attacker: &CasterView,
        damage_taken: u32,
        depth: u8,
    ) -> Result<Option<TriggerEvent>, CombatError> {
        let source = trigger.instance.source();
        let attacker_attributes = attempt[attacker.index].attributes;
        let ctx = EffectContext::new(&source.attributes, &attacker_attributes, source.quality_tier)
            .with_stacks(trigger.instance.stacks())
            .with_trigger_magnitude(f64::from(damage_taken));
        let magnitude = || {
            effect::evaluate(trigger.effect, &ctx).map_err(|source| CombatError::Effect {
                phase: ResolutionPhase::TriggersFired,
                source,
            })
        };

        let result = match &trigger.effect.kind {
            EffectKind::Damage => TriggerEffect::Reflected {
                amount: attempt[attacker.index].hp.drain(points(magnitude()?)),
            },
            // A fallen owner neither heals nor strikes back.
            EffectKind::Heal | EffectKind::CustomTrigger { .. } if !attempt[owner].is_alive() => {
                return Ok(None);
            }
            EffectKind::Heal => TriggerEffect::Healed {
                amount: attempt[owner].hp.restore(points(magnitude()?)),
            },
            EffectKind::CustomTrigger { skill } => {
                let nested = ActionRequest::new(
                    attempt[owner].id,
                    skill.clone(),
                    source.quality_tier,
                )
                .at(attacker.id);
                let outcome = self.resolve_at(attempt, &nested, depth + 1, false)?;
                TriggerEffect::Retaliated(Box::new(outcome))
            }
            EffectKind::StatModify { .. } => return Ok(None),
        };

        Ok(Some(TriggerEvent {
            owner: attempt[owner].id,
            template: trigger.instance.template().clone(),
            effect: trigger.effect.id.clone(),
            result,
        }))
    }

    fn apply_side_buff(
        &self,
        recipient: &mut CombatantState,
        template: &TemplateId,
        caster: &CasterView,
        quality_tier: i32,
    ) -> Result<AppliedBuff, CombatError> {
        let source = BuffSource::new(caster.id, caster.attributes, quality_tier);
        let application = self
            .buffs
            .apply_buff(recipient, template, source)
            .map_err(|source| CombatError::Buff {
                phase: ResolutionPhase::TriggersFired,
                source,
            })?;
        Ok(AppliedBuff {
            recipient: recipient.id,
            template: template.clone(),
            serial: application.instance.serial(),
            stacks: application.instance.stacks(),
            resolution: application.resolution,
        })
    }

    fn skill_effects(
        &self,
        skill: &SkillDefinition,
    ) -> Result<Vec<&'a EffectDefinition>, CombatError> {
        skill
            .effects
            .iter()
            .map(|id| {
                self.catalog
                    .effect(id)
                    .filter(|effect| matches!(effect.kind, EffectKind::Damage | EffectKind::Heal))
                    .ok_or_else(|| CombatError::InvalidSkill {
                        skill: skill.id.clone(),
                        effect: id.clone(),
                    })
            })
            .collect()
    }
}

fn index_of(combatants: &[CombatantState], id: CombatantId) -> Result<usize, CombatError> {
    combatants
        .iter()
        .position(|combatant| combatant.id == id)
        .ok_or(CombatError::UnknownCombatant(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::{BuffDuration, BuffTemplate, StackPolicy};
    use crate::effect::{Formula, ModifierMode, Side, TriggerCondition};
    use crate::error::{ErrorCategory, GameError};

    const PLAYER: CombatantId = CombatantId::PLAYER;
    const WOLF: CombatantId = CombatantId(1);
    const BEAR: CombatantId = CombatantId(2);

    fn modifier(id: &str, stat: StatKind, mode: ModifierMode, value: f64) -> EffectDefinition {
        let kind = EffectKind::StatModify { stat, mode };
        EffectDefinition::new(id.into(), kind, Formula::flat(value))
    }

    fn refreshing(id: &str, name: &str, duration: BuffDuration) -> BuffTemplate {
        BuffTemplate::new(id, name, StackPolicy::RefreshDuration, 1, duration)
    }

    fn catalog() -> Catalog {
        Catalog::builder()
            .effect(EffectDefinition::new("strike".into(), EffectKind::Damage, Formula::flat(50.0)))
            .effect(EffectDefinition::new("graze".into(), EffectKind::Damage, Formula::flat(50.6)))
            .effect(EffectDefinition::new(
                "palm".into(),
                EffectKind::Damage,
                Formula::Linear {
                    base: 0.0,
                    stat: StatKind::Attack,
                    side: Side::Caster,
                    coefficient: 1.0,
                },
            ))
            .effect(EffectDefinition::new("mend".into(), EffectKind::Heal, Formula::flat(40.0)))
            .effect(modifier("sharpen_flat", StatKind::DamageDealt, ModifierMode::Additive, 10.0))
            .effect(modifier(
                "sharpen_pct",
                StatKind::DamageDealt,
                ModifierMode::Multiplicative,
                0.2,
            ))
            .effect(modifier("empower", StatKind::Attack, ModifierMode::Additive, 100.0))
            .effect(
                EffectDefinition::new(
                    "thorns".into(),
                    EffectKind::Damage,
                    Formula::FromTrigger { coefficient: 0.5 },
                )
                .on(TriggerCondition::OnHitTaken),
            )
            .effect(
                EffectDefinition::new(
                    "counter".into(),
                    EffectKind::CustomTrigger { skill: "strike".into() },
                    Formula::flat(0.0),
                )
                .on(TriggerCondition::OnHitTaken),
            )
            .template(
                refreshing("sharpen", "Sharpened", BuffDuration::Turns(3))
                    .with_effect("sharpen_flat")
                    .with_effect("sharpen_pct"),
            )
            .template(
                refreshing("empower", "Empowered", BuffDuration::Turns(3)).with_effect("empower"),
            )
            .template(
                refreshing("thorns", "Thorn Armor", BuffDuration::Infinite).with_effect("thorns"),
            )
            .template(
                refreshing("counter", "Counter Stance", BuffDuration::Infinite)
                    .with_effect("counter"),
            )
            .skill(
                SkillDefinition::new("strike", "Strike", SkillTarget::Enemy).with_effect("strike"),
            )
            .skill(SkillDefinition::new("graze", "Graze", SkillTarget::Enemy).with_effect("graze"))
            .skill(
                SkillDefinition::new("empowering_palm", "Empowering Palm", SkillTarget::Enemy)
                    .with_effect("palm")
                    .with_buff("empower", BuffRecipient::Caster),
            )
            .skill(
                SkillDefinition::new("mend", "Mend", SkillTarget::Own)
                    .with_effect("mend")
                    .with_mp_cost(15),
            )
            .build()
            .expect("test catalog is valid")
    }

    fn fighter(id: CombatantId) -> CombatantState {
        let attrs = Attributes::new().with(StatKind::Attack, 5.0);
        CombatantState::new(id, format!("fighter {}", id.0), attrs, 200, 20)
    }

    fn buff(catalog: &Catalog, combatant: &mut CombatantState, template: &str) {
        let source = BuffSource::new(combatant.id, Attributes::new(), 0);
        BuffEngine::new(catalog)
            .apply_buff(combatant, &template.into(), source)
            .unwrap();
    }

    #[test]
    fn damage_modifiers_apply_additive_then_multiplicative() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER), fighter(WOLF)];
        buff(&catalog, &mut battle[0], "sharpen");

        let outcome = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "strike", 0).at(WOLF))
            .unwrap();

        assert_eq!(outcome.phase, ResolutionPhase::Resolved);
        assert_eq!(outcome.total_damage(), 72);
        assert_eq!(battle[1].hp.current, 128);
    }

    #[test]
    fn self_buff_does_not_change_magnitude_already_computed() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER), fighter(WOLF)];

        let first = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "empowering_palm", 0).at(WOLF))
            .unwrap();
        let second = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "empowering_palm", 0).at(WOLF))
            .unwrap();

        assert_eq!(first.total_damage(), 5);
        assert_eq!(first.caster_buffs.len(), 1);
        assert_eq!(second.total_damage(), 105);
    }

    #[test]
    fn heal_is_capped_at_max_pool() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER)];
        battle[0].hp.drain(25);

        let outcome = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "mend", 0))
            .unwrap();

        let healed = outcome.target(PLAYER).and_then(TargetOutcome::delta).map(|d| d.healed);
        assert_eq!(healed, Some(25));
        assert_eq!(outcome.mp_spent, 15);
        assert_eq!(battle[0].hp.current, 200);
        assert_eq!(battle[0].mp.current, 5);
    }

    #[test]
    fn insufficient_mp_rejects_without_mutation() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER)];
        battle[0].mp.drain(10);
        let before = battle.clone();

        let result = resolver.resolve(&mut battle, &ActionRequest::new(PLAYER, "mend", 0));

        assert!(matches!(
            result,
            Err(CombatError::InsufficientMp { required: 15, available: 10, .. })
        ));
        assert_eq!(battle, before);
    }

    #[test]
    fn reflect_scales_with_damage_taken() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER), fighter(WOLF)];
        buff(&catalog, &mut battle[1], "thorns");

        let outcome = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "strike", 0).at(WOLF))
            .unwrap();

        let delta = outcome.target(WOLF).and_then(TargetOutcome::delta).unwrap();
        assert_eq!(delta.triggers.len(), 1);
        assert_eq!(delta.triggers[0].result, TriggerEffect::Reflected { amount: 25 });
        assert_eq!(battle[0].hp.current, 175);
    }

    #[test]
    fn retaliation_nests_exactly_one_level() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER), fighter(WOLF)];
        // Both sides counter every hit; chains must stop after one nested action.
        buff(&catalog, &mut battle[0], "counter");
        buff(&catalog, &mut battle[1], "counter");

        let outcome = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "strike", 0).at(WOLF))
            .unwrap();

        let delta = outcome.target(WOLF).and_then(TargetOutcome::delta).unwrap();
        let TriggerEffect::Retaliated(nested) = &delta.triggers[0].result else {
            panic!("expected a retaliation, got {:?}", delta.triggers[0].result);
        };
        assert_eq!(nested.caster, WOLF);
        assert_eq!(nested.mp_spent, 0);
        assert!(nested.targets[0].delta().unwrap().triggers.is_empty());
        assert_eq!(battle[0].hp.current, 150);
        assert_eq!(battle[1].hp.current, 150);
    }

    #[test]
    fn lethal_hit_on_counter_holder_lands_without_retaliation() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER), fighter(WOLF)];
        buff(&catalog, &mut battle[1], "counter");
        battle[1].hp.drain(170);

        let outcome = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "strike", 0).at(WOLF))
            .unwrap();

        assert_eq!(outcome.phase, ResolutionPhase::Resolved);
        assert!(!outcome.is_partial());
        let delta = outcome.target(WOLF).and_then(TargetOutcome::delta).unwrap();
        assert_eq!(delta.damage, 30);
        assert!(delta.defeated);
        assert!(delta.triggers.is_empty());
        assert!(!battle[1].is_alive());
        assert_eq!(battle[0].hp.current, 200);
    }

    #[test]
    fn fractional_damage_is_floored() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER), fighter(WOLF)];

        let outcome = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "graze", 0).at(WOLF))
            .unwrap();

        assert_eq!(outcome.total_damage(), 50);
        assert_eq!(battle[1].hp.current, 150);
    }

    #[test]
    fn failing_target_is_tagged_and_others_resolve() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER), fighter(WOLF), fighter(BEAR)];
        battle[2].hp.drain(200);

        let outcome = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "strike", 0).at(WOLF).at(BEAR))
            .unwrap();

        assert!(outcome.is_partial());
        assert_eq!(outcome.failed_targets().collect::<Vec<_>>(), vec![BEAR]);
        let TargetResult::Failed(failure) = &outcome.target(BEAR).unwrap().result else {
            panic!("bear should have failed");
        };
        assert_eq!(failure.kind, "COMBAT_COMBATANT_DEFEATED");
        assert_eq!(battle[1].hp.current, 150);
    }

    #[test]
    fn unknown_skill_is_a_configuration_error() {
        let catalog = catalog();
        let resolver = CombatResolver::new(&catalog, &GameConfig::default());
        let mut battle = vec![fighter(PLAYER), fighter(WOLF)];

        let error = resolver
            .resolve(&mut battle, &ActionRequest::new(PLAYER, "meteor", 0).at(WOLF))
            .unwrap_err();

        assert_eq!(error.category(), ErrorCategory::Configuration);
        assert_eq!(error.error_code(), "COMBAT_UNKNOWN_SKILL");
    }
}
