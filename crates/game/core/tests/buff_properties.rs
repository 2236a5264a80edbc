use game_core::{
    Attributes, BuffDuration, BuffEngine, BuffSource, BuffTags, BuffTemplate, Catalog, CombatantId,
    CombatantState, EffectDefinition, EffectKind, Formula, ModifierMode, StackPolicy,
    StackResolution, StatKind, TemplateId, TriggerCondition,
};
use proptest::prelude::*;

fn catalog(max_stack: u32) -> Catalog {
    Catalog::builder()
        .effect(EffectDefinition::new(
            "edge".into(),
            EffectKind::StatModify {
                stat: StatKind::DamageDealt,
                mode: ModifierMode::Multiplicative,
            },
            Formula::per_stack(Formula::flat(0.1)),
        ))
        .effect(
            EffectDefinition::new(
                "venom_tick".into(),
                EffectKind::Damage,
                Formula::per_stack(Formula::flat(3.0)),
            )
            .on(TriggerCondition::OnTick),
        )
        .effect(
            EffectDefinition::new("venom_burst".into(), EffectKind::Damage, Formula::flat(11.0))
                .on(TriggerCondition::OnExpire),
        )
        .template(
            BuffTemplate::new(
                "fury",
                "Fury",
                StackPolicy::StackUpToN,
                max_stack,
                BuffDuration::Turns(5),
            )
            .with_effect("edge")
            .tagged(BuffTags::BUFF),
        )
        .template(
            BuffTemplate::new("venom", "Venom", StackPolicy::StackUpToN, 5, BuffDuration::Turns(3))
                .with_effect("venom_tick")
                .with_effect("venom_burst")
                .tagged(BuffTags::DEBUFF | BuffTags::DOT),
        )
        .template(
            BuffTemplate::new(
                "ward",
                "Ward",
                StackPolicy::RefreshDuration,
                1,
                BuffDuration::Turns(7),
            )
            .with_effect("edge")
            .tagged(BuffTags::BUFF | BuffTags::SHIELD),
        )
        .build()
        .expect("property catalog is valid")
}

fn combatant() -> CombatantState {
    CombatantState::new(CombatantId(1), "cultivator", Attributes::new(), 100_000, 50)
}

fn source() -> BuffSource {
    BuffSource::new(CombatantId(2), Attributes::new(), 0)
}

#[test]
fn fourth_application_of_three_stack_template_is_capped() {
    let catalog = catalog(3);
    let engine = BuffEngine::new(&catalog);
    let mut target = combatant();
    let fury = TemplateId::new("fury");

    let resolutions: Vec<_> = (0..4)
        .map(|_| engine.apply_buff(&mut target, &fury, source()).unwrap().resolution)
        .collect();

    assert_eq!(
        resolutions,
        vec![
            StackResolution::Created,
            StackResolution::Stacked { stacks: 2 },
            StackResolution::Stacked { stacks: 3 },
            StackResolution::Stacked { stacks: 3 },
        ]
    );
    assert_eq!(target.buffs().len(), 1);
    assert_eq!(target.buffs()[0].stacks(), 3);
    assert_eq!(target.buffs()[0].remaining(), BuffDuration::Turns(5));
}

proptest! {
    #[test]
    fn stacks_never_exceed_template_limit(max_stack in 1_u32..=10, applications in 1_usize..25) {
        let catalog = catalog(max_stack);
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();
        let fury = TemplateId::new("fury");

        for _ in 0..applications {
            engine.apply_buff(&mut target, &fury, source()).unwrap();
        }

        prop_assert_eq!(target.buffs().len(), 1);
        prop_assert_eq!(target.buffs()[0].stacks(), (applications as u32).min(max_stack));

        let modifier = engine.collect_modifiers(&target, StatKind::DamageDealt).unwrap();
        let expected = 1.0 + 0.1 * f64::from((applications as u32).min(max_stack));
        prop_assert!((modifier.multiplier - expected).abs() < 1e-9);
    }

    #[test]
    fn ticking_in_parts_matches_ticking_at_once(
        venom_stacks in 1_usize..=5,
        with_ward in any::<bool>(),
        first in 0_u32..6,
        second in 0_u32..6,
    ) {
        let catalog = catalog(3);
        let engine = BuffEngine::new(&catalog);
        let mut initial = combatant();
        for _ in 0..venom_stacks {
            engine.apply_buff(&mut initial, &"venom".into(), source()).unwrap();
        }
        engine.apply_buff(&mut initial, &"fury".into(), source()).unwrap();
        if with_ward {
            engine.apply_buff(&mut initial, &"ward".into(), source()).unwrap();
        }

        let mut split = initial.clone();
        engine.tick(&mut split, first).unwrap();
        engine.tick(&mut split, second).unwrap();

        let mut whole = initial;
        engine.tick(&mut whole, first + second).unwrap();

        prop_assert_eq!(split.buffs(), whole.buffs());
        prop_assert_eq!(split.hp, whole.hp);
    }

    #[test]
    fn ticks_never_extend_durations(turns in 0_u32..10) {
        let catalog = catalog(3);
        let engine = BuffEngine::new(&catalog);
        let mut target = combatant();
        engine.apply_buff(&mut target, &"ward".into(), source()).unwrap();

        engine.tick(&mut target, turns).unwrap();

        match target.buffs() {
            [] => prop_assert!(turns >= 7),
            [ward] => prop_assert_eq!(ward.remaining(), BuffDuration::Turns(7 - turns)),
            more => prop_assert!(false, "unexpected buffs {:?}", more),
        }
    }
}
