//! The shipped content must load, validate and be playable end to end.

use std::fs;
use std::path::Path;

use game_content::{ContentFactory, bundled, bundled_catalog, bundled_config};
use game_core::{
    ActionRequest, Attributes, BattleRef, BuffEngine, BuffSource, BuffTags, CharacterId,
    CharacterSnapshot, ChoiceId, CombatResolver, CombatantId, CombatantState, DungeonMachine,
    DungeonPhase, ENEMY, LearnedSkill, NodeId, NodeKind, Realm, SkillId, TemplateId,
};

fn data_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
}

#[test]
fn bundled_catalog_validates() {
    let catalog = bundled_catalog().unwrap();

    assert!(catalog.effect_count() > 0);
    assert!(catalog.skill(&SkillId::new("flame_burst")).is_some());
    assert!(catalog.enemy(&"ravine_serpent".into()).is_some());

    let entry = catalog.atlas().node(&NodeId::new(bundled::STARTER_ENTRY)).unwrap();
    assert!(entry.entry);
    assert!(matches!(entry.kind, NodeKind::Passage));

    let thorns = catalog.template(&TemplateId::new("thorn_aura")).unwrap();
    assert!(thorns.tags.contains(BuffTags::INNATE));
}

#[test]
fn data_directory_matches_bundled_content() {
    let factory = ContentFactory::new(data_dir());

    let from_disk = factory.load_catalog().unwrap();
    let bundled = bundled_catalog().unwrap();
    assert_eq!(from_disk.effect_count(), bundled.effect_count());
    assert_eq!(from_disk.templates(), bundled.templates());
    assert_eq!(from_disk.atlas(), bundled.atlas());

    assert_eq!(factory.load_config().unwrap(), bundled_config().unwrap());
}

#[test]
fn broken_reference_fails_the_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("maps")).unwrap();
    for name in ["config.toml", "effects.ron", "buffs.ron", "enemies.ron"] {
        fs::copy(data_dir().join(name), dir.path().join(name)).unwrap();
    }
    fs::copy(
        data_dir().join("maps/azure_ravine.ron"),
        dir.path().join("maps/azure_ravine.ron"),
    )
    .unwrap();
    // Skills file without the serpent's bite, which an effect and an enemy reference.
    let skills = fs::read_to_string(data_dir().join("skills.ron")).unwrap();
    fs::write(
        dir.path().join("skills.ron"),
        skills.replace("\"serpent_bite\"", "\"serpent_lunge\""),
    )
    .unwrap();

    let error = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
    assert!(error.to_string().contains("serpent_bite"), "{error}");
}

#[test]
fn starter_realm_can_be_left_from_the_gate() {
    let catalog = bundled_catalog().unwrap();
    let config = bundled_config().unwrap();
    let machine = DungeonMachine::new(&catalog, &config);

    let character = CharacterSnapshot::new(
        CharacterId(1),
        "Lin Feng",
        Realm::QiRefining,
        Attributes::cultivation(10.0, 12.0, 8.0, 7.0, 6.0),
    )
    .with_skill(LearnedSkill::new("palm_strike", 1));

    let run = machine
        .start(None, character.id, &NodeId::new(bundled::STARTER_ENTRY))
        .unwrap();
    let advance = machine
        .advance(&run, None, &character, &ChoiceId::new("leave"), BattleRef(1))
        .unwrap();

    assert!(matches!(advance.run.phase, DungeonPhase::Completed { .. }));
    assert_eq!(advance.lifespan_cost, 0);
}

#[test]
fn stone_hide_blunts_spirit_techniques() {
    let catalog = bundled_catalog().unwrap();
    let config = bundled_config().unwrap();
    let resolver = CombatResolver::new(&catalog, &config);
    let warden = catalog.enemy(&"stone_warden".into()).unwrap();
    let hero = CharacterSnapshot::new(
        CharacterId(1),
        "Lin Feng",
        Realm::QiRefining,
        Attributes::cultivation(10.0, 12.0, 8.0, 7.0, 6.0),
    );

    let palm_against = |hidden: bool| {
        let mut opponent = warden.to_combatant(ENEMY, &config);
        if hidden {
            let source = BuffSource::new(ENEMY, warden.attributes, warden.rank);
            BuffEngine::new(&catalog)
                .apply_buff(&mut opponent, &TemplateId::new("thorn_aura"), source)
                .unwrap();
        }
        let mut battle = vec![CombatantState::from_character(&hero, &config), opponent];
        let request = ActionRequest::new(CombatantId::PLAYER, "palm_strike", 1).at(ENEMY);
        resolver.resolve(&mut battle, &request).unwrap().total_damage()
    };

    assert_eq!(palm_against(false) - palm_against(true), 10);
}
