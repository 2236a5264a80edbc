//! Battle sessions in the file store, and a service resuming from one.

use std::fs;
use std::sync::Arc;

use game_content::{bundled, bundled_catalog};
use game_core::{
    Attributes, BattleRef, BattleSession, CharacterId, CharacterSnapshot, ChoiceId, CombatantState,
    DungeonStep, ENEMY, GameConfig, LearnedSkill, NodeId, Realm,
};
use runtime::{
    BattleRepository, FileBattleRepository, GameService, InMemoryCharacterOracle, RepositoryError,
};

fn hero() -> CharacterSnapshot {
    CharacterSnapshot::new(
        CharacterId(3),
        "Mo Fan",
        Realm::QiRefining,
        Attributes::cultivation(10.0, 12.0, 8.0, 7.0, 6.0),
    )
    .with_skill(LearnedSkill::new("palm_strike", 1))
}

fn session(battle: u64) -> BattleSession {
    let catalog = bundled_catalog().expect("bundled content should load");
    let config = GameConfig::default();
    let serpent = catalog.enemy(&"ravine_serpent".into()).expect("serpent is bundled");

    let hero = hero();
    let mut player = CombatantState::from_character(&hero, &config);
    player.hp.drain(17);

    BattleSession {
        battle: BattleRef(battle),
        character: hero.id,
        node: NodeId::new("serpent_den"),
        enemy: serpent.id.clone(),
        combatants: vec![player, serpent.to_combatant(ENEMY, &config)],
        round: 4,
    }
}

#[test]
fn saved_session_loads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileBattleRepository::new(dir.path()).unwrap();

    let stored = session(9);
    repo.save(&stored).unwrap();

    assert_eq!(repo.load(BattleRef(9)).unwrap(), Some(stored));
    assert_eq!(repo.load(BattleRef(10)).unwrap(), None);
}

#[test]
fn list_is_ascending_and_ignores_stray_files() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileBattleRepository::new(dir.path()).unwrap();

    for battle in [12, 3, 7] {
        repo.save(&session(battle)).unwrap();
    }
    fs::write(dir.path().join("notes.txt"), "not a battle").unwrap();
    repo.delete(BattleRef(7)).unwrap();
    repo.delete(BattleRef(99)).unwrap();

    assert_eq!(repo.list().unwrap(), vec![BattleRef(3), BattleRef(12)]);
}

#[test]
fn session_under_the_wrong_name_is_reported_corrupted() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileBattleRepository::new(dir.path()).unwrap();

    repo.save(&session(5)).unwrap();
    fs::rename(dir.path().join("battle_5.bin"), dir.path().join("battle_6.bin")).unwrap();

    let error = repo.load(BattleRef(6)).unwrap_err();
    assert!(matches!(error, RepositoryError::CorruptedData(_)));
}

#[test]
fn truncated_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileBattleRepository::new(dir.path()).unwrap();

    fs::write(dir.path().join("battle_2.bin"), [1u8, 2, 3]).unwrap();

    let error = repo.load(BattleRef(2)).unwrap_err();
    assert!(matches!(error, RepositoryError::Serialization(_)));
}

#[tokio::test]
async fn service_numbers_new_battles_after_stored_ones() {
    let dir = tempfile::tempdir().unwrap();
    let battles = Arc::new(FileBattleRepository::new(dir.path()).unwrap());
    battles.save(&session(41)).unwrap();

    let service = GameService::builder()
        .catalog(bundled_catalog().unwrap())
        .characters(Arc::new(InMemoryCharacterOracle::new().with_character(hero())))
        .battle_repository(battles.clone())
        .build()
        .unwrap();

    let character = CharacterId(3);
    service
        .start_dungeon(character, &NodeId::new(bundled::STARTER_ENTRY))
        .await
        .unwrap();
    service.handle_action(character, &ChoiceId::new("descend")).await.unwrap();
    let outcome = service
        .handle_action(character, &ChoiceId::new("follow_hiss"))
        .await
        .unwrap();

    let started = outcome.steps.iter().find_map(|step| match step {
        DungeonStep::BattleStarted { battle, .. } => Some(*battle),
        _ => None,
    });
    assert_eq!(started, Some(BattleRef(42)));
    assert!(battles.load(BattleRef(42)).unwrap().is_some());
}
