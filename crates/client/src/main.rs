//! Cultivation simulator binary.
//!
//! Composition root for a local play session: loads content, assembles the
//! game service over in-memory runs and a file-backed battle store, then
//! plays one scripted dungeon run for a demo cultivator. Every accepted
//! action is printed to stdout as one JSON line.
//!
//! # Examples
//!
//! ```bash
//! # Default route through the bundled Azure Cloud Ravine
//! cargo run -p cultivation-sim
//!
//! # Custom route, content from disk
//! CULTIVATION_CONTENT_DIR=crates/game/content/data \
//!     cargo run -p cultivation-sim -- descend climb
//! ```

mod dirs;
mod logging;
mod script;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use game_content::{ContentFactory, bundled, bundled_catalog, bundled_config};
use game_core::{Attributes, CharacterId, CharacterSnapshot, LearnedSkill, NodeId, Realm};
use runtime::{FileBattleRepository, GameService, InMemoryCharacterOracle, RuntimeConfig, Topic};

const DEMO_CHARACTER: CharacterId = CharacterId(1);
const DEFAULT_ROUTE: &[&str] = &["descend", "follow_hiss", "withdraw"];

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let session_id = std::env::var("CULTIVATION_SESSION_ID").unwrap_or_else(|_| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{timestamp}")
    });
    let (_guard, log_file) = logging::setup_logging(&session_id)?;

    // 1. Content and configuration
    let (catalog, game_config) = match std::env::var_os("CULTIVATION_CONTENT_DIR") {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            tracing::info!(dir = %factory.data_dir().display(), "loading content from disk");
            (factory.load_catalog()?, factory.load_config()?)
        }
        None => (bundled_catalog()?, bundled_config()?),
    };
    let config = RuntimeConfig::from_env()?.with_game_config(game_config);

    // 2. Service
    let battle_dir = dirs::battle_dir();
    let battles = FileBattleRepository::new(&battle_dir)
        .with_context(|| format!("opening battle store at {}", battle_dir.display()))?;
    let characters = InMemoryCharacterOracle::new().with_character(demo_character());

    let service = GameService::builder()
        .config(config)
        .catalog(catalog)
        .characters(Arc::new(characters))
        .battle_repository(Arc::new(battles))
        .build()?;

    let mut events = service.events().subscribe(Topic::Dungeon);
    let event_log = tokio::spawn(async move {
        let mut seen = 0usize;
        while let Ok(event) = events.recv().await {
            tracing::debug!(?event, "dungeon event");
            seen += 1;
        }
        seen
    });

    // 3. Play
    let route: Vec<String> = std::env::args().skip(1).collect();
    let route = if route.is_empty() {
        DEFAULT_ROUTE.iter().map(|choice| choice.to_string()).collect()
    } else {
        route
    };

    let entry = NodeId::new(bundled::STARTER_ENTRY);
    let summary = script::play(&service, DEMO_CHARACTER, &entry, &route).await?;

    let status = service.peek_quota(DEMO_CHARACTER, runtime::QuotaKind::Lifespan).await?;
    println!("{}", serde_json::to_string(&summary)?);
    tracing::info!(
        actions = summary.actions,
        ended = summary.ended,
        lifespan_left = status.remaining,
        "session finished"
    );

    drop(service);
    let seen = event_log.await?;
    eprintln!("{seen} dungeon events; log at {}", log_file.display());
    Ok(())
}

fn demo_character() -> CharacterSnapshot {
    CharacterSnapshot::new(
        DEMO_CHARACTER,
        "Lin Feng",
        Realm::QiRefining,
        Attributes::cultivation(10.0, 12.0, 8.0, 7.0, 6.0),
    )
    .with_equipment_quality(1)
    .with_skill(LearnedSkill::new("palm_strike", 2))
    .with_skill(LearnedSkill::new("flame_burst", 1))
    .with_skill(LearnedSkill::new("guarding_breath", 1))
}
