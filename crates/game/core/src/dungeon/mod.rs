//! Dungeon State Machine: maps, enemies, runs and battle sessions.

mod battle;
mod enemy;
mod error;
mod machine;
mod map;
mod run;
mod view;

pub use battle::{BattleSession, ENEMY, Exchange};
pub use enemy::EnemyTemplate;
pub use error::DungeonError;
pub use machine::{Advance, DungeonMachine, DungeonStep};
pub use map::{DungeonAtlas, MapNode, NodeChoice, NodeKind};
pub use run::{DungeonPhase, DungeonRun};
pub use view::{BattleView, ChoiceView, DungeonRunView};
