//! Repository contracts for saving and loading mutable runtime state.

use game_core::{BattleRef, BattleSession, CharacterId, DungeonRun};

use super::error::Result;

/// Live dungeon runs, at most one per character.
///
/// Completed and abandoned runs are deleted rather than kept, so a stored
/// run is always an active one.
pub trait RunRepository: Send + Sync {
    fn load(&self, character: CharacterId) -> Result<Option<DungeonRun>>;

    fn save(&self, run: &DungeonRun) -> Result<()>;

    fn delete(&self, character: CharacterId) -> Result<()>;
}

/// Durable session store for in-progress battles, keyed by battle reference.
///
/// Written after every exchange; read back by the surrounding application's
/// battle status page as well as by the service.
pub trait BattleRepository: Send + Sync {
    fn load(&self, battle: BattleRef) -> Result<Option<BattleSession>>;

    fn save(&self, session: &BattleSession) -> Result<()>;

    fn delete(&self, battle: BattleRef) -> Result<()>;

    /// References of every stored session, ascending.
    fn list(&self) -> Result<Vec<BattleRef>>;
}
