use std::collections::BTreeMap;
use std::sync::RwLock;

use game_core::{BattleRef, BattleSession};

use crate::repository::{BattleRepository, RepositoryError, Result};

/// In-memory implementation of [`BattleRepository`].
#[derive(Default)]
pub struct InMemoryBattleRepository {
    sessions: RwLock<BTreeMap<BattleRef, BattleSession>>,
}

impl InMemoryBattleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BattleRepository for InMemoryBattleRepository {
    fn load(&self, battle: BattleRef) -> Result<Option<BattleSession>> {
        let sessions = self.sessions.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(sessions.get(&battle).cloned())
    }

    fn save(&self, session: &BattleSession) -> Result<()> {
        let mut sessions = self.sessions.write().map_err(|_| RepositoryError::LockPoisoned)?;
        sessions.insert(session.battle, session.clone());
        Ok(())
    }

    fn delete(&self, battle: BattleRef) -> Result<()> {
        let mut sessions = self.sessions.write().map_err(|_| RepositoryError::LockPoisoned)?;
        sessions.remove(&battle);
        Ok(())
    }

    fn list(&self) -> Result<Vec<BattleRef>> {
        let sessions = self.sessions.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(sessions.keys().copied().collect())
    }
}
