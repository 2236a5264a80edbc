use std::collections::HashMap;
use std::sync::RwLock;

use game_core::{CharacterId, DungeonRun};

use crate::repository::{RepositoryError, Result, RunRepository};

/// In-memory implementation of [`RunRepository`].
#[derive(Default)]
pub struct InMemoryRunRepository {
    runs: RwLock<HashMap<CharacterId, DungeonRun>>,
}

impl InMemoryRunRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunRepository for InMemoryRunRepository {
    fn load(&self, character: CharacterId) -> Result<Option<DungeonRun>> {
        let runs = self.runs.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(runs.get(&character).cloned())
    }

    fn save(&self, run: &DungeonRun) -> Result<()> {
        let mut runs = self.runs.write().map_err(|_| RepositoryError::LockPoisoned)?;
        runs.insert(run.character, run.clone());
        Ok(())
    }

    fn delete(&self, character: CharacterId) -> Result<()> {
        let mut runs = self.runs.write().map_err(|_| RepositoryError::LockPoisoned)?;
        runs.remove(&character);
        Ok(())
    }
}
